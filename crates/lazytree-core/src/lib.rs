//! `lazytree-core` is a headless engine for lazily-loaded, paginated,
//! mutable trees: the data model behind tree/file-browser style views.
//!
//! It keeps a partially-fetched tree of caller-defined branch and leaf
//! records, tracks which branches are expanded, fetches missing children
//! in pages through a caller-supplied [`TreeSource`], flattens the
//! visible subset into an ordered row sequence for windowed rendering,
//! and applies live insert/update/delete mutations without discarding
//! fetched state.
//!
//! ## Design goals
//!
//! - UI-agnostic: the engine produces [`DisplayNode`] rows and consumes a
//!   visible index range; how rows are drawn is someone else's job (see
//!   the `lazytree` crate for a ratatui layer).
//! - No async runtime: fetches suspend only inside [`Tree::load_more`] /
//!   [`Tree::load_many`], on whatever executor the host drives them with.
//! - One owner: a [`Tree`] instance exclusively owns its edge store,
//!   expansion state, and published sequence. No shared mutable state
//!   crosses the source boundary; accessors return a [`FetchPage`] and
//!   the engine does the bookkeeping.
//!
//! ## The feedback loop
//!
//! Expansion and viewport changes drive the pager; the pager merges pages
//! into the edge store; flattening re-derives the row sequence; the
//! rendering side reports the visible range back through
//! [`Tree::prefetch_targets`], whose result feeds the next
//! [`Tree::load_many`] call.

pub mod edge;
pub mod node;
pub mod source;
pub mod tree;

mod expand;
mod flatten;
mod loader;
mod prefetch;

pub use edge::DEFAULT_PAGE_LIMIT;
pub use edge::EdgeKind;
pub use edge::EdgeState;
pub use edge::PageUpdate;
pub use node::DisplayNode;
pub use node::NodeItem;
pub use source::FetchPage;
pub use source::Reparent;
pub use source::TreeSource;
pub use source::ROOT_KEY;
pub use tree::Tree;
pub use tree::TreeOptions;
