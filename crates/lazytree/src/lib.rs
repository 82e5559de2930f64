//! `lazytree` renders lazily-loaded, paginated trees with ratatui.
//!
//! The data model lives in [`lazytree_core`] (re-exported as [`core`]): a
//! [`Tree`] keeps partially-fetched branch/leaf records, pages in missing
//! children through a caller-supplied [`TreeSource`], and flattens the
//! expanded subset into rows. This crate adds the terminal side:
//! [`view::TreeViewState`] draws those rows at per-kind heights with
//! cursor, keyboard/mouse navigation, and a scrollbar, and reports the
//! visible row range that drives prefetch.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input, rendering, and the async loads
//!   from your app.
//! - Row content is yours: the view positions, indents, and styles rows,
//!   then hands each one to your branch/leaf closure.
//! - Interaction is reported, not hidden: expanding a branch yields
//!   [`view::TreeViewAction::Expanded`] so your app decides when to call
//!   [`Tree::load_more`].
//!
//! Input conversion from crossterm lives behind the `crossterm` feature
//! (`crossterm_input`).

pub use lazytree_core as core;

pub mod input;
pub mod keymap;
pub mod render;
pub mod view;
pub mod viewport;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub use lazytree_core::DisplayNode;
pub use lazytree_core::EdgeKind;
pub use lazytree_core::EdgeState;
pub use lazytree_core::FetchPage;
pub use lazytree_core::NodeItem;
pub use lazytree_core::PageUpdate;
pub use lazytree_core::Reparent;
pub use lazytree_core::Tree;
pub use lazytree_core::TreeOptions;
pub use lazytree_core::TreeSource;
pub use view::NodeState;
pub use view::TreeViewAction;
pub use view::TreeViewOptions;
pub use view::TreeViewState;
