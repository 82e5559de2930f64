use std::cmp::Ordering;

use crate::edge::EdgeState;
use crate::edge::PageUpdate;

/// Reserved key for the implicit root pseudo-parent. Must never collide
/// with a real branch key.
pub const ROOT_KEY: &str = "__root__";

/// One page of fetched children plus the pagination bookkeeping the source
/// wants recorded on the edge. Returning the bookkeeping (instead of
/// mutating shared state) keeps the edge exclusively owned by the tree.
#[derive(Clone, Debug)]
pub struct FetchPage<T> {
    pub items: Vec<T>,
    pub page: PageUpdate,
}

impl<T> FetchPage<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            page: PageUpdate::none(),
        }
    }

    pub fn with_page(items: Vec<T>, page: PageUpdate) -> Self {
        Self { items, page }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

/// Destination of an update mutation: keep the record under its current
/// parent, move it to the root, or move it under another branch.
#[derive(Clone, Copy, Debug)]
pub enum Reparent<'a, B> {
    Keep,
    Root,
    Under(&'a B),
}

/// The tree's only boundary: key resolution, paged child accessors, and
/// optional ordering/filtering/merging hooks, all supplied by the host.
///
/// Accessors receive a by-value snapshot of the edge's pagination state
/// and return the page they fetched. They run on whatever executor the
/// host drives the tree with; the engine itself spawns nothing.
#[allow(async_fn_in_trait)]
pub trait TreeSource {
    type Branch: Clone;
    type Leaf: Clone;
    type Error;

    /// Stable key, unique across all branches of the tree.
    fn branch_key(&self, branch: &Self::Branch) -> String;

    /// Stable key, unique across all leaves of the tree.
    fn leaf_key(&self, leaf: &Self::Leaf) -> String;

    async fn fetch_branches(
        &self,
        parent: Option<&Self::Branch>,
        edge: EdgeState,
    ) -> Result<FetchPage<Self::Branch>, Self::Error>;

    async fn fetch_leaves(
        &self,
        parent: Option<&Self::Branch>,
        edge: EdgeState,
    ) -> Result<FetchPage<Self::Leaf>, Self::Error>;

    /// Sibling ordering. The default keeps insertion order (stable sort
    /// with an always-equal comparator is the identity).
    fn branch_order(&self, _a: &Self::Branch, _b: &Self::Branch) -> Ordering {
        Ordering::Equal
    }

    fn leaf_order(&self, _a: &Self::Leaf, _b: &Self::Leaf) -> Ordering {
        Ordering::Equal
    }

    /// View-only filter applied during flattening; storage is untouched.
    fn retain_branch(&self, _branch: &Self::Branch) -> bool {
        true
    }

    fn retain_leaf(&self, _leaf: &Self::Leaf) -> bool {
        true
    }

    /// Combine a stored record with a partial update. The default replaces
    /// the record wholesale; sources whose updates carry partial fields
    /// override this to preserve the rest.
    fn merge_branch(&self, _existing: &Self::Branch, update: Self::Branch) -> Self::Branch {
        update
    }

    fn merge_leaf(&self, _existing: &Self::Leaf, update: Self::Leaf) -> Self::Leaf {
        update
    }
}
