use std::ops::Range;

use futures::future;
use futures::future::OptionFuture;

use crate::edge::EdgeKind;
use crate::edge::EdgeState;
use crate::edge::EdgeStore;
use crate::edge::DEFAULT_PAGE_LIMIT;
use crate::expand::ExpansionTracker;
use crate::flatten::flatten_tree;
use crate::loader;
use crate::loader::LoadPlan;
use crate::node::DisplayNode;
use crate::prefetch::prefetch_targets;
use crate::source::FetchPage;
use crate::source::Reparent;
use crate::source::TreeSource;
use crate::source::ROOT_KEY;

#[derive(Clone, Debug)]
pub struct TreeOptions {
    /// Suppress branch traversal entirely: only direct leaves of the root
    /// are fetched and flattened, regardless of expansion state.
    pub flat: bool,
    /// Page limit seeded into newly created edges.
    pub page_limit: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            flat: false,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// A lazily-loaded, paginated, mutable tree, flattened on demand into an
/// ordered row sequence for windowed rendering.
///
/// One instance exclusively owns all of its state (edge store, expansion
/// tracker, branch index, published sequence). The host supplies a
/// [`TreeSource`] per call, drives [`load_more`] / [`load_many`] on its own
/// executor, renders [`nodes`], and feeds visibility back through
/// [`prefetch_targets`], closing the feedback loop.
///
/// [`load_more`]: Tree::load_more
/// [`load_many`]: Tree::load_many
/// [`nodes`]: Tree::nodes
/// [`prefetch_targets`]: Tree::prefetch_targets
pub struct Tree<S: TreeSource> {
    edges: EdgeStore<S::Branch, S::Leaf>,
    expansion: ExpansionTracker<S::Branch>,
    flattened: Vec<DisplayNode<S::Branch, S::Leaf>>,
    options: TreeOptions,
    filter_key: Option<String>,
    batching: bool,
}

impl<S: TreeSource> Default for Tree<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TreeSource> Tree<S> {
    pub fn new() -> Self {
        Self::with_options(TreeOptions::default())
    }

    pub fn with_options(options: TreeOptions) -> Self {
        Self {
            edges: EdgeStore::new(),
            expansion: ExpansionTracker::new(),
            flattened: Vec::new(),
            options,
            filter_key: None,
            batching: false,
        }
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn is_flat(&self) -> bool {
        self.options.flat
    }

    pub fn set_flat(&mut self, source: &S, flat: bool) {
        if self.options.flat != flat {
            self.options.flat = flat;
            self.publish(source);
        }
    }

    /// Opaque token standing in for the host's current filter settings.
    /// Changing it re-flattens so `retain_*` predicates are re-consulted.
    pub fn set_filter_key(&mut self, source: &S, key: Option<String>) {
        if self.filter_key != key {
            self.filter_key = key;
            self.publish(source);
        }
    }

    pub fn filter_key(&self) -> Option<&str> {
        self.filter_key.as_deref()
    }

    /// The published flattened sequence. Row order is depth-first
    /// pre-order over expanded, filtered, sorted children.
    pub fn nodes(&self) -> &[DisplayNode<S::Branch, S::Leaf>] {
        &self.flattened
    }

    pub fn node(&self, index: usize) -> Option<&DisplayNode<S::Branch, S::Leaf>> {
        self.flattened.get(index)
    }

    pub fn len(&self) -> usize {
        self.flattened.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flattened.is_empty()
    }

    pub fn branch_by_key(&self, key: &str) -> Option<&S::Branch> {
        self.edges.branch_by_key(key)
    }

    /// Cached branch children of a parent (the root when `None`),
    /// regardless of expansion or filtering.
    pub fn branch_children(&self, source: &S, parent: Option<&S::Branch>) -> &[S::Branch] {
        let parent_key = Self::parent_key_of(source, parent);
        self.edges.branches_of(&parent_key)
    }

    /// Cached leaf children of a parent (the root when `None`).
    pub fn leaf_children(&self, source: &S, parent: Option<&S::Branch>) -> &[S::Leaf] {
        let parent_key = Self::parent_key_of(source, parent);
        self.edges.leaves_of(&parent_key)
    }

    /// Pagination state of one of a parent's child edges, if the edge has
    /// been touched by a load or mutation.
    pub fn edge_state(
        &self,
        source: &S,
        parent: Option<&S::Branch>,
        kind: EdgeKind,
    ) -> Option<&EdgeState> {
        let parent_key = Self::parent_key_of(source, parent);
        self.edges.state(&parent_key, kind)
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expansion.is_expanded(key)
    }

    /// Branch records currently expanded, in expansion order. Hosts that
    /// refresh every open folder in one round feed this to [`load_many`].
    ///
    /// [`load_many`]: Tree::load_many
    pub fn expanded_branches(&self) -> impl Iterator<Item = &S::Branch> {
        self.expansion.branches()
    }

    /// Mark a branch expanded, making its leaf edge eligible for fetching.
    /// Cached children become visible immediately; the caller decides when
    /// to [`load_more`] the remainder. Returns true when the branch was not
    /// already expanded.
    ///
    /// [`load_more`]: Tree::load_more
    pub fn expand(&mut self, source: &S, branch: &S::Branch) -> bool {
        let key = source.branch_key(branch);
        let newly = self.expansion.expand(key, branch.clone());
        if newly {
            self.publish(source);
        }
        newly
    }

    /// Collapse a branch. Fetched children are kept; re-expansion shows
    /// them again and only fetches what is still missing.
    pub fn collapse(&mut self, source: &S, branch: &S::Branch) -> bool {
        let key = source.branch_key(branch);
        let was = self.expansion.collapse(&key);
        if was {
            self.publish(source);
        }
        was
    }

    /// Returns whether the branch is expanded after the toggle.
    pub fn toggle(&mut self, source: &S, branch: &S::Branch) -> bool {
        let key = source.branch_key(branch);
        if self.expansion.is_expanded(&key) {
            self.collapse(source, branch);
            false
        } else {
            self.expand(source, branch);
            true
        }
    }

    /// Run one fetch cycle for a parent (the root when `None`): fetch its
    /// incomplete branch and leaf edges concurrently, merge, and republish.
    /// Returns whether anything previously unseen was merged.
    ///
    /// An edge already loading or complete is skipped this cycle; leaf
    /// edges are only fetched for the root or expanded parents; flat mode
    /// suppresses branch fetches. On an accessor error the failed edge is
    /// left incomplete and not loading (a later cycle retries) and the
    /// error is returned; a concurrently-fetched sibling edge still merges.
    pub async fn load_more(
        &mut self,
        source: &S,
        parent: Option<&S::Branch>,
    ) -> Result<bool, S::Error> {
        let plan = self.plan(source, parent);

        let branch_fut: OptionFuture<_> = plan
            .fetch_branches
            .then(|| source.fetch_branches(parent, plan.branch_edge.clone()))
            .into();
        let leaf_fut: OptionFuture<_> = plan
            .fetch_leaves
            .then(|| source.fetch_leaves(parent, plan.leaf_edge.clone()))
            .into();
        let (branches, leaves) = future::join(branch_fut, leaf_fut).await;

        let outcome = self.settle(source, &plan.parent_key, branches, leaves);
        self.publish(source);
        outcome.map(|num_new| num_new > 0)
    }

    /// Run fetch cycles for several parents in one overlapping round, the
    /// batched form the prefetch loop feeds. All planned fetches run
    /// concurrently; admission control still applies per edge, so a parent
    /// listed twice is fetched once. Successful fetches are merged even
    /// when another parent's fetch fails; the first error is returned.
    pub async fn load_many(
        &mut self,
        source: &S,
        parents: &[S::Branch],
    ) -> Result<bool, S::Error> {
        let mut plans: Vec<LoadPlan> = Vec::with_capacity(parents.len());
        for parent in parents {
            plans.push(self.plan(source, Some(parent)));
        }

        let cycles = parents.iter().zip(&plans).map(|(parent, plan)| async move {
            let branch_fut: OptionFuture<_> = plan
                .fetch_branches
                .then(|| source.fetch_branches(Some(parent), plan.branch_edge.clone()))
                .into();
            let leaf_fut: OptionFuture<_> = plan
                .fetch_leaves
                .then(|| source.fetch_leaves(Some(parent), plan.leaf_edge.clone()))
                .into();
            future::join(branch_fut, leaf_fut).await
        });
        let settled = future::join_all(cycles).await;

        let mut total_new = 0;
        let mut first_err = None;
        for (plan, (branches, leaves)) in plans.iter().zip(settled) {
            match self.settle(source, &plan.parent_key, branches, leaves) {
                Ok(num_new) => total_new += num_new,
                Err(err) => {
                    if first_err.is_none() {
                        first_err = Some(err);
                    }
                }
            }
        }
        self.publish(source);

        match first_err {
            Some(err) => Err(err),
            None => Ok(total_new > 0),
        }
    }

    /// Parents whose last-known child is inside the visible row range:
    /// the prefetch feedback that keeps apparent scroll length continuous.
    /// Feed the result to [`load_many`]; complete edges no-op there.
    ///
    /// [`load_many`]: Tree::load_many
    pub fn prefetch_targets(&self, visible: Range<usize>) -> Vec<S::Branch> {
        prefetch_targets(&self.flattened, visible, |key| {
            self.edges.branch_by_key(key).cloned()
        })
    }

    /// Upsert a branch under a parent (the root when `None`): any same-key
    /// sibling is replaced, the sibling list re-sorts, and the branch is
    /// registered in the tree-wide index.
    pub fn insert_branch(&mut self, source: &S, branch: S::Branch, parent: Option<&S::Branch>) {
        let parent_key = Self::parent_key_of(source, parent);

        #[cfg(feature = "tracing")]
        tracing::trace!(key = %source.branch_key(&branch), parent = %parent_key, "insert branch");

        self.edges.upsert_branch(
            &parent_key,
            branch,
            |b| source.branch_key(b),
            |a, b| source.branch_order(a, b),
        );
        self.publish(source);
    }

    /// Remove a branch from a parent's list by key. Descendant edges are
    /// not recursively deleted: they stay addressable (and re-attachable)
    /// but unreachable. Unknown keys are a silent no-op.
    pub fn delete_branch(&mut self, source: &S, branch: &S::Branch, parent: Option<&S::Branch>) {
        let parent_key = Self::parent_key_of(source, parent);
        let key = source.branch_key(branch);

        #[cfg(feature = "tracing")]
        tracing::trace!(key = %key, parent = %parent_key, "delete branch");

        if self.edges.remove_branch(&parent_key, &key, |b| source.branch_key(b)) {
            self.publish(source);
        }
    }

    /// Update a branch identified by key with partial fields, optionally
    /// moving it. The current parent is found by scanning all known edges
    /// (first match wins); fields merge via [`TreeSource::merge_branch`];
    /// the update is a delete + insert, which is what permits reparenting.
    /// A never-seen key is a silent no-op.
    pub fn update_branch(
        &mut self,
        source: &S,
        branch: S::Branch,
        reparent: Reparent<'_, S::Branch>,
    ) {
        let key = source.branch_key(&branch);
        let found = self.edges.find_branch_parent(&key, |b| source.branch_key(b));
        let (old_parent_key, existing) = match found {
            Some(found) => found,
            None => return,
        };

        let merged = source.merge_branch(&existing, branch);
        let new_parent_key = match reparent {
            Reparent::Keep => old_parent_key.clone(),
            Reparent::Root => ROOT_KEY.to_string(),
            Reparent::Under(parent) => source.branch_key(parent),
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(key = %key, from = %old_parent_key, to = %new_parent_key, "update branch");

        self.edges
            .remove_branch(&old_parent_key, &key, |b| source.branch_key(b));
        self.edges.upsert_branch(
            &new_parent_key,
            merged,
            |b| source.branch_key(b),
            |a, b| source.branch_order(a, b),
        );
        self.publish(source);
    }

    pub fn insert_leaf(&mut self, source: &S, leaf: S::Leaf, parent: Option<&S::Branch>) {
        let parent_key = Self::parent_key_of(source, parent);

        #[cfg(feature = "tracing")]
        tracing::trace!(key = %source.leaf_key(&leaf), parent = %parent_key, "insert leaf");

        self.edges.upsert_leaf(
            &parent_key,
            leaf,
            |l| source.leaf_key(l),
            |a, b| source.leaf_order(a, b),
        );
        self.publish(source);
    }

    /// Remove a leaf by key: from the given parent's list, or, with no
    /// parent hint, from every edge it appears in.
    pub fn delete_leaf(&mut self, source: &S, leaf: &S::Leaf, parent: Option<&S::Branch>) {
        let key = source.leaf_key(leaf);

        #[cfg(feature = "tracing")]
        tracing::trace!(key = %key, "delete leaf");

        let removed = match parent {
            Some(parent) => {
                let parent_key = source.branch_key(parent);
                self.edges.remove_leaf(&parent_key, &key, |l| source.leaf_key(l))
            }
            None => self.edges.remove_leaf_everywhere(&key, |l| source.leaf_key(l)),
        };
        if removed {
            self.publish(source);
        }
    }

    /// Update a leaf identified by key with partial fields, optionally
    /// moving it to another branch. Mirrors [`update_branch`].
    ///
    /// [`update_branch`]: Tree::update_branch
    pub fn update_leaf(&mut self, source: &S, leaf: S::Leaf, reparent: Reparent<'_, S::Branch>) {
        let key = source.leaf_key(&leaf);
        let found = self.edges.find_leaf_parent(&key, |l| source.leaf_key(l));
        let (old_parent_key, existing) = match found {
            Some(found) => found,
            None => return,
        };

        let merged = source.merge_leaf(&existing, leaf);
        let new_parent_key = match reparent {
            Reparent::Keep => old_parent_key.clone(),
            Reparent::Root => ROOT_KEY.to_string(),
            Reparent::Under(parent) => source.branch_key(parent),
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(key = %key, from = %old_parent_key, to = %new_parent_key, "update leaf");

        self.edges
            .remove_leaf(&old_parent_key, &key, |l| source.leaf_key(l));
        self.edges.upsert_leaf(
            &new_parent_key,
            merged,
            |l| source.leaf_key(l),
            |a, b| source.leaf_order(a, b),
        );
        self.publish(source);
    }

    /// Defer re-flattening while applying several mutations, publishing
    /// once when the outermost batch closure returns.
    pub fn batch<R>(&mut self, source: &S, f: impl FnOnce(&mut Self) -> R) -> R {
        let was_batching = self.batching;
        self.batching = true;
        let out = f(self);
        self.batching = was_batching;
        if !was_batching {
            self.publish(source);
        }
        out
    }

    /// Force a re-flatten of the published sequence.
    pub fn refresh(&mut self, source: &S) {
        self.publish(source);
    }

    fn plan(&mut self, source: &S, parent: Option<&S::Branch>) -> LoadPlan {
        let parent_key = Self::parent_key_of(source, parent);
        let is_root = parent.is_none() || parent_key == ROOT_KEY;
        loader::plan_load(
            &mut self.edges,
            &self.expansion,
            parent_key,
            is_root,
            self.options.flat,
            self.options.page_limit,
        )
    }

    fn settle(
        &mut self,
        source: &S,
        parent_key: &str,
        branches: Option<Result<FetchPage<S::Branch>, S::Error>>,
        leaves: Option<Result<FetchPage<S::Leaf>, S::Error>>,
    ) -> Result<usize, S::Error> {
        let mut num_new = 0;
        let mut first_err = None;

        if let Some(result) = branches {
            match loader::settle_branches(
                &mut self.edges,
                parent_key,
                result,
                |b| source.branch_key(b),
                |a, b| source.branch_order(a, b),
            ) {
                Ok(n) => num_new += n,
                Err(err) => first_err = Some(err),
            }
        }
        if let Some(result) = leaves {
            match loader::settle_leaves(
                &mut self.edges,
                parent_key,
                result,
                |l| source.leaf_key(l),
                |a, b| source.leaf_order(a, b),
            ) {
                Ok(n) => num_new += n,
                Err(err) => {
                    if first_err.is_none() {
                        first_err = Some(err);
                    }
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(num_new),
        }
    }

    fn publish(&mut self, source: &S) {
        if self.batching {
            return;
        }
        self.flattened = flatten_tree(source, &self.edges, &self.expansion, self.options.flat);
    }

    fn parent_key_of(source: &S, parent: Option<&S::Branch>) -> String {
        match parent {
            Some(parent) => source.branch_key(parent),
            None => ROOT_KEY.to_string(),
        }
    }
}
