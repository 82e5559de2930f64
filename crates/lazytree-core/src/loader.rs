use std::cmp::Ordering;

use crate::edge::EdgeKind;
use crate::edge::EdgeState;
use crate::edge::EdgeStore;
use crate::expand::ExpansionTracker;
use crate::source::FetchPage;

/// One planned fetch cycle for a parent. `fetch_branches` / `fetch_leaves`
/// are the admission decisions for this cycle; the edge snapshots are what
/// the accessors receive.
pub(crate) struct LoadPlan {
    pub(crate) parent_key: String,
    pub(crate) fetch_branches: bool,
    pub(crate) fetch_leaves: bool,
    pub(crate) branch_edge: EdgeState,
    pub(crate) leaf_edge: EdgeState,
}

/// Decide what this cycle fetches and mark those edges loading.
///
/// Branch fetches are gated only by edge state and flat mode; leaf fetches
/// additionally require the parent to be the root or expanded. An edge that
/// is already loading or complete is skipped for this cycle; skipped
/// fetches are not queued and never alter `complete`. Only the edges
/// actually fetched are marked `loading`, and the snapshots handed to
/// accessors are taken before the mark.
pub(crate) fn plan_load<B: Clone, L: Clone>(
    edges: &mut EdgeStore<B, L>,
    expansion: &ExpansionTracker<B>,
    parent_key: String,
    is_root: bool,
    flat: bool,
    limit: usize,
) -> LoadPlan {
    edges.ensure(&parent_key, limit);

    let branch_edge = edges
        .state(&parent_key, EdgeKind::Branches)
        .cloned()
        .unwrap_or_else(|| EdgeState::with_limit(limit));
    let leaf_edge = edges
        .state(&parent_key, EdgeKind::Leaves)
        .cloned()
        .unwrap_or_else(|| EdgeState::with_limit(limit));

    let is_expanded = is_root || expansion.is_expanded(&parent_key);
    let fetch_branches = !branch_edge.complete && !branch_edge.loading && !flat;
    let fetch_leaves = !leaf_edge.complete && !leaf_edge.loading && is_expanded;

    if fetch_branches {
        if let Some(state) = edges.state_mut(&parent_key, EdgeKind::Branches) {
            state.loading = true;
        }
    }
    if fetch_leaves {
        if let Some(state) = edges.state_mut(&parent_key, EdgeKind::Leaves) {
            state.loading = true;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        parent = %parent_key,
        branches = fetch_branches,
        leaves = fetch_leaves,
        "load cycle planned"
    );

    LoadPlan {
        parent_key,
        fetch_branches,
        fetch_leaves,
        branch_edge,
        leaf_edge,
    }
}

/// Settle an attempted branch fetch: clear `loading` either way, then on
/// success apply the returned page bookkeeping, merge the items, and mark
/// the edge complete when nothing net-new arrived. On failure the edge is
/// left incomplete so a later trigger retries.
pub(crate) fn settle_branches<B: Clone, L: Clone, E>(
    edges: &mut EdgeStore<B, L>,
    parent_key: &str,
    result: Result<FetchPage<B>, E>,
    key_of: impl Fn(&B) -> String,
    cmp: impl Fn(&B, &B) -> Ordering,
) -> Result<usize, E> {
    if let Some(state) = edges.state_mut(parent_key, EdgeKind::Branches) {
        state.loading = false;
    }
    let page = result?;
    if let Some(state) = edges.state_mut(parent_key, EdgeKind::Branches) {
        page.page.apply(state);
    }
    let num_new = edges.merge_branches(parent_key, page.items, key_of, cmp);
    if num_new == 0 {
        if let Some(state) = edges.state_mut(parent_key, EdgeKind::Branches) {
            state.complete = true;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(parent = %parent_key, num_new, "branches merged");

    Ok(num_new)
}

pub(crate) fn settle_leaves<B: Clone, L: Clone, E>(
    edges: &mut EdgeStore<B, L>,
    parent_key: &str,
    result: Result<FetchPage<L>, E>,
    key_of: impl Fn(&L) -> String,
    cmp: impl Fn(&L, &L) -> Ordering,
) -> Result<usize, E> {
    if let Some(state) = edges.state_mut(parent_key, EdgeKind::Leaves) {
        state.loading = false;
    }
    let page = result?;
    if let Some(state) = edges.state_mut(parent_key, EdgeKind::Leaves) {
        page.page.apply(state);
    }
    let num_new = edges.merge_leaves(parent_key, page.items, key_of, cmp);
    if num_new == 0 {
        if let Some(state) = edges.state_mut(parent_key, EdgeKind::Leaves) {
            state.complete = true;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(parent = %parent_key, num_new, "leaves merged");

    Ok(num_new)
}
