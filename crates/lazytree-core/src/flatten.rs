use crate::edge::EdgeKind;
use crate::edge::EdgeStore;
use crate::expand::ExpansionTracker;
use crate::node::DisplayNode;
use crate::node::NodeItem;
use crate::source::ROOT_KEY;
use crate::source::TreeSource;

/// Sibling metadata a parent assigns to each of its branch children.
#[derive(Clone, Copy)]
struct Slot {
    local_index: usize,
    is_first: bool,
    is_last: bool,
    has_branches: bool,
    has_leaves: bool,
}

/// Project the cached tree into the ordered row sequence, depth-first
/// pre-order. Pure over the current store + expansion snapshot: the full
/// result is recomputed on every call, and cost is linear in the number
/// of expansion-reachable rows, not total tree size.
pub(crate) fn flatten_tree<S: TreeSource>(
    source: &S,
    edges: &EdgeStore<S::Branch, S::Leaf>,
    expansion: &ExpansionTracker<S::Branch>,
    flat: bool,
) -> Vec<DisplayNode<S::Branch, S::Leaf>> {
    let mut out = Vec::new();
    let mut parents = Vec::new();
    walk(source, edges, expansion, flat, None, &mut parents, &mut out);
    out
}

fn walk<S: TreeSource>(
    source: &S,
    edges: &EdgeStore<S::Branch, S::Leaf>,
    expansion: &ExpansionTracker<S::Branch>,
    flat: bool,
    node: Option<(&S::Branch, Slot)>,
    parents: &mut Vec<S::Branch>,
    out: &mut Vec<DisplayNode<S::Branch, S::Leaf>>,
) {
    let branch_key = match node {
        Some((branch, _)) => source.branch_key(branch),
        None => ROOT_KEY.to_string(),
    };

    // The implicit root contributes no row of its own.
    if let Some((branch, slot)) = node {
        out.push(DisplayNode {
            parent_key: parents.last().map(|p| source.branch_key(p)),
            parents: parents.clone(),
            item: NodeItem::Branch(branch.clone()),
            local_index: slot.local_index,
            is_first: slot.is_first,
            is_last: slot.is_last,
            has_branches: slot.has_branches,
            has_leaves: slot.has_leaves,
            has_more: false,
        });
    }

    let is_expanded = node.is_none() || expansion.is_expanded(&branch_key);

    let sub_branches: Vec<&S::Branch> = if is_expanded {
        edges
            .branches_of(&branch_key)
            .iter()
            .filter(|b| source.retain_branch(b))
            .collect()
    } else {
        Vec::new()
    };
    let sub_leaves: Vec<&S::Leaf> = if is_expanded {
        edges
            .leaves_of(&branch_key)
            .iter()
            .filter(|l| source.retain_leaf(l))
            .collect()
    } else {
        Vec::new()
    };

    let has_more_leaves = !edges
        .state(&branch_key, EdgeKind::Leaves)
        .is_some_and(|s| s.complete);

    if let Some((branch, _)) = node {
        parents.push(branch.clone());
    }

    if !flat {
        let count = sub_branches.len();
        for (i, sub) in sub_branches.iter().enumerate() {
            let slot = Slot {
                local_index: i,
                is_first: i == 0,
                is_last: i + 1 == count,
                has_branches: true,
                has_leaves: count > 0,
            };
            walk(source, edges, expansion, flat, Some((*sub, slot)), parents, out);
        }
    }

    let count = sub_leaves.len();
    for (i, leaf) in sub_leaves.iter().enumerate() {
        out.push(DisplayNode {
            parent_key: Some(branch_key.clone()),
            parents: parents.clone(),
            item: NodeItem::Leaf((*leaf).clone()),
            local_index: i,
            is_first: i == 0,
            is_last: i + 1 == count,
            has_branches: !sub_branches.is_empty(),
            has_leaves: true,
            has_more: has_more_leaves,
        });
    }

    if node.is_some() {
        parents.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeState;
    use crate::source::FetchPage;
    use std::cmp::Ordering;

    struct Fixture {
        drop_leaf: Option<&'static str>,
    }

    impl Fixture {
        fn new() -> Self {
            Self { drop_leaf: None }
        }
    }

    impl TreeSource for Fixture {
        type Branch = &'static str;
        type Leaf = &'static str;
        type Error = ();

        fn branch_key(&self, branch: &Self::Branch) -> String {
            (*branch).to_string()
        }

        fn leaf_key(&self, leaf: &Self::Leaf) -> String {
            (*leaf).to_string()
        }

        async fn fetch_branches(
            &self,
            _parent: Option<&Self::Branch>,
            _edge: EdgeState,
        ) -> Result<FetchPage<Self::Branch>, Self::Error> {
            Ok(FetchPage::empty())
        }

        async fn fetch_leaves(
            &self,
            _parent: Option<&Self::Branch>,
            _edge: EdgeState,
        ) -> Result<FetchPage<Self::Leaf>, Self::Error> {
            Ok(FetchPage::empty())
        }

        fn retain_leaf(&self, leaf: &Self::Leaf) -> bool {
            self.drop_leaf != Some(*leaf)
        }
    }

    fn unsorted<T>(_: &T, _: &T) -> Ordering {
        Ordering::Equal
    }

    fn store() -> EdgeStore<&'static str, &'static str> {
        EdgeStore::new()
    }

    #[test]
    fn sibling_flags_over_three_leaves() {
        let source = Fixture::new();
        let mut edges = store();
        edges.merge_leaves(ROOT_KEY, vec!["x", "y", "z"], |l| l.to_string(), unsorted);
        let expansion = ExpansionTracker::new();

        let rows = flatten_tree(&source, &edges, &expansion, false);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_first && !rows[0].is_last);
        assert!(!rows[1].is_first && !rows[1].is_last);
        assert!(!rows[2].is_first && rows[2].is_last);
        assert_eq!(rows[1].local_index, 1);
        assert_eq!(rows[2].parent_key.as_deref(), Some(ROOT_KEY));
    }

    #[test]
    fn unexpanded_branch_contributes_only_its_row() {
        let source = Fixture::new();
        let mut edges = store();
        edges.merge_branches(ROOT_KEY, vec!["a"], |b| b.to_string(), unsorted);
        edges.merge_leaves("a", vec!["a1", "a2"], |l| l.to_string(), unsorted);
        let mut expansion = ExpansionTracker::new();

        let rows = flatten_tree(&source, &edges, &expansion, false);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_branch());
        assert!(rows[0].has_leaves);
        assert!(rows[0].parent_key.is_none());

        expansion.expand("a".into(), "a");
        let rows = flatten_tree(&source, &edges, &expansion, false);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].leaf(), Some(&"a1"));
        assert_eq!(rows[1].parents, vec!["a"]);
        assert_eq!(rows[1].depth(), 1);
        assert!(rows[2].is_last);
    }

    #[test]
    fn flat_mode_emits_root_leaves_only() {
        let source = Fixture::new();
        let mut edges = store();
        edges.merge_branches(ROOT_KEY, vec!["a"], |b| b.to_string(), unsorted);
        edges.merge_leaves(ROOT_KEY, vec!["r1", "r2"], |l| l.to_string(), unsorted);
        edges.merge_leaves("a", vec!["a1"], |l| l.to_string(), unsorted);
        let mut expansion = ExpansionTracker::new();
        expansion.expand("a".into(), "a");

        let rows = flatten_tree(&source, &edges, &expansion, true);
        let leaves: Vec<_> = rows.iter().filter_map(|n| n.leaf().copied()).collect();
        assert_eq!(leaves, vec!["r1", "r2"]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn filtered_rows_recompute_sibling_flags() {
        let mut source = Fixture::new();
        source.drop_leaf = Some("y");
        let mut edges = store();
        edges.merge_leaves(ROOT_KEY, vec!["x", "y", "z"], |l| l.to_string(), unsorted);
        let expansion = ExpansionTracker::new();

        let rows = flatten_tree(&source, &edges, &expansion, false);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].leaf(), Some(&"x"));
        assert!(rows[0].is_first && !rows[0].is_last);
        assert_eq!(rows[1].leaf(), Some(&"z"));
        assert_eq!(rows[1].local_index, 1);
        assert!(rows[1].is_last);
    }

    #[test]
    fn flatten_is_idempotent_without_state_changes() {
        let source = Fixture::new();
        let mut edges = store();
        edges.merge_branches(ROOT_KEY, vec!["a", "b"], |b| b.to_string(), unsorted);
        edges.merge_leaves("a", vec!["a1"], |l| l.to_string(), unsorted);
        let mut expansion = ExpansionTracker::new();
        expansion.expand("a".into(), "a");

        let first = flatten_tree(&source, &edges, &expansion, false);
        let second = flatten_tree(&source, &edges, &expansion, false);
        assert_eq!(first, second);
    }

    #[test]
    fn leaf_rows_carry_edge_incompleteness() {
        let source = Fixture::new();
        let mut edges = store();
        edges.merge_leaves(ROOT_KEY, vec!["x"], |l| l.to_string(), unsorted);
        let expansion = ExpansionTracker::new();

        // No edge state recorded yet: more data may exist.
        let rows = flatten_tree(&source, &edges, &expansion, false);
        assert!(rows[0].has_more);

        edges.ensure(ROOT_KEY, 10);
        if let Some(state) = edges.state_mut(ROOT_KEY, EdgeKind::Leaves) {
            state.complete = true;
        }
        let rows = flatten_tree(&source, &edges, &expansion, false);
        assert!(!rows[0].has_more);
    }
}
