use std::ops::Range;

use indexmap::IndexSet;

use crate::node::DisplayNode;

/// Viewport feedback: given the visible slice of the flattened sequence,
/// collect the parents whose last-known child is on screen. Rows flagged
/// `is_last` contribute their parent key; keys are de-duplicated in first-
/// seen order and resolved through `resolve` (the tree-wide branch index),
/// so the root sentinel and unknown keys drop out.
pub(crate) fn prefetch_targets<B, L, R>(
    nodes: &[DisplayNode<B, L>],
    visible: Range<usize>,
    resolve: R,
) -> Vec<B>
where
    R: Fn(&str) -> Option<B>,
{
    let end = visible.end.min(nodes.len());
    let start = visible.start.min(end);

    let mut keys: IndexSet<&str> = IndexSet::new();
    for node in &nodes[start..end] {
        if node.is_last {
            if let Some(key) = node.parent_key.as_deref() {
                keys.insert(key);
            }
        }
    }

    keys.into_iter().filter_map(|key| resolve(key)).collect()
}
