/// Payload of a flattened row: exactly one of branch or leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeItem<B, L> {
    Branch(B),
    Leaf(L),
}

/// One row of the flattened sequence.
///
/// `parent_key` names the edge the row belongs to: the containing branch's
/// key for leaf rows (the root sentinel for root-level leaves), the
/// grandparent's key for branch rows, absent for top-level branch rows.
/// `parents` is the ancestor chain, nearest parent last; its length is the
/// row's depth. Sibling metadata (`local_index`, `is_first`, `is_last`) is
/// relative to the filtered sibling group the row was emitted from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayNode<B, L> {
    pub parent_key: Option<String>,
    pub parents: Vec<B>,
    pub item: NodeItem<B, L>,
    pub local_index: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub has_branches: bool,
    pub has_leaves: bool,
    /// Leaf rows only: the containing leaf edge has not been fetched to
    /// completion, so more siblings may follow this group.
    pub has_more: bool,
}

impl<B, L> DisplayNode<B, L> {
    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    pub fn has_parent(&self) -> bool {
        !self.parents.is_empty()
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.item, NodeItem::Branch(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.item, NodeItem::Leaf(_))
    }

    pub fn branch(&self) -> Option<&B> {
        match &self.item {
            NodeItem::Branch(b) => Some(b),
            NodeItem::Leaf(_) => None,
        }
    }

    pub fn leaf(&self) -> Option<&L> {
        match &self.item {
            NodeItem::Branch(_) => None,
            NodeItem::Leaf(l) => Some(l),
        }
    }
}
