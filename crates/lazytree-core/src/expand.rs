use indexmap::IndexMap;

/// Expanded branches, keyed by branch key. The map doubles as the lookup
/// from key back to the branch record that was expanded. Collapsing
/// removes the entry but never discards fetched children.
pub(crate) struct ExpansionTracker<B> {
    expanded: IndexMap<String, B>,
}

impl<B> ExpansionTracker<B> {
    pub(crate) fn new() -> Self {
        Self {
            expanded: IndexMap::new(),
        }
    }

    /// Returns true when the branch was not already expanded.
    pub(crate) fn expand(&mut self, key: String, branch: B) -> bool {
        self.expanded.insert(key, branch).is_none()
    }

    /// Returns true when the branch was expanded.
    pub(crate) fn collapse(&mut self, key: &str) -> bool {
        self.expanded.shift_remove(key).is_some()
    }

    pub(crate) fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains_key(key)
    }

    /// Expanded branch records, in expansion order.
    pub(crate) fn branches(&self) -> impl Iterator<Item = &B> {
        self.expanded.values()
    }
}
