//! Namespace Index: a trie over dot-separated namespace segments.
//!
//! Each node carries an optional explicit owner (a file that provides the
//! namespace) and an optional implicit owner (a provide file whose explicit
//! namespaces extend below this node). Explicit ownership always wins.

use std::collections::BTreeMap;

/// Position of a record in the graph's discovery order.
pub type RecordId = usize;

#[derive(Debug, Default, Clone)]
struct Node {
    owner: Option<RecordId>,
    implicit: Option<RecordId>,
    children: BTreeMap<String, Node>,
}

#[derive(Debug, Default, Clone)]
pub struct NamespaceIndex {
    root: Node,
}

impl NamespaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` as explicit owner of `namespace`.
    ///
    /// Returns `Err(existing)` when another record already owns it; the
    /// existing owner is kept. Any implicit owner on the node is dropped.
    pub fn insert(&mut self, namespace: &str, id: RecordId) -> Result<(), RecordId> {
        let node = self.node_mut(namespace);
        match node.owner {
            Some(existing) if existing != id => Err(existing),
            _ => {
                node.owner = Some(id);
                node.implicit = None;
                Ok(())
            }
        }
    }

    /// Register `id` as implicit owner of `namespace`.
    ///
    /// Ignored when the node has an explicit owner or an earlier implicit claimant.
    pub fn insert_implicit(&mut self, namespace: &str, id: RecordId) {
        let node = self.node_mut(namespace);
        if node.owner.is_none() && node.implicit.is_none() {
            node.implicit = Some(id);
        }
    }

    /// Explicit owner of `namespace`.
    pub fn get(&self, namespace: &str) -> Option<RecordId> {
        self.node(namespace).and_then(|node| node.owner)
    }

    /// Implicit owner of `namespace` (only set when there is no explicit owner).
    pub fn implicit_owner(&self, namespace: &str) -> Option<RecordId> {
        self.node(namespace).and_then(|node| node.implicit)
    }

    /// Direct child segments of `namespace` in lexical order (`""` for the roots).
    pub fn children(&self, namespace: &str) -> Vec<&str> {
        let node = if namespace.is_empty() {
            Some(&self.root)
        } else {
            self.node(namespace)
        };
        node.map(|node| node.children.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.root = Node::default();
    }

    fn node(&self, namespace: &str) -> Option<&Node> {
        let mut node = &self.root;
        for segment in namespace.split('.') {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, namespace: &str) -> &mut Node {
        let mut node = &mut self.root;
        for segment in namespace.split('.') {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_insert_and_get() {
        let mut index = NamespaceIndex::new();
        assert_eq!(index.insert("a.b.c", 0), Ok(()));
        assert_eq!(index.get("a.b.c"), Some(0));
        assert_eq!(index.get("a.b"), None);
        assert_eq!(index.get("x"), None);
    }

    #[test]
    fn test_duplicate_keeps_first_owner() {
        let mut index = NamespaceIndex::new();
        index.insert("a.b", 0).unwrap();
        assert_eq!(index.insert("a.b", 1), Err(0));
        assert_eq!(index.get("a.b"), Some(0));
        // re-inserting by the same owner is not a conflict
        assert_eq!(index.insert("a.b", 0), Ok(()));
    }

    #[test]
    fn test_explicit_wins_over_implicit() {
        let mut index = NamespaceIndex::new();
        index.insert_implicit("a", 0);
        assert_eq!(index.implicit_owner("a"), Some(0));

        index.insert("a", 1).unwrap();
        assert_eq!(index.get("a"), Some(1));
        assert_eq!(index.implicit_owner("a"), None);

        index.insert_implicit("a", 2);
        assert_eq!(index.implicit_owner("a"), None);
    }

    #[test]
    fn test_first_implicit_claimant_wins() {
        let mut index = NamespaceIndex::new();
        index.insert_implicit("goog", 3);
        index.insert_implicit("goog", 1);
        assert_eq!(index.implicit_owner("goog"), Some(3));
    }

    #[test]
    fn test_children_are_ordered() {
        let mut index = NamespaceIndex::new();
        index.insert("a.c", 0).unwrap();
        index.insert("a.b", 1).unwrap();
        assert_eq!(index.children("a"), vec!["b", "c"]);
        assert_eq!(index.children(""), vec!["a"]);
        index.clear();
        assert!(index.is_empty());
    }
}
