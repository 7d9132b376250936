//! Node-level helpers for BPlusTree.
//!
//! A node only knows its own keys and links. Occupancy checks take the tree's
//! `max_degree` as an argument since nodes do not store it.

use crate::types::{Node, NodeId};

impl<K: Ord> Node<K> {
    // ============================================================================
    // SEARCH
    // ============================================================================

    /// Returns true if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the number of keys in this node.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this node holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sorted keys of this node.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child ids of this node, empty for a leaf.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent id, `NULL_NODE` for the root.
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Previous leaf in the chain, `NULL_NODE` at the left end.
    pub fn prev_leaf(&self) -> NodeId {
        self.prev
    }

    /// Next leaf in the chain, `NULL_NODE` at the right end.
    pub fn next_leaf(&self) -> NodeId {
        self.next
    }

    /// Index of the child to descend into for `key`: the number of
    /// separators less than or equal to `key`.
    #[inline]
    pub fn find_child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Exact match among this node's keys.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.keys.binary_search(key).is_ok()
    }

    /// Position of `child` among this node's children.
    pub fn child_position(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&id| id == child)
    }

    // ============================================================================
    // KEY EDITS
    // ============================================================================

    /// Insert `key` at its sorted position. Returns false if already present.
    pub fn insert_key(&mut self, key: K) -> bool {
        match self.keys.binary_search(&key) {
            Ok(_) => false,
            Err(index) => {
                self.keys.insert(index, key);
                true
            }
        }
    }

    /// Remove `key`. Returns false if absent.
    pub fn remove_key(&mut self, key: &K) -> bool {
        match self.keys.binary_search(key) {
            Ok(index) => {
                self.keys.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    // ============================================================================
    // OCCUPANCY
    // ============================================================================

    /// Minimum number of keys a non-root node of this kind must hold.
    ///
    /// Leaves keep `floor(max_degree / 2)`. Internal nodes keep
    /// `ceil(max_degree / 2) - 1`, the size of the right half of an internal
    /// split.
    #[inline]
    pub fn min_keys(&self, max_degree: usize) -> usize {
        if self.is_leaf() {
            max_degree / 2
        } else {
            (max_degree - 1) / 2
        }
    }

    /// Returns true if this node has reached `max_degree` keys and must split.
    #[inline]
    pub fn needs_split(&self, max_degree: usize) -> bool {
        self.keys.len() >= max_degree
    }

    /// Returns true if this node is below minimum occupancy.
    #[inline]
    pub fn is_underfull(&self, max_degree: usize) -> bool {
        self.keys.len() < self.min_keys(max_degree)
    }

    /// Returns true if this node can give one key to a sibling.
    #[inline]
    pub fn can_donate(&self, max_degree: usize) -> bool {
        self.keys.len() > self.min_keys(max_degree)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{Node, NULL_NODE};

    #[test]
    fn test_find_child_index_uses_upper_bound() {
        let branch = Node::branch(vec![5, 10], vec![0, 1, 2]);
        assert_eq!(branch.find_child_index(&3), 0);
        assert_eq!(branch.find_child_index(&5), 1);
        assert_eq!(branch.find_child_index(&7), 1);
        assert_eq!(branch.find_child_index(&10), 2);
        assert_eq!(branch.find_child_index(&15), 2);
    }

    #[test]
    fn test_insert_and_remove_key() {
        let mut leaf = Node::leaf(vec![1, 5]);
        assert!(leaf.insert_key(3));
        assert!(!leaf.insert_key(3));
        assert_eq!(leaf.keys(), &[1, 3, 5]);
        assert!(leaf.remove_key(&1));
        assert!(!leaf.remove_key(&1));
        assert_eq!(leaf.keys(), &[3, 5]);
        assert!(leaf.contains_key(&5));
        assert!(!leaf.contains_key(&4));
    }

    #[test]
    fn test_min_keys_per_kind() {
        let leaf: Node<i64> = Node::leaf(Vec::new());
        let branch: Node<i64> = Node::branch(Vec::new(), vec![NULL_NODE]);
        assert_eq!(leaf.min_keys(4), 2);
        assert_eq!(branch.min_keys(4), 1);
        assert_eq!(leaf.min_keys(5), 2);
        assert_eq!(branch.min_keys(5), 2);
        assert_eq!(leaf.min_keys(2), 1);
        assert_eq!(branch.min_keys(2), 0);
    }

    #[test]
    fn test_occupancy_checks() {
        let mut leaf = Node::leaf(vec![1, 2, 3]);
        assert!(!leaf.needs_split(4));
        assert!(leaf.can_donate(4));
        leaf.insert_key(4);
        assert!(leaf.needs_split(4));
        let short = Node::leaf(vec![1]);
        assert!(short.is_underfull(4));
        assert!(!short.can_donate(4));
    }

    #[test]
    fn test_child_position() {
        let branch: Node<i64> = Node::branch(vec![5], vec![7, 9]);
        assert_eq!(branch.child_position(9), Some(1));
        assert_eq!(branch.child_position(3), None);
    }
}
