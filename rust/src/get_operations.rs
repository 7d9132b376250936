//! GET operations for BPlusTree.
//!
//! Membership lookup and the descent helper shared by insert and delete.

use crate::types::{BPlusTree, Node, NodeId};

impl<K: Ord + Clone> BPlusTree<K> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Returns true if `key` is stored in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// tree.insert(1);
    /// assert!(tree.find(&1));
    /// assert!(!tree.find(&2));
    /// ```
    pub fn find(&self, key: &K) -> bool {
        self.find_leaf(key)
            .is_some_and(|leaf| self.arena[leaf].contains_key(key))
    }

    /// Alias for [`find`](Self::find).
    pub fn contains(&self, key: &K) -> bool {
        self.find(key)
    }

    // ============================================================================
    // DESCENT
    // ============================================================================

    /// Walk from the root to the leaf responsible for `key`.
    /// Returns `None` only when the tree is empty.
    pub(crate) fn find_leaf(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root?;
        loop {
            let node = &self.arena[current];
            if node.is_leaf() {
                return Some(current);
            }
            current = node.children[node.find_child_index(key)];
        }
    }

    // ============================================================================
    // ARENA ACCESS METHODS
    // ============================================================================

    /// Id of the root node, if any.
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Read-only view of a live node.
    pub fn get_node(&self, id: NodeId) -> Option<&Node<K>> {
        self.arena.get(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::BPlusTree;

    #[test]
    fn test_find_on_empty_tree() {
        let tree = BPlusTree::<i64>::new(4).unwrap();
        assert!(!tree.find(&0));
        assert!(!tree.contains(&i64::MIN));
        assert!(tree.find_leaf(&0).is_none());
    }

    #[test]
    fn test_find_across_levels() {
        let mut tree = BPlusTree::new(4).unwrap();
        for key in (0..100).step_by(2) {
            tree.insert(key);
        }
        assert!(tree.height() > 2);
        for key in 0..100 {
            assert_eq!(tree.find(&key), key % 2 == 0, "key {}", key);
        }
    }

    #[test]
    fn test_find_leaf_lands_on_leaf_holding_key() {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in 1..=20 {
            tree.insert(key);
        }
        for key in 1..=20 {
            let leaf = tree.find_leaf(&key).unwrap();
            let node = tree.get_node(leaf).unwrap();
            assert!(node.is_leaf());
            assert!(node.keys().contains(&key));
        }
    }
}
