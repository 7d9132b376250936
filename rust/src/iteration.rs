//! Ordered traversal of BPlusTree keys.
//!
//! The iterator finds the leftmost leaf once, then follows the leaf chain.

use crate::types::{BPlusTree, Node, NodeId, NULL_NODE};

/// Iterator over the keys of a B+ tree in ascending order.
pub struct KeyIterator<'a, K> {
    tree: &'a BPlusTree<K>,
    current_leaf: Option<&'a Node<K>>,
    index: usize,
    remaining: usize,
}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Returns an iterator over all keys in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// tree.extend([5, 1, 4, 2, 3]);
    /// let keys: Vec<_> = tree.keys().copied().collect();
    /// assert_eq!(keys, vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn keys(&self) -> KeyIterator<'_, K> {
        KeyIterator {
            tree: self,
            current_leaf: self.first_leaf_id().map(|id| &self.arena[id]),
            index: 0,
            remaining: self.len,
        }
    }
}

impl<'a, K> KeyIterator<'a, K> {
    fn leaf(&self, id: NodeId) -> Option<&'a Node<K>> {
        if id == NULL_NODE {
            None
        } else {
            self.tree.arena.get(id)
        }
    }
}

impl<'a, K> Iterator for KeyIterator<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.current_leaf?;
            if let Some(key) = leaf.keys.get(self.index) {
                self.index += 1;
                self.remaining = self.remaining.saturating_sub(1);
                return Some(key);
            }
            self.current_leaf = self.leaf(leaf.next);
            self.index = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K> ExactSizeIterator for KeyIterator<'a, K> {}

impl<'a, K: Ord + Clone> IntoIterator for &'a BPlusTree<K> {
    type Item = &'a K;
    type IntoIter = KeyIterator<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}
