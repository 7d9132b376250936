//! INSERT operations for BPlusTree.
//!
//! Insertion places the key in its leaf and then splits overflowing nodes
//! bottom-up, growing a new root when the old one splits.

use tracing::{debug, trace};

use crate::error::{BPlusTreeError, ModifyResult};
use crate::types::{BPlusTree, Node, NodeId, NULL_NODE};

impl<K: Ord + Clone> BPlusTree<K> {
    /// Insert `key`. Returns false, leaving the tree untouched, if it is
    /// already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// assert!(tree.insert(5));
    /// assert!(!tree.insert(5));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        let Some(leaf) = self.find_leaf(&key) else {
            let root = self.arena.allocate(Node::leaf(vec![key]));
            self.root = Some(root);
            self.len = 1;
            return true;
        };

        if !self.arena[leaf].insert_key(key) {
            return false;
        }
        self.len += 1;

        let mut node = leaf;
        while self.arena[node].needs_split(self.max_degree) {
            node = self.split(node);
        }
        true
    }

    /// Insert `key`, reporting a duplicate as an error.
    pub fn try_insert(&mut self, key: K) -> ModifyResult<()> {
        if self.insert(key) {
            Ok(())
        } else {
            Err(BPlusTreeError::DuplicateKey)
        }
    }

    /// Split a node holding `max_degree` keys into itself (left half) and a
    /// new right sibling, pushing the median into the parent. Returns the
    /// parent, which may now need splitting in turn.
    fn split(&mut self, node: NodeId) -> NodeId {
        let parent = match self.arena[node].parent {
            NULL_NODE => self.grow_root(node),
            parent => parent,
        };

        let mid = self.arena[node].len() / 2;
        let (right, separator) = if self.arena[node].is_leaf() {
            self.split_leaf(node, mid)
        } else {
            self.split_branch(node, mid)
        };
        self.arena[right].parent = parent;

        let position = self.arena[parent]
            .child_position(node)
            .expect("split node missing from its parent");
        let parent_node = &mut self.arena[parent];
        debug_assert!(parent_node.find_child_index(&separator) == position);
        parent_node.keys.insert(position, separator);
        parent_node.children.insert(position + 1, right);

        trace!(node, right, parent, "split node");
        parent
    }

    /// Leaf split: the right leaf keeps a copy of the median, since every key
    /// must stay in a leaf. The new leaf is spliced into the chain.
    fn split_leaf(&mut self, node: NodeId, mid: usize) -> (NodeId, K) {
        let right_keys = self.arena[node].keys.split_off(mid);
        let separator = right_keys[0].clone();
        let old_next = self.arena[node].next;

        let mut right_leaf = Node::leaf(right_keys);
        right_leaf.prev = node;
        right_leaf.next = old_next;
        let right = self.arena.allocate(right_leaf);

        self.arena[node].next = right;
        if old_next != NULL_NODE {
            self.arena[old_next].prev = right;
        }
        (right, separator)
    }

    /// Internal split: the median moves up and is not kept in either half.
    fn split_branch(&mut self, node: NodeId, mid: usize) -> (NodeId, K) {
        let left = &mut self.arena[node];
        let right_keys = left.keys.split_off(mid + 1);
        let right_children = left.children.split_off(mid + 1);
        let separator = left.keys.pop().expect("median key present in full node");

        let right = self.arena.allocate(Node::branch(right_keys, right_children));
        for i in 0..self.arena[right].children.len() {
            let child = self.arena[right].children[i];
            self.arena[child].parent = right;
        }
        (right, separator)
    }

    /// Put a new internal root above `old_root`.
    fn grow_root(&mut self, old_root: NodeId) -> NodeId {
        let new_root = self.arena.allocate(Node::branch(Vec::new(), vec![old_root]));
        self.arena[old_root].parent = new_root;
        self.root = Some(new_root);
        debug!(new_root, old_root, "tree grew a level");
        new_root
    }
}

impl<K: Ord + Clone> Extend<K> for BPlusTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
