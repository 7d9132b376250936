//! DELETE operations for BPlusTree.
//!
//! Deletion removes the key from its leaf and then repairs underflow
//! bottom-up: borrow a key from a sibling that can spare one, otherwise merge
//! with a sibling and let the parent absorb the lost separator. An internal
//! root left without keys collapses into its only child.

use tracing::{debug, trace};

use crate::error::{BPlusTreeError, ModifyResult};
use crate::types::{BPlusTree, Node, NodeId, Side, NULL_NODE};

impl<K: Ord + Clone> BPlusTree<K> {
    /// Remove `key`. Returns false, leaving the tree untouched, if it is
    /// absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// tree.insert(3);
    /// assert!(tree.delete(&3));
    /// assert!(!tree.delete(&3));
    /// ```
    pub fn delete(&mut self, key: &K) -> bool {
        let Some(leaf) = self.find_leaf(key) else {
            return false;
        };
        if !self.arena[leaf].remove_key(key) {
            return false;
        }
        self.len -= 1;
        self.rebalance_from(leaf);
        true
    }

    /// Remove `key`, reporting an absent key as an error.
    pub fn try_delete(&mut self, key: &K) -> ModifyResult<()> {
        if self.delete(key) {
            Ok(())
        } else {
            Err(BPlusTreeError::KeyNotFound)
        }
    }

    // ============================================================================
    // UNDERFLOW REPAIR
    // ============================================================================

    /// Walk upward from `node`, repairing underflow until a level is valid.
    fn rebalance_from(&mut self, mut node: NodeId) {
        loop {
            if self.arena[node].parent == NULL_NODE {
                self.shrink_root();
                return;
            }
            if !self.arena[node].is_underfull(self.max_degree) {
                return;
            }
            match self.fix_underflow(node) {
                Some(parent) => node = parent,
                None => return,
            }
        }
    }

    /// Borrow into or merge an underfull non-root node. Returns the parent
    /// when a merge took one of its separators.
    fn fix_underflow(&mut self, node: NodeId) -> Option<NodeId> {
        self.ensure_sibling(node);
        let (parent, index) = self.parent_and_index(node);

        match self.donor_sibling(parent, index) {
            Some(Side::Left) => {
                self.borrow_from_left(node, parent, index);
                None
            }
            Some(Side::Right) => {
                self.borrow_from_right(node, parent, index);
                None
            }
            None => {
                self.merge(node, parent, index);
                Some(parent)
            }
        }
    }

    /// Sibling of `parent.children[index]` holding more than its minimum,
    /// left preferred.
    fn donor_sibling(&self, parent: NodeId, index: usize) -> Option<Side> {
        let children = &self.arena[parent].children;
        if index > 0 && self.arena[children[index - 1]].can_donate(self.max_degree) {
            return Some(Side::Left);
        }
        if index + 1 < children.len()
            && self.arena[children[index + 1]].can_donate(self.max_degree)
        {
            return Some(Side::Right);
        }
        None
    }

    /// With `max_degree == 2` an internal node can hold no keys and a single
    /// child, leaving its child without siblings. Rebalance such a parent
    /// against its own sibling first so `node` gains one.
    fn ensure_sibling(&mut self, node: NodeId) {
        let parent = self.arena[node].parent;
        if self.arena[parent].children.len() > 1 {
            return;
        }
        debug_assert!(self.arena[parent].is_empty());
        debug_assert_ne!(self.arena[parent].parent, NULL_NODE);

        self.ensure_sibling(parent);
        let (grand, index) = self.parent_and_index(parent);
        match self.donor_sibling(grand, index) {
            Some(Side::Left) => self.borrow_from_left(parent, grand, index),
            Some(Side::Right) => self.borrow_from_right(parent, grand, index),
            None => {
                self.merge(parent, grand, index);
                self.rebalance_from(grand);
            }
        }
    }

    // ============================================================================
    // BORROWING
    // ============================================================================

    /// Move the left sibling's last key (and last child, for internal nodes)
    /// into the front of `node`.
    fn borrow_from_left(&mut self, node: NodeId, parent: NodeId, index: usize) {
        let left = self.arena[parent].children[index - 1];
        let boundary = self.arena[parent].keys[index - 1].clone();

        let new_boundary = if self.arena[node].is_leaf() {
            let moved = self.arena[left].keys.pop().expect("donor leaf holds keys");
            self.arena[node].keys.insert(0, moved.clone());
            moved
        } else {
            let donor = &mut self.arena[left];
            let moved_key = donor.keys.pop().expect("donor branch holds keys");
            let moved_child = donor.children.pop().expect("donor branch holds children");

            let receiver = &mut self.arena[node];
            receiver.keys.insert(0, boundary.clone());
            receiver.children.insert(0, moved_child);
            self.arena[moved_child].parent = node;
            moved_key
        };

        trace!(node, left, "borrowed from left sibling");
        self.propagate_separator(parent, &boundary, new_boundary);
    }

    /// Move the right sibling's first key (and first child, for internal
    /// nodes) onto the back of `node`.
    fn borrow_from_right(&mut self, node: NodeId, parent: NodeId, index: usize) {
        let right = self.arena[parent].children[index + 1];
        let boundary = self.arena[parent].keys[index].clone();

        let new_boundary = if self.arena[node].is_leaf() {
            let donor = &mut self.arena[right];
            let moved = donor.keys.remove(0);
            let new_first = donor.keys[0].clone();
            self.arena[node].keys.push(moved);
            new_first
        } else {
            let donor = &mut self.arena[right];
            let moved_key = donor.keys.remove(0);
            let moved_child = donor.children.remove(0);

            let receiver = &mut self.arena[node];
            receiver.keys.push(boundary.clone());
            receiver.children.push(moved_child);
            self.arena[moved_child].parent = node;
            moved_key
        };

        trace!(node, right, "borrowed from right sibling");
        self.propagate_separator(parent, &boundary, new_boundary);
    }

    /// Starting at `start`, overwrite `prev` with `new` in each ancestor that
    /// carries it, stopping at the first one that does not.
    fn propagate_separator(&mut self, start: NodeId, prev: &K, new: K) {
        let mut current = start;
        while current != NULL_NODE {
            let node = &mut self.arena[current];
            match node.keys.binary_search(prev) {
                Ok(position) => {
                    node.keys[position] = new.clone();
                    trace!(node = current, position, "replaced separator");
                    current = node.parent;
                }
                Err(_) => break,
            }
        }
    }

    // ============================================================================
    // MERGING
    // ============================================================================

    /// Fold `node` into a sibling (left preferred) and drop the separator
    /// between them from `parent`. The parent may underflow as a result.
    fn merge(&mut self, node: NodeId, parent: NodeId, index: usize) {
        if index > 0 {
            let left = self.arena[parent].children[index - 1];
            let boundary = self.arena[parent].keys.remove(index - 1);
            self.arena[parent].children.remove(index);
            let removed = self.release(node);

            if removed.is_leaf() {
                self.arena[left].keys.extend(removed.keys);
                self.link_leaves(left, removed.next);
            } else {
                for &child in &removed.children {
                    self.arena[child].parent = left;
                }
                let survivor = &mut self.arena[left];
                survivor.keys.push(boundary);
                survivor.keys.extend(removed.keys);
                survivor.children.extend(removed.children);
            }
            trace!(node, left, parent, "merged into left sibling");
        } else {
            let right = self.arena[parent].children[1];
            let boundary = self.arena[parent].keys.remove(0);
            self.arena[parent].children.remove(0);
            let mut removed = self.release(node);

            if removed.is_leaf() {
                let survivor = &mut self.arena[right];
                removed.keys.append(&mut survivor.keys);
                survivor.keys = removed.keys;
                self.link_leaves(removed.prev, right);
            } else {
                for &child in &removed.children {
                    self.arena[child].parent = right;
                }
                let survivor = &mut self.arena[right];
                removed.keys.push(boundary);
                removed.keys.append(&mut survivor.keys);
                removed.children.append(&mut survivor.children);
                survivor.keys = removed.keys;
                survivor.children = removed.children;
            }
            trace!(node, right, parent, "merged into right sibling");
        }
    }

    /// Make `left` and `right` adjacent in the leaf chain. Either may be
    /// `NULL_NODE` at the ends of the chain.
    fn link_leaves(&mut self, left: NodeId, right: NodeId) {
        if left != NULL_NODE {
            self.arena[left].next = right;
        }
        if right != NULL_NODE {
            self.arena[right].prev = left;
        }
    }

    // ============================================================================
    // ROOT MAINTENANCE
    // ============================================================================

    /// Collapse an internal root without keys into its only child, and drop
    /// an empty leaf root so the tree returns to its initial state.
    fn shrink_root(&mut self) {
        while let Some(root) = self.root {
            let node = &self.arena[root];
            if !node.is_empty() {
                return;
            }
            if node.is_leaf() {
                self.release(root);
                self.root = None;
                debug!("last key removed, tree is empty");
                return;
            }

            let child = node.children[0];
            self.release(root);
            self.arena[child].parent = NULL_NODE;
            self.root = Some(child);
            debug!(old_root = root, new_root = child, "root collapsed");
        }
    }

    /// Return a detached node's slot to the arena.
    fn release(&mut self, id: NodeId) -> Node<K> {
        self.arena
            .deallocate(id)
            .expect("released node is allocated")
    }

    /// Parent of a non-root node and its position among the parent's children.
    pub(crate) fn parent_and_index(&self, node: NodeId) -> (NodeId, usize) {
        let parent = self.arena[node].parent;
        let index = self.arena[parent]
            .child_position(node)
            .expect("node is listed among its parent's children");
        (parent, index)
    }
}
