//! Validation and debugging utilities for BPlusTree.
//!
//! Nothing here runs on the insert or delete paths. Tests call
//! `validate()` after each mutation to check the full set of structural
//! invariants.

use std::fmt::{Debug, Write};

use crate::error::{BPlusTreeError, BTreeResult, BTreeResultExt};
use crate::types::{BPlusTree, NodeId, NULL_NODE};

/// Bounds and bookkeeping threaded through the recursive node check.
struct Walk<'a, K> {
    leaves: Vec<NodeId>,
    leaf_depth: Option<usize>,
    keys_seen: usize,
    visited: Vec<bool>,
    lower: Option<&'a K>,
    upper: Option<&'a K>,
}

impl<K: Ord + Clone + Debug> BPlusTree<K> {
    // ============================================================================
    // VALIDATION METHODS
    // ============================================================================

    /// Check if the tree maintains B+ tree invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> BTreeResult<()> {
        let Some(root) = self.root else {
            if self.len != 0 || !self.arena.is_empty() {
                return Err(BPlusTreeError::data_integrity(
                    "Empty tree",
                    &format!("len {} with {} live nodes", self.len, self.arena.len()),
                ));
            }
            return Ok(());
        };

        if self.arena[root].parent != NULL_NODE {
            return Err(BPlusTreeError::data_integrity(
                "Root",
                &format!("root {} has parent {}", root, self.arena[root].parent),
            ));
        }
        if self.arena[root].is_empty() {
            return Err(BPlusTreeError::data_integrity(
                "Root",
                "root of a non-empty tree holds no keys",
            ));
        }

        let slots = self.arena.live_ids().max().map_or(0, |id| id as usize + 1);
        let mut walk = Walk {
            leaves: Vec::new(),
            leaf_depth: None,
            keys_seen: 0,
            visited: vec![false; slots],
            lower: None,
            upper: None,
        };
        self.check_node(root, true, 0, &mut walk)?;

        if walk.keys_seen != self.len {
            return Err(BPlusTreeError::data_integrity(
                "Length",
                &format!("leaves hold {} keys, len is {}", walk.keys_seen, self.len),
            ));
        }
        let reachable = walk.visited.iter().filter(|&&seen| seen).count();
        if reachable != self.arena.len() {
            return Err(BPlusTreeError::data_integrity(
                "Arena",
                &format!("{} nodes reachable, {} allocated", reachable, self.arena.len()),
            ));
        }

        self.check_leaf_chain(&walk.leaves)?;
        self.check_key_order()
    }

    /// Like `check_invariants_detailed`, with integrity errors tagged as
    /// coming from `validate`.
    pub fn validate(&self) -> BTreeResult<()> {
        self.check_invariants_detailed().with_operation("validate")
    }

    /// Recursively check a node, its children, and the key range they cover.
    fn check_node<'a>(
        &'a self,
        id: NodeId,
        is_root: bool,
        depth: usize,
        walk: &mut Walk<'a, K>,
    ) -> BTreeResult<()> {
        let node = self.arena.get(id).ok_or_else(|| {
            BPlusTreeError::data_integrity("Node", &format!("node {} is not allocated", id))
        })?;
        match walk.visited.get_mut(id as usize) {
            Some(seen) if !*seen => *seen = true,
            _ => {
                return Err(BPlusTreeError::data_integrity(
                    "Node",
                    &format!("node {} reached twice", id),
                ))
            }
        }

        if node.keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(BPlusTreeError::data_integrity(
                "Key order",
                &format!("node {} keys {:?} not strictly ascending", id, node.keys),
            ));
        }
        if node.len() >= self.max_degree {
            return Err(BPlusTreeError::data_integrity(
                "Occupancy",
                &format!("node {} holds {} keys, limit {}", id, node.len(), self.max_degree - 1),
            ));
        }
        if !is_root && node.is_underfull(self.max_degree) {
            return Err(BPlusTreeError::data_integrity(
                "Occupancy",
                &format!(
                    "node {} holds {} keys, minimum {}",
                    id,
                    node.len(),
                    node.min_keys(self.max_degree)
                ),
            ));
        }

        if node.is_leaf() {
            if *walk.leaf_depth.get_or_insert(depth) != depth {
                return Err(BPlusTreeError::data_integrity(
                    "Balance",
                    &format!("leaf {} at depth {}, expected {:?}", id, depth, walk.leaf_depth),
                ));
            }
            let below = walk.lower.is_some_and(|lower| node.keys.first() < Some(lower));
            let above = walk
                .upper
                .is_some_and(|upper| node.keys.last().is_some_and(|last| last >= upper));
            if below || above {
                return Err(BPlusTreeError::data_integrity(
                    "Separator",
                    &format!(
                        "leaf {} keys {:?} outside [{:?}, {:?})",
                        id, node.keys, walk.lower, walk.upper
                    ),
                ));
            }
            walk.leaves.push(id);
            walk.keys_seen += node.len();
            return Ok(());
        }

        if node.children.len() != node.keys.len() + 1 {
            return Err(BPlusTreeError::data_integrity(
                "Fan-out",
                &format!(
                    "node {} has {} keys and {} children",
                    id,
                    node.keys.len(),
                    node.children.len()
                ),
            ));
        }

        let (lower, upper) = (walk.lower, walk.upper);
        for (i, &child) in node.children.iter().enumerate() {
            let parent_link = self.arena.get(child).map(|c| c.parent);
            if parent_link != Some(id) {
                return Err(BPlusTreeError::data_integrity(
                    "Parent link",
                    &format!("child {} of {} points at {:?}", child, id, parent_link),
                ));
            }
            walk.lower = if i == 0 { lower } else { Some(&node.keys[i - 1]) };
            walk.upper = if i == node.keys.len() { upper } else { Some(&node.keys[i]) };
            self.check_node(child, false, depth + 1, walk)?;
        }
        walk.lower = lower;
        walk.upper = upper;
        Ok(())
    }

    /// Check that the leaf chain visits exactly `leaves`, in order, with
    /// `prev` and `next` agreeing.
    fn check_leaf_chain(&self, leaves: &[NodeId]) -> BTreeResult<()> {
        let mut chain = Vec::with_capacity(leaves.len());
        let mut prev = NULL_NODE;
        let mut current = leaves.first().copied().unwrap_or(NULL_NODE);
        while current != NULL_NODE && chain.len() <= leaves.len() {
            let leaf = &self.arena[current];
            if leaf.prev != prev {
                return Err(BPlusTreeError::data_integrity(
                    "Leaf chain",
                    &format!("leaf {} has prev {}, expected {}", current, leaf.prev, prev),
                ));
            }
            chain.push(current);
            prev = current;
            current = leaf.next;
        }

        if chain != leaves {
            return Err(BPlusTreeError::data_integrity(
                "Leaf chain",
                &format!("tree has {:?}, linked list has {:?}", leaves, chain),
            ));
        }
        Ok(())
    }

    /// Check that walking the chain yields strictly ascending keys.
    fn check_key_order(&self) -> BTreeResult<()> {
        let mut previous: Option<&K> = None;
        for key in self.keys() {
            if previous.is_some_and(|p| p >= key) {
                return Err(BPlusTreeError::data_integrity(
                    "Leaf chain",
                    &format!("key {:?} follows {:?}", key, previous),
                ));
            }
            previous = Some(key);
        }
        Ok(())
    }

    // ============================================================================
    // DEBUGGING AND TESTING UTILITIES
    // ============================================================================

    /// Returns the sizes of all leaf nodes, left to right.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut current = self.first_leaf_id().unwrap_or(NULL_NODE);
        while current != NULL_NODE {
            let leaf = &self.arena[current];
            sizes.push(leaf.len());
            current = leaf.next;
        }
        sizes
    }

    /// Render the tree one node per line, children indented under parents.
    pub fn structure_dump(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(NodeId, usize)> =
            self.root.map(|root| (root, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            let node = &self.arena[id];
            let kind = if node.is_leaf() { "Leaf" } else { "Branch" };
            let _ = writeln!(out, "{}{}[id={}]: {:?}", "  ".repeat(depth), kind, id, node.keys);
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        out
    }
}
