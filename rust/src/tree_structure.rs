//! Tree structure management operations for BPlusTree.
//!
//! Size queries, clearing, node counting and the leaf-chain endpoints.

use tracing::debug;

use crate::arena::ArenaStats;
use crate::types::{BPlusTree, NodeId, NULL_NODE};

impl<K: Ord + Clone> BPlusTree<K> {
    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, 0 for an empty tree and 1 for a lone leaf root.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root.unwrap_or(NULL_NODE);
        while current != NULL_NODE {
            height += 1;
            current = self.arena[current].children.first().copied().unwrap_or(NULL_NODE);
        }
        height
    }

    /// Returns the number of leaf nodes, counted along the leaf chain.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut current = self.first_leaf_id().unwrap_or(NULL_NODE);
        while current != NULL_NODE {
            count += 1;
            current = self.arena[current].next;
        }
        count
    }

    /// Count leaf and internal nodes reachable from the root.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        let mut leaves = 0;
        let mut branches = 0;
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = &self.arena[id];
            if node.is_leaf() {
                leaves += 1;
            } else {
                branches += 1;
                stack.extend(node.children.iter().copied());
            }
        }
        (leaves, branches)
    }

    /// Remove every key and release every node.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
        debug!("tree cleared");
    }

    /// Get arena statistics for the node storage.
    pub fn arena_stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    // ============================================================================
    // LEAF CHAIN ENDPOINTS
    // ============================================================================

    /// Id of the leftmost leaf.
    pub fn first_leaf_id(&self) -> Option<NodeId> {
        let mut current = self.root?;
        while let Some(&child) = self.arena[current].children.first() {
            current = child;
        }
        Some(current)
    }

    /// Id of the rightmost leaf.
    pub fn last_leaf_id(&self) -> Option<NodeId> {
        let mut current = self.root?;
        while let Some(&child) = self.arena[current].children.last() {
            current = child;
        }
        Some(current)
    }

    /// Smallest key in the tree.
    pub fn first(&self) -> Option<&K> {
        self.first_leaf_id()
            .and_then(|leaf| self.arena[leaf].keys.first())
    }

    /// Largest key in the tree.
    pub fn last(&self) -> Option<&K> {
        self.last_leaf_id()
            .and_then(|leaf| self.arena[leaf].keys.last())
    }
}
