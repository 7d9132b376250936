//! Core types and data structures for BPlusTree.
//!
//! This module contains the node layout, the tree handle, and the constants
//! shared by the insert, delete and validation modules.

use crate::arena::NodeArena;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest accepted branching factor.
pub const MIN_DEGREE: usize = 2;

/// Branching factor used by `BPlusTree::default()`.
pub const DEFAULT_MAX_DEGREE: usize = 16;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Canonical key type of the index.
pub type Key = i64;

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Sentinel for "no node" in parent and leaf-chain links.
pub const NULL_NODE: NodeId = u32::MAX;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// In-memory B+ tree index over a set of ordered keys.
///
/// Every key lives in a leaf. Internal nodes hold separator keys only, and
/// the leaves are chained left to right so the whole key set can be walked
/// in order without re-descending the tree.
///
/// # Concurrency
///
/// The tree is a single mutable resource. `find` borrows it shared, `insert`
/// and `delete` borrow it exclusively, so sharing across threads needs an
/// outer lock such as `std::sync::RwLock<BPlusTree>`.
///
/// # Examples
///
/// ```
/// use bplus_index::BPlusTree;
///
/// let mut tree = BPlusTree::new(4).unwrap();
/// assert!(tree.insert(7));
/// assert!(!tree.insert(7));
/// assert!(tree.find(&7));
/// assert!(tree.delete(&7));
/// assert!(tree.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BPlusTree<K = Key> {
    /// A node splits once it holds this many keys.
    pub(crate) max_degree: usize,
    /// Root node, `None` while the tree is empty.
    pub(crate) root: Option<NodeId>,
    /// Storage for every leaf and internal node.
    pub(crate) arena: NodeArena<Node<K>>,
    /// Number of keys stored in the leaves.
    pub(crate) len: usize,
}

/// A tree node. Leaves have no children.
#[derive(Debug, Clone)]
pub struct Node<K> {
    /// Sorted, unique keys (separators for internal nodes).
    pub(crate) keys: Vec<K>,
    /// Child ids; `keys.len() + 1` entries for internal nodes, empty for leaves.
    pub(crate) children: Vec<NodeId>,
    /// Internal node holding this node, `NULL_NODE` for the root.
    pub(crate) parent: NodeId,
    /// Previous leaf in key order.
    pub(crate) prev: NodeId,
    /// Next leaf in key order.
    pub(crate) next: NodeId,
}

/// Which side of a node a sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}
