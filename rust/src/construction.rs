//! Construction and initialization logic for BPlusTree and nodes.
//!
//! This module contains degree validation, node constructors and the
//! `Default` implementations.

use crate::arena::NodeArena;
use crate::error::{BPlusTreeError, InitResult};
use crate::types::{BPlusTree, Node, NodeId, DEFAULT_MAX_DEGREE, MIN_DEGREE, NULL_NODE};

impl<K> BPlusTree<K> {
    /// Create an empty B+ tree with the given branching factor.
    ///
    /// A node splits as soon as it holds `max_degree` keys, so every node
    /// keeps at most `max_degree - 1` keys between operations.
    ///
    /// # Errors
    ///
    /// Returns `BPlusTreeError::InvalidDegree` if `max_degree < 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusTree;
    ///
    /// let tree: BPlusTree = BPlusTree::new(4).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BPlusTree::<i64>::new(1).is_err());
    /// ```
    pub fn new(max_degree: usize) -> InitResult<Self> {
        if max_degree < MIN_DEGREE {
            return Err(BPlusTreeError::invalid_degree(max_degree, MIN_DEGREE));
        }
        Ok(Self::empty(max_degree))
    }

    /// Create a B+ tree with `DEFAULT_MAX_DEGREE`.
    pub fn with_default_degree() -> Self {
        Self::empty(DEFAULT_MAX_DEGREE)
    }

    /// Empty tree for an already validated degree.
    fn empty(max_degree: usize) -> Self {
        Self {
            max_degree,
            root: None,
            arena: NodeArena::new(),
            len: 0,
        }
    }

    /// The branching factor this tree was built with.
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }
}

impl<K> Node<K> {
    /// A detached leaf holding `keys`.
    pub(crate) fn leaf(keys: Vec<K>) -> Self {
        Self {
            keys,
            children: Vec::new(),
            parent: NULL_NODE,
            prev: NULL_NODE,
            next: NULL_NODE,
        }
    }

    /// A detached internal node.
    pub(crate) fn branch(keys: Vec<K>, children: Vec<NodeId>) -> Self {
        Self {
            keys,
            children,
            parent: NULL_NODE,
            prev: NULL_NODE,
            next: NULL_NODE,
        }
    }
}

impl<K> Default for BPlusTree<K> {
    fn default() -> Self {
        Self::with_default_degree()
    }
}

impl<K> Default for Node<K> {
    fn default() -> Self {
        Self::leaf(Vec::new())
    }
}
