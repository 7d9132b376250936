//! In-memory B+ tree index in Rust.
//!
//! `BPlusTree` stores a set of ordered keys. Every key lives in a leaf;
//! internal nodes carry separator keys that route lookups, and the leaves are
//! chained in key order. Nodes sit in an arena and refer to one another by
//! `NodeId`, so parent and sibling links never own anything.
//!
//! Inserts split full nodes bottom-up. Deletes repair underfull nodes by
//! borrowing from a sibling or merging with it, and the tree shrinks by a
//! level when the root runs out of separators.
//!
//! ```
//! use bplus_index::BPlusTree;
//!
//! let mut tree = BPlusTree::new(4).unwrap();
//! for key in 1..=5 {
//!     tree.insert(key);
//! }
//! assert!(tree.find(&3));
//! assert!(tree.delete(&3));
//! assert!(!tree.find(&3));
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![1, 2, 4, 5]);
//! ```

mod arena;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod tree_structure;
mod types;
mod validation;

pub use arena::{ArenaStats, NodeArena};
pub use error::{BPlusTreeError, BTreeResult, BTreeResultExt, InitResult, ModifyResult};
pub use iteration::KeyIterator;
pub use types::{BPlusTree, Key, Node, NodeId, DEFAULT_MAX_DEGREE, MIN_DEGREE, NULL_NODE};
