//! Error handling and result types for BPlusTree operations.
//!
//! The core `find`/`insert`/`delete` calls report expected outcomes as
//! booleans. The types here back construction and the `try_*` variants.

use thiserror::Error;

/// Error type for B+ tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BPlusTreeError {
    /// Branching factor below the supported minimum.
    #[error("Invalid degree: {degree} (minimum required: {min_required})")]
    InvalidDegree { degree: usize, min_required: usize },
    /// Key not found in the tree.
    #[error("Key not found in tree")]
    KeyNotFound,
    /// Key is already stored.
    #[error("Key already present in tree")]
    DuplicateKey,
    /// Internal data structure integrity violation.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

impl BPlusTreeError {
    /// Create an InvalidDegree error with context
    pub fn invalid_degree(degree: usize, min_required: usize) -> Self {
        Self::InvalidDegree {
            degree,
            min_required,
        }
    }

    /// Create a DataIntegrity error with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrity(format!("{}: {}", context, details))
    }

    /// Check if this error is a degree error
    pub fn is_degree_error(&self) -> bool {
        matches!(self, Self::InvalidDegree { .. })
    }
}

/// Public result type for tree operations that may fail
pub type BTreeResult<T> = Result<T, BPlusTreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, BPlusTreeError>;

/// Result type for tree construction and validation
pub type InitResult<T> = Result<T, BPlusTreeError>;

/// Result extension trait for attaching context to integrity errors
pub trait BTreeResultExt<T> {
    /// Prefix integrity error details with `context`.
    fn with_context(self, context: &str) -> BTreeResult<T>;

    /// Prefix integrity error details with the name of an operation.
    fn with_operation(self, operation: &str) -> BTreeResult<T>;
}

impl<T> BTreeResultExt<T> for Result<T, BPlusTreeError> {
    fn with_context(self, context: &str) -> BTreeResult<T> {
        self.map_err(|e| match e {
            BPlusTreeError::DataIntegrity(msg) => BPlusTreeError::data_integrity(context, &msg),
            other => other,
        })
    }

    fn with_operation(self, operation: &str) -> BTreeResult<T> {
        self.with_context(&format!("Operation '{}'", operation))
    }
}
