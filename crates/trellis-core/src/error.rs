//! Core error types for trellis
//!
//! Two kinds of failure exist at the traversal layer:
//!
//! | Kind | Raised at | Meaning |
//! |------|-----------|---------|
//! | `IllegalConfiguration` | `begin_iteration` / config parsing | Programming error in the traversal setup |
//! | `Store` | the pull that triggered it | The graph store collaborator failed |
//!
//! Neither is retried or suppressed.

use crate::store::GraphStoreError;
use thiserror::Error;

/// Top-level error type for traversal operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    #[error("Illegal traversal configuration: {0}")]
    IllegalConfiguration(#[from] ConfigError),

    #[error("Graph store error: {0}")]
    Store(#[from] GraphStoreError),
}

impl TraversalError {
    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, TraversalError::IllegalConfiguration(_))
    }
}

/// Traversal configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "Unknown type of relationship. Needs to know which type(s) of relationship \
         in order to traverse. Please use the outgoing, incoming or both method."
    )]
    MissingRelationshipTypes,

    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },
}

/// Convenience type alias for traversal results
pub type TraversalResult<T> = Result<T, TraversalError>;
