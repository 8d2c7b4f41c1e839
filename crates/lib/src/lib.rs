//!
//! nestedset: hierarchical data stored in a relational table using the nested-set model.
//!
//! Every node of a tree is a row carrying two integers, `left` and `right`. A node's
//! descendants are exactly the rows whose interval lies inside its own, so ancestry,
//! depth and sibling order are all answered by range comparisons instead of recursive
//! joins. The price is paid on writes: inserting, deleting or moving a node renumbers
//! every row after the affected position, which this crate does inside one transaction.
//!
//! ## Core Concepts
//!
//! * **Nodes (`node::Node`)**: Immutable snapshots of a row: a `NodeKey` plus its `left`,
//!   `right` and `depth`.
//! * **Backends (`backend::SqlxBackend`)**: A pooled sqlx connection to SQLite or PostgreSQL.
//! * **Nested sets (`nested_set::NestedSet`)**: The engine. Binds a backend to one validated
//!   table and exposes the insertion, query, delete and move operations.
//! * **Integrity (`nested_set::integrity`)**: Structural checks over a preorder dump of a tree.

pub mod backend;
pub mod config;
pub mod nested_set;
pub mod node;

pub use backend::SqlxBackend;
pub use config::{BackendConfig, NestedSetConfig};
pub use nested_set::{NestedSet, NestedSetError, Placement};
pub use node::{Identifier, Node, NodeError, NodeKey};

/// Result type used throughout the nestedset library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the nestedset library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured node construction errors from the node module
    #[error(transparent)]
    Node(node::NodeError),

    /// Structured storage errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured tree errors from the nested_set module
    #[error(transparent)]
    NestedSet(nested_set::NestedSetError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Node(_) => "node",
            Error::Backend(_) => "backend",
            Error::NestedSet(_) => "nested_set",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a node was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NestedSet(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error was caused by a malformed argument or configuration.
    ///
    /// These errors are raised before any transaction is opened.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Node(_) => true,
            Error::Backend(err) => err.is_configuration_error(),
            Error::Serialize(_) => true,
            Error::NestedSet(_) => false,
        }
    }

    /// Check if this error indicates a structural invariant would be, or was, violated.
    pub fn is_integrity_error(&self) -> bool {
        match self {
            Error::NestedSet(err) => err.is_integrity_error(),
            Error::Backend(err) => err.is_integrity_error(),
            _ => false,
        }
    }

    /// Check if this error indicates the caller acted on an outdated snapshot.
    ///
    /// Retrying requires a fresh read of the node positions.
    pub fn is_stale(&self) -> bool {
        match self {
            Error::NestedSet(err) => err.is_stale(),
            _ => false,
        }
    }

    /// Check if this error came from the storage engine.
    pub fn is_database_error(&self) -> bool {
        match self {
            Error::Backend(err) => err.is_database_error(),
            _ => false,
        }
    }
}
