//! Error types for nested-set operations.
//!
//! These describe structural problems: a node that is gone, a snapshot that no longer
//! matches storage, or a move that would put a subtree inside itself. Storage failures
//! are reported separately as [`BackendError`](crate::backend::BackendError).

use thiserror::Error;

use crate::node::NodeKey;

/// Errors that can occur during nested-set operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Field additions/changes require a major version bump
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NestedSetError {
    /// A mutation referenced a node that has no row.
    #[error("Node not found: {key}")]
    NodeNotFound {
        /// The key that was looked up
        key: NodeKey,
    },

    /// A mutation was given a snapshot whose positions no longer match storage.
    #[error(
        "Stale node {key}: expected [{expected_left}, {expected_right}], stored [{actual_left}, {actual_right}]"
    )]
    StaleNode {
        /// The node's key
        key: NodeKey,
        /// Left position held by the caller
        expected_left: i64,
        /// Right position held by the caller
        expected_right: i64,
        /// Left position in storage
        actual_left: i64,
        /// Right position in storage
        actual_right: i64,
    },

    /// An insertion used a key that already has a row.
    #[error("Node already exists: {key}")]
    NodeAlreadyExists {
        /// The duplicate key
        key: NodeKey,
    },

    /// A move targeted the moved node itself or one of its descendants.
    #[error("Cannot move {node} relative to {target}: target is inside the moved subtree")]
    MoveIntoSubtree {
        /// Root of the subtree being moved
        node: NodeKey,
        /// The rejected target
        target: NodeKey,
    },

    /// Stored positions violate the nested-set invariants.
    #[error("Nested set integrity violation: {reason}")]
    IntegrityViolation {
        /// Description of the violation
        reason: String,
    },
}

impl NestedSetError {
    /// Check if this error indicates a node was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NestedSetError::NodeNotFound { .. })
    }

    /// Check if this error indicates an outdated snapshot.
    pub fn is_stale(&self) -> bool {
        matches!(self, NestedSetError::StaleNode { .. })
    }

    /// Check if this error indicates a structural invariant problem.
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            NestedSetError::MoveIntoSubtree { .. } | NestedSetError::IntegrityViolation { .. }
        )
    }

    /// Get the key of the node this error is about, if any.
    pub fn node_key(&self) -> Option<&NodeKey> {
        match self {
            NestedSetError::NodeNotFound { key }
            | NestedSetError::StaleNode { key, .. }
            | NestedSetError::NodeAlreadyExists { key } => Some(key),
            NestedSetError::MoveIntoSubtree { node, .. } => Some(node),
            NestedSetError::IntegrityViolation { .. } => None,
        }
    }
}

impl From<NestedSetError> for crate::Error {
    fn from(err: NestedSetError) -> Self {
        crate::Error::NestedSet(err)
    }
}
