//! Node-specific error types.
//!
//! These are raised synchronously when a [`Node`](super::Node) is constructed with
//! positions that can never belong to a nested set.

use thiserror::Error;

/// Errors that can occur when constructing a node.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// Left position below 1.
    #[error("Left value must be > 0, got {left}")]
    InvalidLeft {
        /// The rejected left value
        left: i64,
    },

    /// Right position below 1.
    #[error("Right value must be > 0, got {right}")]
    InvalidRight {
        /// The rejected right value
        right: i64,
    },

    /// Negative depth.
    #[error("Depth value must be >= 0, got {depth}")]
    InvalidDepth {
        /// The rejected depth value
        depth: i64,
    },
}

impl From<NodeError> for crate::Error {
    fn from(err: NodeError) -> Self {
        crate::Error::Node(err)
    }
}
