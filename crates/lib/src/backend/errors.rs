//! Storage error types for the nestedset backend.
//!
//! This module defines structured error types for database operations,
//! providing better error context and type safety compared to string-based errors.

use thiserror::Error;

/// Errors that can occur during database operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Field additions/changes require a major version bump
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// A statement, connection or transaction failed inside sqlx.
    #[error("SQL error: {reason}")]
    SqlxError {
        /// Context message including the underlying error text
        reason: String,
        /// The underlying sqlx error, when there is one
        #[source]
        source: Option<sqlx::Error>,
    },

    /// Table name rejected before being placed into SQL text.
    #[error("Invalid table name {name:?}: must start with a letter, contain only letters, digits or underscores, and be 2 to 65 characters long")]
    InvalidTableName {
        /// The rejected name
        name: String,
    },

    /// Connection URL scheme does not match an enabled driver.
    #[error("Unsupported database URL: {url}")]
    UnsupportedUrl {
        /// The URL with credentials removed
        url: String,
    },

    /// A stored row could not be turned into a node.
    #[error("Invalid row in table {table}: {reason}")]
    InvalidRow {
        /// The table the row came from
        table: String,
        /// Why the row was rejected
        reason: String,
    },
}

impl BackendError {
    /// Check if this error was raised by the database itself.
    pub fn is_database_error(&self) -> bool {
        matches!(self, BackendError::SqlxError { .. })
    }

    /// Check if this error comes from invalid configuration rather than the database.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            BackendError::InvalidTableName { .. } | BackendError::UnsupportedUrl { .. }
        )
    }

    /// Check if this error indicates corrupted stored data.
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, BackendError::InvalidRow { .. })
    }

    /// Get the underlying sqlx error, if any.
    pub fn sqlx_error(&self) -> Option<&sqlx::Error> {
        match self {
            BackendError::SqlxError { source, .. } => source.as_ref(),
            _ => None,
        }
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
