//! SQL schema for nested-set tables.
//!
//! Every tree lives in its own table. Because a table name has to be written into
//! the statement text rather than bound as a parameter, names are first wrapped in a
//! [`TableName`], which only accepts `^[a-zA-Z]\w{1,64}$`. Every other value is bound.
//!
//! The schema is designed to be portable between SQLite and Postgres.

use std::fmt;

use crate::Result;
use crate::backend::errors::BackendError;

use super::{SqlxBackend, SqlxResultExt};

/// Longest accepted table name.
const MAX_TABLE_NAME_LEN: usize = 65;

/// A table name that is safe to interpolate into SQL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validate a table name.
    ///
    /// Names must start with an ASCII letter, continue with ASCII letters, digits or
    /// underscores, and be between 2 and 65 characters long.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if Self::is_valid(&name) {
            Ok(Self(name))
        } else {
            Err(BackendError::InvalidTableName { name }.into())
        }
    }

    fn is_valid(name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        first.is_ascii_alphabetic()
            && (2..=MAX_TABLE_NAME_LEN).contains(&name.len())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// SQL statements creating a nested-set table.
///
/// BIGINT (64-bit) is used for portability between SQLite and PostgreSQL.
/// Identifiers are stored as TEXT so integer and string IDs share one column.
pub fn create_table_statements(table: &TableName) -> Vec<String> {
    vec![format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id TEXT NOT NULL,
            revision_id TEXT NOT NULL,
            left_pos BIGINT NOT NULL,
            right_pos BIGINT NOT NULL,
            depth BIGINT NOT NULL,
            PRIMARY KEY (id, revision_id)
        )"
    )]
}

/// SQL statements creating the indexes used by range scans.
pub fn create_index_statements(table: &TableName) -> Vec<String> {
    vec![
        // Covering index for key lookups that only need positions
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_key_pos ON {table}(id, revision_id, left_pos, right_pos, depth)"
        ),
        // Descendant/ancestor range predicates
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_left_right ON {table}(left_pos, right_pos)"),
        // Renumbering predicates on right_pos alone
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_right ON {table}(right_pos)"),
    ]
}

/// Create the table and its indexes if they don't exist.
pub async fn create_table(backend: &SqlxBackend, table: &TableName) -> Result<()> {
    let pool = backend.pool();

    for statement in create_table_statements(table)
        .iter()
        .chain(create_index_statements(table).iter())
    {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| BackendError::SqlxError {
                reason: format!("Schema creation failed: {e} - SQL: {statement}"),
                source: Some(e),
            })?;
    }

    tracing::info!(%table, "Created nested set table");
    Ok(())
}

/// Drop the table if it exists. Its indexes go with it.
pub async fn drop_table(backend: &SqlxBackend, table: &TableName) -> Result<()> {
    let statement = format!("DROP TABLE IF EXISTS {table}");
    sqlx::query(&statement)
        .execute(backend.pool())
        .await
        .sql_context(&format!("Failed to drop table {table}"))?;

    tracing::info!(%table, "Dropped nested set table");
    Ok(())
}

/// Check whether the table exists in the current database (or search path).
pub async fn table_exists(backend: &SqlxBackend, table: &TableName) -> Result<bool> {
    let sql = if backend.is_sqlite() {
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = $1"
    } else {
        // Unquoted identifiers are folded to lower case by PostgreSQL
        "SELECT COUNT(*) FROM information_schema.tables
         WHERE table_schema = current_schema() AND table_name = lower($1)"
    };

    let (count,): (i64,) = sqlx::query_as(sql)
        .bind(table.as_str())
        .fetch_one(backend.pool())
        .await
        .sql_context("Failed to check table existence")?;

    Ok(count > 0)
}
