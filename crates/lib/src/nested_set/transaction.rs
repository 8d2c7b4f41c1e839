//! Transaction lifecycle and snapshot validation for mutations.
//!
//! Every mutation follows the same shape:
//!
//! ```text
//! let tx = self.begin(op).await?;
//! let result = self.do_mutation(&mut tx, ...).await;
//! self.finish(op, tx, result).await
//! ```
//!
//! Inside the transaction, each node the caller passed in is re-read by key. Its
//! stored positions must still match the snapshot; otherwise the caller is working
//! from an outdated view of the tree and the whole operation is rolled back.

use sqlx::{Any, AnyConnection, Transaction};

use super::{NestedSet, NestedSetError, storage};
use crate::Result;
use crate::backend::SqlxResultExt;
use crate::backend::schema::TableName;
use crate::node::{Node, NodeKey};

impl NestedSet {
    pub(super) async fn begin(&self, operation: &'static str) -> Result<Transaction<'static, Any>> {
        tracing::debug!(table = %self.table, operation, "Beginning transaction");
        self.backend.begin().await
    }

    /// Commit on success, roll back on failure.
    pub(super) async fn finish<T>(
        &self,
        operation: &'static str,
        tx: Transaction<'static, Any>,
        result: Result<T>,
    ) -> Result<T> {
        match result {
            Ok(value) => {
                tx.commit()
                    .await
                    .sql_context(&format!("Failed to commit {operation}"))?;
                tracing::debug!(table = %self.table, operation, "Committed");
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(table = %self.table, operation, error = %err, "Rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        table = %self.table,
                        operation,
                        error = %rollback_err,
                        "Rollback failed"
                    );
                }
                Err(err)
            }
        }
    }
}

/// Re-read `node` and check that its positions still match storage.
pub(super) async fn load_current(
    conn: &mut AnyConnection,
    table: &TableName,
    node: &Node,
) -> Result<Node> {
    let Some(current) = storage::fetch_node(&mut *conn, table, node.key()).await? else {
        return Err(NestedSetError::NodeNotFound {
            key: node.key().clone(),
        }
        .into());
    };

    if current.left() != node.left() || current.right() != node.right() {
        return Err(NestedSetError::StaleNode {
            key: node.key().clone(),
            expected_left: node.left(),
            expected_right: node.right(),
            actual_left: current.left(),
            actual_right: current.right(),
        }
        .into());
    }

    Ok(current)
}

/// Read `key` back inside the transaction, as storage now holds it.
pub(super) async fn reload(
    conn: &mut AnyConnection,
    table: &TableName,
    key: &NodeKey,
) -> Result<Node> {
    storage::fetch_node(&mut *conn, table, key)
        .await?
        .ok_or_else(|| NestedSetError::NodeNotFound { key: key.clone() }.into())
}

/// Fail if `key` already has a row.
pub(super) async fn ensure_absent(
    conn: &mut AnyConnection,
    table: &TableName,
    key: &NodeKey,
) -> Result<()> {
    if storage::fetch_node(&mut *conn, table, key).await?.is_some() {
        return Err(NestedSetError::NodeAlreadyExists { key: key.clone() }.into());
    }
    Ok(())
}

/// Fail if `target` is `node` itself or lies inside `node`'s subtree.
pub(super) fn ensure_outside(node: &Node, target: &Node) -> Result<()> {
    if target.key() == node.key() || node.contains(target) {
        return Err(NestedSetError::MoveIntoSubtree {
            node: node.key().clone(),
            target: target.key().clone(),
        }
        .into());
    }
    Ok(())
}
