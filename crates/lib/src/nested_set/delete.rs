//! Node and subtree deletion.

use sqlx::AnyConnection;

use super::transaction::load_current;
use super::{NestedSet, storage};
use crate::Result;
use crate::node::Node;

impl NestedSet {
    /// Delete a single node, promoting its descendants one level.
    ///
    /// The former children take the deleted node's place among its siblings, in
    /// their original order.
    pub async fn delete_node(&self, node: &Node) -> Result<()> {
        let operation = "delete_node";
        let mut tx = self.begin(operation).await?;
        let result = self.remove_node(&mut tx, node).await;
        self.finish(operation, tx, result).await
    }

    /// Delete a node together with all of its descendants.
    ///
    /// Returns the number of deleted rows.
    pub async fn delete_sub_tree(&self, node: &Node) -> Result<u64> {
        let operation = "delete_sub_tree";
        let mut tx = self.begin(operation).await?;
        let result = self.remove_sub_tree(&mut tx, node).await;
        self.finish(operation, tx, result).await
    }

    async fn remove_node(&self, conn: &mut AnyConnection, node: &Node) -> Result<()> {
        let node = load_current(&mut *conn, &self.table, node).await?;

        storage::delete_row(&mut *conn, &self.table, node.key()).await?;
        if !node.is_leaf() {
            storage::shift_block(
                &mut *conn,
                &self.table,
                node.left() + 1,
                node.right() - 1,
                -1,
                -1,
            )
            .await?;
        }
        storage::close_gap(&mut *conn, &self.table, node.right(), 2).await?;

        tracing::debug!(table = %self.table, node = %node, "Deleted node");
        Ok(())
    }

    async fn remove_sub_tree(&self, conn: &mut AnyConnection, node: &Node) -> Result<u64> {
        let node = load_current(&mut *conn, &self.table, node).await?;

        let deleted = storage::delete_range(&mut *conn, &self.table, node.left(), node.right()).await?;
        storage::close_gap(&mut *conn, &self.table, node.right(), node.width()).await?;

        tracing::debug!(table = %self.table, node = %node, deleted, "Deleted subtree");
        Ok(deleted)
    }
}
