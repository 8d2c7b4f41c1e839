//! Node insertion.

use sqlx::AnyConnection;

use super::position::Placement;
use super::transaction::{ensure_absent, load_current, reload};
use super::{NestedSet, storage};
use crate::Result;
use crate::node::{Node, NodeKey};

impl NestedSet {
    /// Insert a new root after every existing node.
    ///
    /// The new root takes positions `[max_right + 1, max_right + 2]` at depth 0, so a
    /// table can hold several trees side by side.
    pub async fn add_root_node(&self, key: &NodeKey) -> Result<Node> {
        let operation = "add_root_node";
        let mut tx = self.begin(operation).await?;
        let result = self.insert_root(&mut tx, key).await;
        self.finish(operation, tx, result).await
    }

    /// Insert a new node as the last child of `target`.
    pub async fn add_node_below(&self, target: &Node, key: &NodeKey) -> Result<Node> {
        self.add_node(Placement::Below, target, key).await
    }

    /// Insert a new node as the immediate left sibling of `target`.
    pub async fn add_node_before(&self, target: &Node, key: &NodeKey) -> Result<Node> {
        self.add_node(Placement::Before, target, key).await
    }

    /// Insert a new node as the immediate right sibling of `target`.
    pub async fn add_node_after(&self, target: &Node, key: &NodeKey) -> Result<Node> {
        self.add_node(Placement::After, target, key).await
    }

    /// Insert a new node relative to `target`.
    pub async fn add_node(&self, placement: Placement, target: &Node, key: &NodeKey) -> Result<Node> {
        let operation = placement.insert_operation();
        let mut tx = self.begin(operation).await?;
        let result = self.insert_relative(&mut tx, placement, target, key).await;
        self.finish(operation, tx, result).await
    }

    async fn insert_root(&self, conn: &mut AnyConnection, key: &NodeKey) -> Result<Node> {
        ensure_absent(&mut *conn, &self.table, key).await?;

        let max_right = storage::max_right(&mut *conn, &self.table).await?;
        let row = Node::new(key.clone(), max_right + 1, max_right + 2, 0)?;
        storage::insert_row(&mut *conn, &self.table, &row).await?;
        let node = reload(&mut *conn, &self.table, key).await?;

        tracing::debug!(table = %self.table, node = %node, "Added root node");
        Ok(node)
    }

    async fn insert_relative(
        &self,
        conn: &mut AnyConnection,
        placement: Placement,
        target: &Node,
        key: &NodeKey,
    ) -> Result<Node> {
        let target = load_current(&mut *conn, &self.table, target).await?;
        ensure_absent(&mut *conn, &self.table, key).await?;

        let (position, depth) = placement.insertion_point(&target);
        let row = Node::new(key.clone(), position, position + 1, depth)?;

        storage::open_gap(&mut *conn, &self.table, position, 2).await?;
        storage::insert_row(&mut *conn, &self.table, &row).await?;
        let node = reload(&mut *conn, &self.table, key).await?;

        tracing::debug!(
            table = %self.table,
            node = %node,
            target = %target.key(),
            ?placement,
            "Added node"
        );
        Ok(node)
    }
}
