//! Read-only queries.
//!
//! Queries run directly on the pool without a transaction. Keys that have no row
//! produce empty results rather than errors.

use super::storage::AncestorScope;
use super::{NestedSet, storage};
use crate::Result;
use crate::node::{Node, NodeKey};

impl NestedSet {
    /// Get a node by key.
    pub async fn get_node(&self, key: &NodeKey) -> Result<Option<Node>> {
        storage::fetch_node(self.backend.pool(), &self.table, key).await
    }

    /// Get the node whose left position is `left`.
    pub async fn get_node_at_position(&self, left: i64) -> Result<Option<Node>> {
        storage::fetch_node_at(self.backend.pool(), &self.table, left).await
    }

    /// Get the descendants of a node in preorder.
    ///
    /// Only descendants whose depth relative to the node lies in
    /// `[start_depth, depth_limit]` are returned; a `depth_limit` of 0 means no upper
    /// bound. A `start_depth` of 0 includes the node itself, so the full subtree is
    /// `find_descendants(key, 0, 0)`.
    pub async fn find_descendants(
        &self,
        key: &NodeKey,
        depth_limit: u32,
        start_depth: u32,
    ) -> Result<Vec<Node>> {
        storage::fetch_descendants(
            self.backend.pool(),
            &self.table,
            key,
            depth_limit,
            start_depth,
        )
        .await
    }

    /// Get the immediate children of a node, ordered by position.
    pub async fn find_children(&self, key: &NodeKey) -> Result<Vec<Node>> {
        self.find_descendants(key, 1, 1).await
    }

    /// Get the ancestors of a node, root first and parent last.
    ///
    /// The node itself is not included.
    pub async fn find_ancestors(&self, key: &NodeKey) -> Result<Vec<Node>> {
        storage::fetch_ancestors(self.backend.pool(), &self.table, key, AncestorScope::All).await
    }

    /// Get the immediate parent of a node, `None` for roots.
    pub async fn find_parent(&self, key: &NodeKey) -> Result<Option<Node>> {
        let parents =
            storage::fetch_ancestors(self.backend.pool(), &self.table, key, AncestorScope::Parent)
                .await?;
        Ok(parents.into_iter().next())
    }

    /// Get the root of the tree containing a node, `None` if the node is a root.
    pub async fn find_root(&self, key: &NodeKey) -> Result<Option<Node>> {
        let roots =
            storage::fetch_ancestors(self.backend.pool(), &self.table, key, AncestorScope::Root)
                .await?;
        Ok(roots.into_iter().next())
    }

    /// Get every node of the table in preorder.
    pub async fn get_tree(&self) -> Result<Vec<Node>> {
        storage::fetch_tree(self.backend.pool(), &self.table).await
    }

    /// Number of nodes in the table.
    pub async fn count(&self) -> Result<i64> {
        storage::count(self.backend.pool(), &self.table).await
    }
}
