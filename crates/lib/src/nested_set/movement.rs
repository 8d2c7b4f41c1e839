//! Subtree moves and child adoption.
//!
//! Every move is the same three-step block relocation:
//!
//! 1. open a gap of the block's width at the destination,
//! 2. shift the block into the gap, adjusting depths,
//! 3. close the hole the block left behind.

use std::collections::HashSet;

use sqlx::AnyConnection;

use super::position::{BlockMove, Placement};
use super::storage::AncestorScope;
use super::transaction::{ensure_outside, load_current, reload};
use super::{NestedSet, storage};
use crate::Result;
use crate::node::{Node, NodeKey};

impl NestedSet {
    /// Move `node` and its subtree to become the first child of `target`.
    pub async fn move_sub_tree_below(&self, target: &Node, node: &Node) -> Result<Node> {
        self.move_sub_tree(Placement::Below, target, node).await
    }

    /// Move `node` and its subtree to become the immediate left sibling of `target`.
    pub async fn move_sub_tree_before(&self, target: &Node, node: &Node) -> Result<Node> {
        self.move_sub_tree(Placement::Before, target, node).await
    }

    /// Move `node` and its subtree to become the immediate right sibling of `target`.
    pub async fn move_sub_tree_after(&self, target: &Node, node: &Node) -> Result<Node> {
        self.move_sub_tree(Placement::After, target, node).await
    }

    /// Move `node` and its subtree relative to `target`.
    ///
    /// Returns the moved node as stored after the move. Fails with
    /// [`MoveIntoSubtree`](super::NestedSetError::MoveIntoSubtree) if `target` is
    /// `node` or one of its descendants.
    pub async fn move_sub_tree(
        &self,
        placement: Placement,
        target: &Node,
        node: &Node,
    ) -> Result<Node> {
        let operation = placement.move_operation();
        let mut tx = self.begin(operation).await?;
        let result = self.relocate(&mut tx, placement, target, node).await;
        self.finish(operation, tx, result).await
    }

    /// Detach `node` from its tree and make it a root of its own.
    ///
    /// The subtree is placed immediately before the root of its current tree. A node
    /// that is already a root is returned unchanged.
    pub async fn move_sub_tree_to_root(&self, node: &Node) -> Result<Node> {
        let operation = "move_sub_tree_to_root";
        let mut tx = self.begin(operation).await?;
        let result = self.relocate_to_root(&mut tx, node).await;
        self.finish(operation, tx, result).await
    }

    /// Move every child of `old_parent`, with its subtree, under `new_parent`.
    ///
    /// The adopted children keep their relative order and are appended after
    /// `new_parent`'s existing children. Returns the adopted children as stored after
    /// the move; empty if `old_parent` was a leaf.
    pub async fn adopt_children(&self, old_parent: &Node, new_parent: &Node) -> Result<Vec<Node>> {
        let operation = "adopt_children";
        let mut tx = self.begin(operation).await?;
        let result = self.reparent_children(&mut tx, old_parent, new_parent).await;
        self.finish(operation, tx, result).await
    }

    async fn relocate(
        &self,
        conn: &mut AnyConnection,
        placement: Placement,
        target: &Node,
        node: &Node,
    ) -> Result<Node> {
        let node = load_current(&mut *conn, &self.table, node).await?;
        let target = load_current(&mut *conn, &self.table, target).await?;
        ensure_outside(&node, &target)?;

        let (new_left, new_depth) = placement.move_point(&target);
        let block = BlockMove {
            left: node.left(),
            right: node.right(),
            new_left,
            depth_diff: new_depth - node.depth(),
        };
        self.apply_block_move(&mut *conn, &block).await?;

        let moved = reload(&mut *conn, &self.table, node.key()).await?;
        tracing::debug!(
            table = %self.table,
            node = %moved,
            target = %target.key(),
            ?placement,
            "Moved subtree"
        );
        Ok(moved)
    }

    async fn relocate_to_root(&self, conn: &mut AnyConnection, node: &Node) -> Result<Node> {
        let node = load_current(&mut *conn, &self.table, node).await?;
        let root = storage::fetch_ancestors(&mut *conn, &self.table, node.key(), AncestorScope::Root)
            .await?
            .into_iter()
            .next();

        match root {
            Some(root) => self.relocate(conn, Placement::Before, &root, &node).await,
            None => Ok(node),
        }
    }

    async fn reparent_children(
        &self,
        conn: &mut AnyConnection,
        old_parent: &Node,
        new_parent: &Node,
    ) -> Result<Vec<Node>> {
        let old_parent = load_current(&mut *conn, &self.table, old_parent).await?;
        let new_parent = load_current(&mut *conn, &self.table, new_parent).await?;
        ensure_outside(&old_parent, &new_parent)?;

        if old_parent.is_leaf() {
            return Ok(Vec::new());
        }

        let adopted: HashSet<NodeKey> =
            storage::fetch_descendants(&mut *conn, &self.table, old_parent.key(), 1, 1)
                .await?
                .into_iter()
                .map(|child| child.key().clone())
                .collect();

        let block = BlockMove {
            left: old_parent.left() + 1,
            right: old_parent.right() - 1,
            new_left: new_parent.right(),
            depth_diff: new_parent.depth() - old_parent.depth(),
        };
        self.apply_block_move(&mut *conn, &block).await?;

        let children: Vec<Node> =
            storage::fetch_descendants(&mut *conn, &self.table, new_parent.key(), 1, 1)
                .await?
                .into_iter()
                .filter(|child| adopted.contains(child.key()))
                .collect();

        tracing::debug!(
            table = %self.table,
            from = %old_parent.key(),
            to = %new_parent.key(),
            adopted = children.len(),
            "Adopted children"
        );
        Ok(children)
    }

    async fn apply_block_move(&self, conn: &mut AnyConnection, block: &BlockMove) -> Result<()> {
        let width = block.width();
        let (distance, source_left) = block.shift_plan();

        storage::open_gap(&mut *conn, &self.table, block.new_left, width).await?;
        storage::shift_block(
            &mut *conn,
            &self.table,
            source_left,
            source_left + width - 1,
            distance,
            block.depth_diff,
        )
        .await?;
        storage::close_gap(&mut *conn, &self.table, block.right, width).await?;
        Ok(())
    }
}
