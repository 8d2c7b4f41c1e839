//!
//! The nested-set engine.
//!
//! [`NestedSet`] binds a [`SqlxBackend`] to one validated table and implements every
//! tree operation on top of it:
//!
//! - **Insertion**: `add_root_node`, `add_node_below`, `add_node_before`, `add_node_after`
//! - **Queries**: `get_node`, `get_node_at_position`, `find_descendants`, `find_children`,
//!   `find_ancestors`, `find_parent`, `find_root`, `get_tree`, `count`
//! - **Deletion**: `delete_node`, `delete_sub_tree`
//! - **Movement**: `move_sub_tree_below`, `move_sub_tree_before`, `move_sub_tree_after`,
//!   `move_sub_tree_to_root`, `adopt_children`
//!
//! Mutations run inside a single transaction and commit only if every statement
//! succeeded. Nodes passed into a mutation are snapshots; they are re-read inside the
//! transaction and the mutation fails with [`NestedSetError::StaleNode`] if the tree
//! has changed underneath them. Results of a mutation are always read back from the
//! same transaction, so they can be passed straight into the next one.
//!
//! ## Example
//!
//! ```ignore
//! use nestedset::{NestedSet, NodeKey, SqlxBackend};
//!
//! let backend = SqlxBackend::sqlite_in_memory().await?;
//! let tree = NestedSet::new(backend, "menu")?;
//! tree.create_table().await?;
//!
//! let root = tree.add_root_node(&NodeKey::new(1, 1)).await?;
//! let child = tree.add_node_below(&root, &NodeKey::new(2, 1)).await?;
//! assert_eq!(tree.find_children(root.key()).await?, vec![child]);
//! ```

mod delete;
mod errors;
mod insert;
pub mod integrity;
mod movement;
mod position;
mod query;
mod storage;
mod transaction;

pub use errors::NestedSetError;
pub use position::Placement;

use crate::Result;
use crate::backend::SqlxBackend;
use crate::backend::schema::{self, TableName};
use crate::config::NestedSetConfig;

/// A tree stored in one nested-set table.
///
/// Cloning is cheap: clones share the backend's connection pool.
#[derive(Debug, Clone)]
pub struct NestedSet {
    backend: SqlxBackend,
    table: TableName,
}

impl NestedSet {
    /// Bind a backend to a table.
    ///
    /// The table name is validated but the table itself is not touched; call
    /// [`create_table`](Self::create_table) or use [`open`](Self::open) to provision it.
    pub fn new(backend: SqlxBackend, table: &str) -> Result<Self> {
        Ok(Self {
            backend,
            table: TableName::new(table)?,
        })
    }

    /// Bind a backend to the configured table, creating it if requested.
    pub async fn open(backend: SqlxBackend, config: &NestedSetConfig) -> Result<Self> {
        let tree = Self::new(backend, &config.table)?;
        if config.create_table {
            tree.create_table().await?;
        }
        Ok(tree)
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    pub fn backend(&self) -> &SqlxBackend {
        &self.backend
    }

    /// Create the table and its indexes if they don't exist.
    pub async fn create_table(&self) -> Result<()> {
        schema::create_table(&self.backend, &self.table).await
    }

    /// Drop the table and every node in it.
    pub async fn drop_table(&self) -> Result<()> {
        schema::drop_table(&self.backend, &self.table).await
    }

    pub async fn table_exists(&self) -> Result<bool> {
        schema::table_exists(&self.backend, &self.table).await
    }

    /// Check the stored tree against the nested-set invariants.
    ///
    /// Returns [`NestedSetError::IntegrityViolation`] describing the first problem found.
    pub async fn verify_integrity(&self) -> Result<()> {
        let nodes = self.get_tree().await?;
        integrity::check(&nodes)?;
        Ok(())
    }
}
