//! Row-level SQL for nested-set tables.
//!
//! Reads are generic over the executor so the same statement serves both the pool
//! (plain queries) and an open transaction (reads made while renumbering). Writes
//! always take a connection borrowed from a transaction.

use sqlx::{Any, AnyConnection, Executor};

use crate::Result;
use crate::backend::schema::TableName;
use crate::backend::{BackendError, SqlxResultExt};
use crate::node::{Identifier, Node, NodeKey};

const COLUMNS: &str = "id, revision_id, left_pos, right_pos, depth";

/// Column prefix-qualified for self-joins.
fn columns(alias: &str) -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw row as stored: (id, revision_id, left_pos, right_pos, depth).
type NodeRow = (String, String, i64, i64, i64);

fn node_from_row(table: &TableName, row: NodeRow) -> Result<Node> {
    let (id, revision_id, left, right, depth) = row;
    let key = NodeKey::new(Identifier::parse(&id), Identifier::parse(&revision_id));
    Node::new(key, left, right, depth).map_err(|e| {
        BackendError::InvalidRow {
            table: table.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn nodes_from_rows(table: &TableName, rows: Vec<NodeRow>) -> Result<Vec<Node>> {
    rows.into_iter().map(|row| node_from_row(table, row)).collect()
}

/// Get a node by key.
pub(super) async fn fetch_node<'e, E>(
    executor: E,
    table: &TableName,
    key: &NodeKey,
) -> Result<Option<Node>>
where
    E: Executor<'e, Database = Any>,
{
    let sql = format!("SELECT {COLUMNS} FROM {table} WHERE id = $1 AND revision_id = $2");
    let row: Option<NodeRow> = sqlx::query_as(&sql)
        .bind(key.id().to_string())
        .bind(key.revision_id().to_string())
        .fetch_optional(executor)
        .await
        .sql_context("Failed to get node")?;

    row.map(|row| node_from_row(table, row)).transpose()
}

/// Get the node whose left position is exactly `left`.
pub(super) async fn fetch_node_at<'e, E>(
    executor: E,
    table: &TableName,
    left: i64,
) -> Result<Option<Node>>
where
    E: Executor<'e, Database = Any>,
{
    let sql = format!("SELECT {COLUMNS} FROM {table} WHERE left_pos = $1");
    let row: Option<NodeRow> = sqlx::query_as(&sql)
        .bind(left)
        .fetch_optional(executor)
        .await
        .sql_context("Failed to get node at position")?;

    row.map(|row| node_from_row(table, row)).transpose()
}

/// Get every node in preorder.
pub(super) async fn fetch_tree<'e, E>(executor: E, table: &TableName) -> Result<Vec<Node>>
where
    E: Executor<'e, Database = Any>,
{
    let sql = format!("SELECT {COLUMNS} FROM {table} ORDER BY left_pos");
    let rows: Vec<NodeRow> = sqlx::query_as(&sql)
        .fetch_all(executor)
        .await
        .sql_context("Failed to get tree")?;

    nodes_from_rows(table, rows)
}

/// Count the rows of the table.
pub(super) async fn count<'e, E>(executor: E, table: &TableName) -> Result<i64>
where
    E: Executor<'e, Database = Any>,
{
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let (count,): (i64,) = sqlx::query_as(&sql)
        .fetch_one(executor)
        .await
        .sql_context("Failed to count nodes")?;
    Ok(count)
}

/// Get the descendants of `key` between relative depths `start_depth` and
/// `depth_limit` (unbounded when `depth_limit` is 0), in preorder.
///
/// A `start_depth` of 0 includes the node itself.
pub(super) async fn fetch_descendants<'e, E>(
    executor: E,
    table: &TableName,
    key: &NodeKey,
    depth_limit: u32,
    start_depth: u32,
) -> Result<Vec<Node>>
where
    E: Executor<'e, Database = Any>,
{
    let mut sql = format!(
        "SELECT {} FROM {table} AS child, {table} AS parent
         WHERE parent.id = $1 AND parent.revision_id = $2
           AND child.left_pos >= parent.left_pos
           AND child.right_pos <= parent.right_pos
           AND child.depth >= parent.depth + $3",
        columns("child")
    );
    if depth_limit > 0 {
        sql.push_str(" AND child.depth <= parent.depth + $4");
    }
    sql.push_str(" ORDER BY child.left_pos");

    let mut query = sqlx::query_as::<_, NodeRow>(&sql)
        .bind(key.id().to_string())
        .bind(key.revision_id().to_string())
        .bind(i64::from(start_depth));
    if depth_limit > 0 {
        query = query.bind(i64::from(depth_limit));
    }

    let rows = query
        .fetch_all(executor)
        .await
        .sql_context("Failed to find descendants")?;

    nodes_from_rows(table, rows)
}

/// Which ancestors of a node to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AncestorScope {
    /// Every ancestor, root first.
    All,
    /// Only the top-most ancestor.
    Root,
    /// Only the immediate parent.
    Parent,
}

/// Get the ancestors of `key`, excluding the node itself.
pub(super) async fn fetch_ancestors<'e, E>(
    executor: E,
    table: &TableName,
    key: &NodeKey,
    scope: AncestorScope,
) -> Result<Vec<Node>>
where
    E: Executor<'e, Database = Any>,
{
    let order = match scope {
        AncestorScope::All => "ORDER BY parent.left_pos",
        AncestorScope::Root => "ORDER BY parent.left_pos LIMIT 1",
        AncestorScope::Parent => "ORDER BY parent.left_pos DESC LIMIT 1",
    };
    let sql = format!(
        "SELECT {} FROM {table} AS child, {table} AS parent
         WHERE child.id = $1 AND child.revision_id = $2
           AND parent.left_pos < child.left_pos
           AND parent.right_pos > child.right_pos
         {order}",
        columns("parent")
    );

    let rows: Vec<NodeRow> = sqlx::query_as(&sql)
        .bind(key.id().to_string())
        .bind(key.revision_id().to_string())
        .fetch_all(executor)
        .await
        .sql_context("Failed to find ancestors")?;

    nodes_from_rows(table, rows)
}

/// Highest right position in the table, 0 when empty.
pub(super) async fn max_right(conn: &mut AnyConnection, table: &TableName) -> Result<i64> {
    let sql = format!("SELECT COALESCE(MAX(right_pos), 0) FROM {table}");
    let (max,): (i64,) = sqlx::query_as(&sql)
        .fetch_one(conn)
        .await
        .sql_context("Failed to read highest position")?;
    Ok(max)
}

/// Insert a row for `node` exactly as given.
pub(super) async fn insert_row(
    conn: &mut AnyConnection,
    table: &TableName,
    node: &Node,
) -> Result<()> {
    let sql = format!("INSERT INTO {table} ({COLUMNS}) VALUES ($1, $2, $3, $4, $5)");
    sqlx::query(&sql)
        .bind(node.id().to_string())
        .bind(node.revision_id().to_string())
        .bind(node.left())
        .bind(node.right())
        .bind(node.depth())
        .execute(conn)
        .await
        .sql_context("Failed to insert node")?;
    Ok(())
}

/// Delete the row of a single node.
pub(super) async fn delete_row(
    conn: &mut AnyConnection,
    table: &TableName,
    key: &NodeKey,
) -> Result<u64> {
    let sql = format!("DELETE FROM {table} WHERE id = $1 AND revision_id = $2");
    let result = sqlx::query(&sql)
        .bind(key.id().to_string())
        .bind(key.revision_id().to_string())
        .execute(conn)
        .await
        .sql_context("Failed to delete node")?;
    Ok(result.rows_affected())
}

/// Delete every row whose left position lies in `[left, right]`.
pub(super) async fn delete_range(
    conn: &mut AnyConnection,
    table: &TableName,
    left: i64,
    right: i64,
) -> Result<u64> {
    let sql = format!("DELETE FROM {table} WHERE left_pos BETWEEN $1 AND $2");
    let result = sqlx::query(&sql)
        .bind(left)
        .bind(right)
        .execute(conn)
        .await
        .sql_context("Failed to delete subtree")?;
    Ok(result.rows_affected())
}

#[derive(Debug, Clone, Copy)]
enum Column {
    Left,
    Right,
}

impl Column {
    fn name(self) -> &'static str {
        match self {
            Column::Left => "left_pos",
            Column::Right => "right_pos",
        }
    }
}

/// `column += delta` for every row where `column >= from`.
async fn shift_from(
    conn: &mut AnyConnection,
    table: &TableName,
    column: Column,
    from: i64,
    delta: i64,
) -> Result<u64> {
    let column = column.name();
    let sql = format!("UPDATE {table} SET {column} = {column} + $1 WHERE {column} >= $2");
    let result = sqlx::query(&sql)
        .bind(delta)
        .bind(from)
        .execute(conn)
        .await
        .sql_context(&format!("Failed to shift {column}"))?;
    Ok(result.rows_affected())
}

/// Open `width` free positions starting at `at`.
///
/// Both updates compare against the unshifted `at`, so their order does not matter.
pub(super) async fn open_gap(
    conn: &mut AnyConnection,
    table: &TableName,
    at: i64,
    width: i64,
) -> Result<()> {
    shift_from(&mut *conn, table, Column::Right, at, width).await?;
    shift_from(&mut *conn, table, Column::Left, at, width).await?;
    Ok(())
}

/// Remove `width` positions following `after`, pulling later rows back.
pub(super) async fn close_gap(
    conn: &mut AnyConnection,
    table: &TableName,
    after: i64,
    width: i64,
) -> Result<()> {
    shift_from(&mut *conn, table, Column::Right, after + 1, -width).await?;
    shift_from(&mut *conn, table, Column::Left, after + 1, -width).await?;
    Ok(())
}

/// Shift every row with `left` in `[from, to]` by `distance` positions and
/// `depth_diff` levels.
pub(super) async fn shift_block(
    conn: &mut AnyConnection,
    table: &TableName,
    from: i64,
    to: i64,
    distance: i64,
    depth_diff: i64,
) -> Result<u64> {
    let sql = format!(
        "UPDATE {table}
         SET left_pos = left_pos + $1, right_pos = right_pos + $1, depth = depth + $2
         WHERE left_pos BETWEEN $3 AND $4"
    );
    let result = sqlx::query(&sql)
        .bind(distance)
        .bind(depth_diff)
        .bind(from)
        .bind(to)
        .execute(conn)
        .await
        .sql_context("Failed to shift block")?;
    Ok(result.rows_affected())
}
