//! Failure paths: every rejected mutation must leave the stored tree untouched.

use nestedset::{NestedSet, Node, NodeKey};

use crate::helpers::*;

#[tokio::test]
async fn test_stale_snapshot_is_rejected() {
    let tree = fixture_tree().await;
    let stale = node(&tree, 8).await;

    // Shifts node 8 two positions right
    let parent = node(&tree, 2).await;
    tree.add_node_below(&parent, &key(12)).await.unwrap();
    let before = dump(&tree).await;

    let err = tree.delete_node(&stale).await.unwrap_err();
    assert!(err.is_stale());

    let root = node(&tree, 1).await;
    let err = tree.move_sub_tree_below(&root, &stale).await.unwrap_err();
    assert!(err.is_stale());

    let err = tree.add_node_after(&stale, &key(13)).await.unwrap_err();
    assert!(err.is_stale());

    assert_eq!(dump(&tree).await, before);
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_stale_target_is_rejected() {
    let tree = fixture_tree().await;
    let stale_target = node(&tree, 3).await;

    let leaf = node(&tree, 5).await;
    tree.delete_node(&leaf).await.unwrap();
    let before = dump(&tree).await;

    let moved = node(&tree, 6).await;
    let err = tree
        .move_sub_tree_below(&stale_target, &moved)
        .await
        .unwrap_err();
    assert!(err.is_stale());
    assert_eq!(dump(&tree).await, before);
}

#[tokio::test]
async fn test_move_into_own_subtree_is_rejected() {
    let tree = fixture_tree().await;
    let before = dump(&tree).await;
    let moved = node(&tree, 3).await;

    for target_id in [3, 7, 10] {
        let target = node(&tree, target_id).await;
        let err = tree.move_sub_tree_below(&target, &moved).await.unwrap_err();
        assert!(err.is_integrity_error(), "target {target_id}: {err}");

        let err = tree.move_sub_tree_after(&target, &moved).await.unwrap_err();
        assert!(err.is_integrity_error(), "target {target_id}: {err}");
    }

    assert_eq!(dump(&tree).await, before);
}

#[tokio::test]
async fn test_adopt_into_own_subtree_is_rejected() {
    let tree = fixture_tree().await;
    let before = dump(&tree).await;
    let old_parent = node(&tree, 3).await;

    for new_parent_id in [3, 7] {
        let new_parent = node(&tree, new_parent_id).await;
        let err = tree
            .adopt_children(&old_parent, &new_parent)
            .await
            .unwrap_err();
        assert!(err.is_integrity_error());
    }

    assert_eq!(dump(&tree).await, before);
}

#[tokio::test]
async fn test_failed_statement_rolls_back_earlier_writes() {
    let tree = NestedSet::new(test_backend().await, "bounded").unwrap();
    // Same layout as the managed schema, with a cap on left positions
    let create = format!(
        "CREATE TABLE {} (
            id TEXT NOT NULL,
            revision_id TEXT NOT NULL,
            left_pos BIGINT NOT NULL CHECK (left_pos < 21),
            right_pos BIGINT NOT NULL,
            depth BIGINT NOT NULL,
            PRIMARY KEY (id, revision_id)
        )",
        tree.table()
    );
    sqlx::query(&create)
        .execute(tree.backend().pool())
        .await
        .unwrap();
    load_fixture(&tree).await;
    let before = dump(&tree).await;

    // Right positions are shifted before the insert at left 21 fails
    let target = node(&tree, 9).await;
    let err = tree.add_node_after(&target, &key(12)).await.unwrap_err();
    assert!(err.is_database_error());

    assert_eq!(dump(&tree).await, before);
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_missing_target_is_not_found() {
    let tree = fixture_tree().await;
    let gone = node(&tree, 11).await;
    tree.delete_node(&gone).await.unwrap();

    let err = tree.add_node_below(&gone, &key(12)).await.unwrap_err();
    assert!(err.is_not_found());

    let err = tree.move_sub_tree_to_root(&gone).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(tree.count().await.unwrap(), 10);
}

#[tokio::test]
async fn test_clones_share_the_table() {
    let tree = fixture_tree().await;
    let other = tree.clone();

    let parent = node(&other, 9).await;
    other.add_node_below(&parent, &key(12)).await.unwrap();

    assert_eq!(position(&tree, 12).await, (20, 21, 3));
    assert_eq!(tree.count().await.unwrap(), 12);
}

/// Conflicts a concurrent writer may legitimately report.
fn is_conflict(err: &nestedset::Error) -> bool {
    err.is_stale() || err.is_database_error()
}

/// Adds `new_key` below node 1, re-reading the parent after each conflict.
async fn add_below_root(tree: NestedSet, new_key: NodeKey) -> nestedset::Result<Node> {
    let mut attempts = 0;
    loop {
        let root = node(&tree, 1).await;
        match tree.add_node_below(&root, &new_key).await {
            Err(err) if is_conflict(&err) && attempts < 20 => {
                attempts += 1;
                tokio::task::yield_now().await;
            }
            result => return result,
        }
    }
}

/// Moves node `id` below node `target_id`, re-reading both after each conflict.
async fn move_below(tree: NestedSet, id: i64, target_id: i64) -> nestedset::Result<Node> {
    let mut attempts = 0;
    loop {
        let target = node(&tree, target_id).await;
        let moved = node(&tree, id).await;
        match tree.move_sub_tree_below(&target, &moved).await {
            Err(err) if is_conflict(&err) && attempts < 20 => {
                attempts += 1;
                tokio::task::yield_now().await;
            }
            result => return result,
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_on_clones() {
    let tree = fixture_tree().await;

    let handles: Vec<_> = (100..108)
        .map(|id| tokio::spawn(add_below_root(tree.clone(), key(id))))
        .collect();

    let mut added = 0;
    for handle in handles {
        match handle.await.expect("insert task panicked") {
            Ok(node) => {
                assert_eq!(node.depth(), 1);
                added += 1;
            }
            Err(err) => assert!(is_conflict(&err), "unexpected error: {err}"),
        }
    }

    assert!(added > 0);
    assert_eq!(tree.count().await.unwrap(), 11 + added);
    assert_eq!(tree.find_children(&key(1)).await.unwrap().len() as i64, 2 + added);
    assert_integrity(&tree).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_on_clones() {
    let tree = fixture_tree().await;

    // No target lies inside a moved subtree
    let moves = [(5, 3), (6, 3), (8, 2), (9, 2), (10, 2), (11, 4)];
    let handles: Vec<_> = moves
        .into_iter()
        .map(|(id, target_id)| tokio::spawn(move_below(tree.clone(), id, target_id)))
        .collect();

    for handle in handles {
        if let Err(err) = handle.await.expect("move task panicked") {
            assert!(is_conflict(&err), "unexpected error: {err}");
        }
    }

    assert_eq!(tree.count().await.unwrap(), 11);
    assert_integrity(&tree).await;
}
