use crate::helpers::*;

#[tokio::test]
async fn test_delete_node_promotes_children() {
    let tree = fixture_tree().await;
    let target = node(&tree, 4).await;

    tree.delete_node(&target).await.unwrap();

    assert!(tree.get_node(&key(4)).await.unwrap().is_none());
    assert_eq!(position(&tree, 5).await, (3, 4, 2));
    assert_eq!(position(&tree, 6).await, (5, 6, 2));
    assert_eq!(position(&tree, 2).await, (2, 7, 1));
    assert_eq!(position(&tree, 3).await, (8, 19, 1));
    assert_eq!(position(&tree, 1).await, (1, 20, 0));

    let children = tree.find_children(&key(2)).await.unwrap();
    assert_eq!(ids(&children), vec![5, 6]);
    assert_eq!(tree.count().await.unwrap(), 10);
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_delete_leaf() {
    let tree = fixture_tree().await;
    let target = node(&tree, 8).await;

    tree.delete_node(&target).await.unwrap();

    assert_eq!(position(&tree, 9).await, (17, 18, 2));
    assert_eq!(position(&tree, 3).await, (10, 19, 1));
    assert_eq!(position(&tree, 7).await, (11, 16, 2));
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_delete_root_promotes_whole_tree() {
    let tree = fixture_tree().await;
    let root = node(&tree, 1).await;

    tree.delete_node(&root).await.unwrap();

    assert_eq!(position(&tree, 2).await, (1, 8, 0));
    assert_eq!(position(&tree, 3).await, (9, 20, 0));
    assert_eq!(position(&tree, 10).await, (11, 12, 2));
    assert!(tree.find_root(&key(10)).await.unwrap().is_some());
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_delete_sub_tree() {
    let tree = fixture_tree().await;
    let target = node(&tree, 4).await;

    let deleted = tree.delete_sub_tree(&target).await.unwrap();
    assert_eq!(deleted, 3);

    for id in [4, 5, 6] {
        assert!(tree.get_node(&key(id)).await.unwrap().is_none());
    }
    assert_eq!(position(&tree, 2).await, (2, 3, 1));
    assert_eq!(position(&tree, 3).await, (4, 15, 1));
    assert_eq!(position(&tree, 11).await, (8, 9, 3));
    assert_eq!(position(&tree, 1).await, (1, 16, 0));
    assert_eq!(tree.count().await.unwrap(), 8);
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_delete_whole_tree() {
    let tree = fixture_tree().await;
    let second = tree.add_root_node(&key(12)).await.unwrap();
    let root = node(&tree, 1).await;

    let deleted = tree.delete_sub_tree(&root).await.unwrap();
    assert_eq!(deleted, 11);

    let remaining = tree.get_tree().await.unwrap();
    assert_eq!(ids(&remaining), vec![12]);
    assert_eq!((remaining[0].left(), remaining[0].right()), (1, 2));
    assert_ne!(remaining[0].left(), second.left());
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_delete_missing_node_fails() {
    let tree = fixture_tree().await;
    let target = node(&tree, 9).await;
    tree.delete_node(&target).await.unwrap();

    // The snapshot now points at a row that is gone
    let err = tree.delete_node(&target).await.unwrap_err();
    assert!(err.is_not_found());
    let err = tree.delete_sub_tree(&target).await.unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(tree.count().await.unwrap(), 10);
    assert_integrity(&tree).await;
}
