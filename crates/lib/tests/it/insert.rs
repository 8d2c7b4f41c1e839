use nestedset::{Identifier, NodeKey, Placement};

use crate::helpers::*;

#[tokio::test]
async fn test_add_root_to_empty_table() {
    let tree = empty_tree().await;

    let root = tree.add_root_node(&key(1)).await.unwrap();
    assert_eq!((root.left(), root.right(), root.depth()), (1, 2, 0));
    assert_eq!(tree.count().await.unwrap(), 1);
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_add_second_root_goes_after_existing_trees() {
    let tree = fixture_tree().await;

    let root = tree.add_root_node(&key(12)).await.unwrap();
    assert_eq!((root.left(), root.right(), root.depth()), (23, 24, 0));
    assert_eq!(position(&tree, 1).await, (1, 22, 0));
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_add_node_below_appends_last_child() {
    let tree = fixture_tree().await;
    let parent = node(&tree, 3).await;

    let child = tree.add_node_below(&parent, &key(12)).await.unwrap();
    assert_eq!((child.left(), child.right(), child.depth()), (21, 22, 2));
    assert_eq!(position(&tree, 3).await, (10, 23, 1));
    assert_eq!(position(&tree, 1).await, (1, 24, 0));

    let children = tree.find_children(&key(3)).await.unwrap();
    assert_eq!(ids(&children), vec![7, 8, 9, 12]);
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_add_node_below_leaf() {
    let tree = fixture_tree().await;
    let leaf = node(&tree, 6).await;

    let child = tree.add_node_below(&leaf, &key(12)).await.unwrap();
    assert_eq!((child.left(), child.right(), child.depth()), (7, 8, 4));
    assert_eq!(position(&tree, 6).await, (6, 9, 3));
    assert_eq!(position(&tree, 4).await, (3, 10, 2));
    assert_eq!(position(&tree, 3).await, (12, 23, 1));
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_add_node_before() {
    let tree = fixture_tree().await;
    let target = node(&tree, 8).await;

    let sibling = tree.add_node_before(&target, &key(12)).await.unwrap();
    assert_eq!((sibling.left(), sibling.right(), sibling.depth()), (17, 18, 2));
    assert_eq!(position(&tree, 8).await, (19, 20, 2));
    assert_eq!(position(&tree, 7).await, (11, 16, 2));

    let children = tree.find_children(&key(3)).await.unwrap();
    assert_eq!(ids(&children), vec![7, 12, 8, 9]);
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_add_node_after() {
    let tree = fixture_tree().await;
    let target = node(&tree, 7).await;

    let sibling = tree.add_node_after(&target, &key(12)).await.unwrap();
    assert_eq!((sibling.left(), sibling.right(), sibling.depth()), (17, 18, 2));
    assert_eq!(position(&tree, 7).await, (11, 16, 2));
    assert_eq!(position(&tree, 8).await, (19, 20, 2));

    let children = tree.find_children(&key(3)).await.unwrap();
    assert_eq!(ids(&children), vec![7, 12, 8, 9]);
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_add_sibling_of_root() {
    let tree = fixture_tree().await;
    let root = node(&tree, 1).await;

    let before = tree.add_node_before(&root, &key(12)).await.unwrap();
    assert_eq!((before.left(), before.right(), before.depth()), (1, 2, 0));
    assert_eq!(position(&tree, 1).await, (3, 24, 0));
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_generic_add_node_matches_named_variants() {
    let tree = fixture_tree().await;
    let target = node(&tree, 5).await;

    let added = tree
        .add_node(Placement::After, &target, &key(12))
        .await
        .unwrap();
    assert_eq!((added.left(), added.right(), added.depth()), (6, 7, 3));
    assert_eq!(tree.find_parent(&key(12)).await.unwrap().unwrap().key(), &key(4));
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_build_tree_from_scratch() {
    let tree = empty_tree().await;

    let root = tree.add_root_node(&NodeKey::new("root", 1)).await.unwrap();
    let a = tree.add_node_below(&root, &NodeKey::new("a", 1)).await.unwrap();
    let root = tree.get_node(root.key()).await.unwrap().unwrap();
    let b = tree.add_node_below(&root, &NodeKey::new("b", 1)).await.unwrap();
    tree.add_node_below(&b, &NodeKey::new("b1", 1)).await.unwrap();
    let a = tree.get_node(a.key()).await.unwrap().unwrap();
    tree.add_node_after(&a, &NodeKey::new("a2", 1)).await.unwrap();

    let order: Vec<String> = tree
        .get_tree()
        .await
        .unwrap()
        .iter()
        .map(|n| n.id().to_string())
        .collect();
    assert_eq!(order, vec!["root", "a", "a2", "b", "b1"]);
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_insert_duplicate_key_fails() {
    let tree = fixture_tree().await;
    let target = node(&tree, 3).await;

    let err = tree.add_node_below(&target, &key(5)).await.unwrap_err();
    assert!(!err.is_not_found());
    assert!(matches!(
        err,
        nestedset::Error::NestedSet(nestedset::NestedSetError::NodeAlreadyExists { .. })
    ));

    let err = tree.add_root_node(&key(1)).await.unwrap_err();
    assert!(matches!(
        err,
        nestedset::Error::NestedSet(nestedset::NestedSetError::NodeAlreadyExists { .. })
    ));

    assert_eq!(tree.count().await.unwrap(), 11);
    assert_integrity(&tree).await;
}

#[tokio::test]
async fn test_numeric_string_keys_come_back_canonical() {
    let tree = empty_tree().await;
    let root_key = NodeKey::new(Identifier::Str("42".to_string()), 1);

    let root = tree.add_root_node(&root_key).await.unwrap();
    assert_eq!(root.id(), &Identifier::Int(42));
    assert_eq!(tree.get_node(&root_key).await.unwrap(), Some(root.clone()));

    let child_key = NodeKey::new(
        Identifier::Str("7".to_string()),
        Identifier::Str("2".to_string()),
    );
    let child = tree.add_node_below(&root, &child_key).await.unwrap();
    assert_eq!(child.key(), &NodeKey::new(7, 2));
    assert_eq!(tree.get_node(child.key()).await.unwrap(), Some(child.clone()));

    // Either spelling of the key finds the same row
    let err = tree.add_root_node(&NodeKey::new(42, 1)).await.unwrap_err();
    assert!(matches!(
        err,
        nestedset::Error::NestedSet(nestedset::NestedSetError::NodeAlreadyExists { .. })
    ));
    assert_integrity(&tree).await;
}
