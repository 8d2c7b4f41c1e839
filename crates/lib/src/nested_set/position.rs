//! Position arithmetic for insertions and moves.
//!
//! Nothing in here touches the database. Given fresh snapshots, these functions decide
//! where a new slot opens and how far a block of rows has to travel; the statements
//! that apply those numbers live in `storage`.

use crate::node::Node;

/// Where a node goes relative to a target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// As a child of the target.
    Below,
    /// As the target's immediate left sibling.
    Before,
    /// As the target's immediate right sibling.
    After,
}

impl Placement {
    /// Insertion point and depth for a new node.
    ///
    /// `Below` appends the node as the target's last child.
    pub fn insertion_point(self, target: &Node) -> (i64, i64) {
        match self {
            Placement::Below => (target.right(), target.depth() + 1),
            Placement::Before => (target.left(), target.depth()),
            Placement::After => (target.right() + 1, target.depth()),
        }
    }

    /// New left position and depth for a moved subtree.
    ///
    /// Unlike insertion, `Below` makes the moved subtree the target's first child.
    pub fn move_point(self, target: &Node) -> (i64, i64) {
        match self {
            Placement::Below => (target.left() + 1, target.depth() + 1),
            Placement::Before => (target.left(), target.depth()),
            Placement::After => (target.right() + 1, target.depth()),
        }
    }

    pub(super) fn insert_operation(self) -> &'static str {
        match self {
            Placement::Below => "add_node_below",
            Placement::Before => "add_node_before",
            Placement::After => "add_node_after",
        }
    }

    pub(super) fn move_operation(self) -> &'static str {
        match self {
            Placement::Below => "move_sub_tree_below",
            Placement::Before => "move_sub_tree_before",
            Placement::After => "move_sub_tree_after",
        }
    }
}

/// Relocation of a contiguous block of positions `[left, right]`.
///
/// The block is a whole subtree for subtree moves, or every descendant of a node when
/// adopting children. `new_left` is measured before any renumbering and must lie
/// outside the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMove {
    pub left: i64,
    pub right: i64,
    pub new_left: i64,
    pub depth_diff: i64,
}

impl BlockMove {
    pub fn width(&self) -> i64 {
        self.right - self.left + 1
    }

    /// Distance to shift the block, and where the block starts once the gap at
    /// `new_left` has been opened.
    ///
    /// A block moving backwards sits after the gap, so it has been pushed `width`
    /// further away from its destination.
    pub fn shift_plan(&self) -> (i64, i64) {
        let width = self.width();
        let mut distance = self.new_left - self.left;
        let mut source_left = self.left;
        if distance < 0 {
            distance -= width;
            source_left += width;
        }
        (distance, source_left)
    }
}
