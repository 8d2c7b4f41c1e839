//! Structural validation of a stored tree.
//!
//! [`check`] takes a preorder dump (as returned by
//! [`NestedSet::get_tree`](super::NestedSet::get_tree)) and verifies:
//!
//! - every node has `right > left` and an odd `right - left`
//! - intervals are either nested or disjoint, never partially overlapping
//! - each node's depth equals the number of intervals enclosing it
//! - the positions used are exactly `1..=2n`, each once

use super::NestedSetError;
use crate::node::Node;

fn violation(reason: String) -> NestedSetError {
    NestedSetError::IntegrityViolation { reason }
}

/// Verify that `nodes`, ordered by left position, form a valid nested set.
pub fn check(nodes: &[Node]) -> Result<(), NestedSetError> {
    let mut positions = Vec::with_capacity(nodes.len() * 2);
    // Right positions of the intervals enclosing the current node
    let mut open: Vec<i64> = Vec::new();
    let mut previous_left = 0;

    for node in nodes {
        if node.left() <= previous_left {
            return Err(violation(format!(
                "{node} is out of order after left position {previous_left}"
            )));
        }
        previous_left = node.left();

        if node.right() <= node.left() {
            return Err(violation(format!("{node} has right <= left")));
        }
        if (node.right() - node.left()) % 2 == 0 {
            return Err(violation(format!("{node} has an even width")));
        }

        while open.last().is_some_and(|&right| right < node.left()) {
            open.pop();
        }
        if let Some(&enclosing_right) = open.last()
            && node.right() > enclosing_right
        {
            return Err(violation(format!(
                "{node} overlaps an interval ending at {enclosing_right}"
            )));
        }

        let expected_depth = open.len() as i64;
        if node.depth() != expected_depth {
            return Err(violation(format!(
                "{node} should have depth {expected_depth}"
            )));
        }

        open.push(node.right());
        positions.push(node.left());
        positions.push(node.right());
    }

    positions.sort_unstable();
    for (expected, &actual) in (1..).zip(&positions) {
        if actual != expected {
            return Err(violation(format!(
                "position {expected} is missing or duplicated (found {actual})"
            )));
        }
    }

    Ok(())
}
