//!
//! Defines the value types describing a node's identity and position.
//!
//! A [`Node`] is a snapshot of one row of a nested-set table. It is never a live
//! reference: after any structural mutation, positions held by the caller may be
//! outdated and must be re-read before being passed to another mutation.

mod errors;
pub mod key;

pub use errors::NodeError;
pub use key::{Identifier, NodeKey};

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// A node's identity together with its nested-set position.
///
/// Construction only enforces the per-value bounds (`left >= 1`, `right >= 1`,
/// `depth >= 0`). Relationships between values, such as `right > left` or proper
/// nesting with other nodes, are properties of the whole tree and are checked by
/// [`integrity::check`](crate::nested_set::integrity::check).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NodeRepr")]
pub struct Node {
    key: NodeKey,
    left: i64,
    right: i64,
    depth: i64,
}

/// Unvalidated serialized form of a [`Node`].
#[derive(Deserialize)]
struct NodeRepr {
    key: NodeKey,
    left: i64,
    right: i64,
    depth: i64,
}

impl TryFrom<NodeRepr> for Node {
    type Error = NodeError;

    fn try_from(repr: NodeRepr) -> Result<Self, Self::Error> {
        Node::new(repr.key, repr.left, repr.right, repr.depth)
    }
}

impl Node {
    /// Creates a node, validating the position bounds.
    pub fn new(key: NodeKey, left: i64, right: i64, depth: i64) -> Result<Self, NodeError> {
        if left < 1 {
            return Err(NodeError::InvalidLeft { left });
        }
        if right < 1 {
            return Err(NodeError::InvalidRight { right });
        }
        if depth < 0 {
            return Err(NodeError::InvalidDepth { depth });
        }
        Ok(Self {
            key,
            left,
            right,
            depth,
        })
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn id(&self) -> &Identifier {
        self.key.id()
    }

    pub fn revision_id(&self) -> &Identifier {
        self.key.revision_id()
    }

    pub fn left(&self) -> i64 {
        self.left
    }

    pub fn right(&self) -> i64 {
        self.right
    }

    pub fn depth(&self) -> i64 {
        self.depth
    }

    /// Number of position units occupied by this node and its descendants.
    pub fn width(&self) -> i64 {
        self.right - self.left + 1
    }

    /// True if the node has no descendants.
    pub fn is_leaf(&self) -> bool {
        self.right == self.left + 1
    }

    /// Number of descendants, derived from the width alone.
    pub fn descendant_count(&self) -> i64 {
        (self.right - self.left - 1) / 2
    }

    /// True if `other` lies strictly inside this node's interval.
    pub fn contains(&self, other: &Node) -> bool {
        self.left < other.left && other.right < self.right
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}] depth {}",
            self.key, self.left, self.right, self.depth
        )
    }
}

/// Renders a preorder dump as an indented table, one node per line.
///
/// Intended for debug logging; the exact layout is not stable.
pub fn render_tree(nodes: &[Node]) -> String {
    let mut out = format!(
        "{:<16} {:>6} {:>6} {:>6} {:>6}\n",
        "ID", "Rev", "Left", "Right", "Depth"
    );
    for node in nodes {
        let indent = "-".repeat(usize::try_from(node.depth).unwrap_or(0));
        let label = format!("{indent}{}", node.id());
        let _ = writeln!(
            out,
            "{:<16} {:>6} {:>6} {:>6} {:>6}",
            label,
            node.revision_id(),
            node.left,
            node.right,
            node.depth
        );
    }
    out
}
