//! Identifier types used to address nodes.
//!
//! A node is identified by an entity ID plus a revision ID. Either part may be an
//! integer or a string, so both are modelled as the [`Identifier`] sum type.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An integer-or-string identifier.
///
/// Strings that are the exact base-10 rendering of an `i64` are normalized to
/// [`Identifier::Int`] on construction. Identifiers are persisted as text, so this
/// keeps `Identifier::from("42")`, `Identifier::from(42)` and the value decoded from
/// storage equal to each other.
///
/// Ordering places every integer before every string; integers compare numerically
/// and strings lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged, from = "RawIdentifier")]
pub enum Identifier {
    /// Integer identifier.
    Int(i64),
    /// Free-form string identifier.
    Str(String),
}

/// Wire shape of an identifier before normalization.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    Int(i64),
    Str(String),
}

impl From<RawIdentifier> for Identifier {
    fn from(raw: RawIdentifier) -> Self {
        match raw {
            RawIdentifier::Int(n) => Identifier::Int(n),
            RawIdentifier::Str(s) => s.into(),
        }
    }
}

impl Identifier {
    /// Parses a stored identifier, recovering the integer form when possible.
    pub fn parse(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Identifier::Int(n),
            _ => Identifier::Str(s.to_string()),
        }
    }

    /// Returns the integer value, if this is an integer identifier.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Identifier::Int(n) => Some(*n),
            Identifier::Str(_) => None,
        }
    }

    /// Returns the string value, if this is a string identifier.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Identifier::Int(_) => None,
            Identifier::Str(s) => Some(s),
        }
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Int(a), Identifier::Int(b)) => a.cmp(b),
            (Identifier::Int(_), Identifier::Str(_)) => Ordering::Less,
            (Identifier::Str(_), Identifier::Int(_)) => Ordering::Greater,
            (Identifier::Str(a), Identifier::Str(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(n) => write!(f, "{n}"),
            Identifier::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Identifier::Int(n)
    }
}

impl From<i32> for Identifier {
    fn from(n: i32) -> Self {
        Identifier::Int(n.into())
    }
}

impl From<u32> for Identifier {
    fn from(n: u32) -> Self {
        Identifier::Int(n.into())
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::parse(s)
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Identifier::Int(n),
            _ => Identifier::Str(s),
        }
    }
}

impl From<&Identifier> for String {
    fn from(id: &Identifier) -> Self {
        id.to_string()
    }
}

/// Unique identity of a node: an entity ID plus its revision ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    id: Identifier,
    revision_id: Identifier,
}

impl NodeKey {
    /// Creates a key from anything convertible into identifiers.
    pub fn new(id: impl Into<Identifier>, revision_id: impl Into<Identifier>) -> Self {
        Self {
            id: id.into(),
            revision_id: revision_id.into(),
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn revision_id(&self) -> &Identifier {
        &self.revision_id
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.revision_id)
    }
}

impl<I, R> From<(I, R)> for NodeKey
where
    I: Into<Identifier>,
    R: Into<Identifier>,
{
    fn from((id, revision_id): (I, R)) -> Self {
        NodeKey::new(id, revision_id)
    }
}
