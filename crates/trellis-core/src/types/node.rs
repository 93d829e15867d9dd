//! Node and relationship identities
//!
//! The traversal engine owns no graph structure. Nodes are plain store-assigned
//! ids and relationships are small value records handed out by a `GraphStore`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Store-assigned node identity
pub type NodeId = u64;

/// Store-assigned relationship identity
pub type RelationshipId = u64;

/// Relationship type tag (e.g. `"friend"`, `"next"`)
///
/// Backed by `Arc<str>` so filters and relationships can share the same
/// allocation. Serializes as a plain string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipType(Arc<str>);

impl RelationshipType {
    /// Create a relationship type from any string-like name
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The type name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RelationshipType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RelationshipType {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&String> for RelationshipType {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<&RelationshipType> for RelationshipType {
    fn from(rel_type: &RelationshipType) -> Self {
        rel_type.clone()
    }
}

impl AsRef<str> for RelationshipType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl Serialize for RelationshipType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RelationshipType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from(name))
    }
}

/// Direction of a relationship relative to the node being expanded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Relationships starting at the node
    Outgoing,
    /// Relationships ending at the node
    Incoming,
    /// Either of the above
    Both,
}

impl Direction {
    /// The direction seen from the other endpoint
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Both => Direction::Both,
        }
    }

    /// Check whether `other` is covered by this direction
    ///
    /// `Both` covers everything; `Outgoing`/`Incoming` only cover themselves.
    pub fn covers(self, other: Direction) -> bool {
        self == Direction::Both || self == other
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Outgoing => "OUTGOING",
            Direction::Incoming => "INCOMING",
            Direction::Both => "BOTH",
        };
        f.write_str(name)
    }
}

/// A typed, directed edge between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier
    pub id: RelationshipId,
    /// Relationship type
    #[serde(rename = "type")]
    pub rel_type: RelationshipType,
    /// Start node
    pub start: NodeId,
    /// End node
    pub end: NodeId,
}

impl Relationship {
    /// Create a new relationship `start -[rel_type]-> end`
    pub fn new(
        id: RelationshipId,
        rel_type: impl Into<RelationshipType>,
        start: NodeId,
        end: NodeId,
    ) -> Self {
        Self {
            id,
            rel_type: rel_type.into(),
            start,
            end,
        }
    }

    /// The endpoint opposite to `from`
    ///
    /// Returns `None` if `from` is not an endpoint of this relationship.
    pub fn other_node(&self, from: NodeId) -> Option<NodeId> {
        if from == self.start {
            Some(self.end)
        } else if from == self.end {
            Some(self.start)
        } else {
            None
        }
    }

    /// Check if this relationship starts and ends at the same node
    pub fn is_loop(&self) -> bool {
        self.start == self.end
    }

    /// Direction of this relationship as seen from `node`
    ///
    /// Loops are reported as `Both`.
    pub fn direction_from(&self, node: NodeId) -> Option<Direction> {
        match (self.start == node, self.end == node) {
            (true, true) => Some(Direction::Both),
            (true, false) => Some(Direction::Outgoing),
            (false, true) => Some(Direction::Incoming),
            (false, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_other_node() {
        let rel = Relationship::new(7, "friend", 1, 2);
        assert_eq!(rel.other_node(1), Some(2));
        assert_eq!(rel.other_node(2), Some(1));
        assert_eq!(rel.other_node(3), None);
        assert!(!rel.is_loop());
    }

    #[test]
    fn test_relationship_direction_from() {
        let rel = Relationship::new(1, "next", 10, 20);
        assert_eq!(rel.direction_from(10), Some(Direction::Outgoing));
        assert_eq!(rel.direction_from(20), Some(Direction::Incoming));
        assert_eq!(rel.direction_from(30), None);

        let self_loop = Relationship::new(2, "next", 5, 5);
        assert!(self_loop.is_loop());
        assert_eq!(self_loop.direction_from(5), Some(Direction::Both));
    }

    #[test]
    fn test_direction_covers() {
        assert!(Direction::Both.covers(Direction::Outgoing));
        assert!(Direction::Both.covers(Direction::Incoming));
        assert!(Direction::Outgoing.covers(Direction::Outgoing));
        assert!(!Direction::Outgoing.covers(Direction::Incoming));
        assert_eq!(Direction::Outgoing.reverse(), Direction::Incoming);
        assert_eq!(Direction::Both.reverse(), Direction::Both);
    }

    #[test]
    fn test_relationship_type_shares_name() {
        let a = RelationshipType::from("friend");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.name(), "friend");
        assert_eq!(a.to_string(), "friend");
        assert_eq!(format!("{:?}", a), "\"friend\"");
    }

    #[test]
    fn test_relationship_serde() {
        let rel = Relationship::new(3, "knows", 1, 2);
        let json = serde_json::to_string(&rel).unwrap();
        assert_eq!(json, r#"{"id":3,"type":"knows","start":1,"end":2}"#);

        let back: Relationship = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rel);

        assert_eq!(serde_json::to_string(&Direction::Both).unwrap(), "\"both\"");
    }
}
