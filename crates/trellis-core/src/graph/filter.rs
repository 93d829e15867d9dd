//! Relationship type/direction filter

use crate::types::node::{Direction, RelationshipType};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// One `(relationship type, direction)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDirection {
    /// Relationship type to follow
    #[serde(rename = "type")]
    pub rel_type: RelationshipType,
    /// Direction relative to the node being expanded
    pub direction: Direction,
}

impl TypeDirection {
    /// Create a new pair
    pub fn new(rel_type: impl Into<RelationshipType>, direction: Direction) -> Self {
        Self {
            rel_type: rel_type.into(),
            direction,
        }
    }
}

/// Ordered list of type/direction pairs a traversal may expand along
///
/// Pairs are kept in insertion order and never de-duplicated. Adding the same
/// pair twice doubles the adjacency lookups but the uniqueness policy still
/// decides whether the neighbor is visited again.
///
/// First 4 pairs are stored inline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDirectionFilter {
    pairs: SmallVec<[TypeDirection; 4]>,
}

impl TypeDirectionFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair
    pub fn add(&mut self, rel_type: impl Into<RelationshipType>, direction: Direction) {
        self.pairs.push(TypeDirection::new(rel_type, direction));
    }

    /// Check if no pair has been added
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &TypeDirection> {
        self.pairs.iter()
    }
}

impl<'a> IntoIterator for &'a TypeDirectionFilter {
    type Item = &'a TypeDirection;
    type IntoIter = std::slice::Iter<'a, TypeDirection>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl FromIterator<TypeDirection> for TypeDirectionFilter {
    fn from_iter<I: IntoIterator<Item = TypeDirection>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for TypeDirectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", pair.direction, pair.rel_type)?;
        }
        f.write_str("]")
    }
}
