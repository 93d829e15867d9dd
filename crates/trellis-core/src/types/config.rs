//! Traversal configuration types
//!
//! A `TraversalConfig` is the serializable form of a traversal descriptor.
//! Defaults match the builder: depth 1, breadth-first, resolved output,
//! node-global uniqueness. The relationship list has no default and must be
//! filled in before iterating.

use crate::error::ConfigError;
use crate::graph::descriptor::TraversalDescriptor;
use crate::graph::filter::TypeDirection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How far a traversal expands from its start node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DepthRepr", into = "DepthRepr")]
pub enum Depth {
    /// Stop expanding at this many hops
    Levels(u32),
    /// Expand until the frontier is exhausted
    All,
}

impl Depth {
    /// Keyword accepted for unbounded depth
    pub const ALL_KEYWORD: &'static str = "all";

    /// Check if this depth is unbounded
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Depth::All)
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth::Levels(1)
    }
}

impl From<u32> for Depth {
    fn from(levels: u32) -> Self {
        Depth::Levels(levels)
    }
}

impl TryFrom<i64> for Depth {
    type Error = ConfigError;

    fn try_from(levels: i64) -> Result<Self, Self::Error> {
        if levels < 0 {
            return Err(ConfigError::InvalidParameter {
                name: "depth",
                message: format!("must be >= 0, got {}", levels),
            });
        }
        u32::try_from(levels)
            .map(Depth::Levels)
            .map_err(|_| ConfigError::InvalidParameter {
                name: "depth",
                message: format!("must be <= {}, got {}", u32::MAX, levels),
            })
    }
}

impl FromStr for Depth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::ALL_KEYWORD) {
            return Ok(Depth::All);
        }
        match s.parse::<i64>() {
            Ok(levels) => Depth::try_from(levels),
            Err(_) => Err(ConfigError::InvalidParameter {
                name: "depth",
                message: format!("expected a non-negative integer or \"all\", got {:?}", s),
            }),
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Levels(levels) => write!(f, "{}", levels),
            Depth::All => f.write_str(Self::ALL_KEYWORD),
        }
    }
}

/// Wire form of `Depth`: a number or the keyword `"all"`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DepthRepr {
    Levels(i64),
    Keyword(String),
}

impl TryFrom<DepthRepr> for Depth {
    type Error = ConfigError;

    fn try_from(repr: DepthRepr) -> Result<Self, Self::Error> {
        match repr {
            DepthRepr::Levels(levels) => Depth::try_from(levels),
            DepthRepr::Keyword(keyword) => keyword.parse(),
        }
    }
}

impl From<Depth> for DepthRepr {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Levels(levels) => DepthRepr::Levels(i64::from(levels)),
            Depth::All => DepthRepr::Keyword(Depth::ALL_KEYWORD.to_string()),
        }
    }
}

/// Order in which the frontier is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// FIFO frontier: positions come out in non-decreasing depth
    #[default]
    BreadthFirst,
    /// LIFO frontier: follows each branch to its end before backtracking
    DepthFirst,
}

/// Duplicate-visit policy for graphs that may contain cycles
///
/// | Variant | Visits per node | Terminates on cyclic graphs |
/// |---------|-----------------|-----------------------------|
/// | `NodeGlobal` | at most once | always |
/// | `None` | once per path | only with a depth bound |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Uniqueness {
    /// Track visited nodes and never enqueue a node twice
    #[default]
    NodeGlobal,
    /// No visited-set; a node is revisited every time a relationship reaches it
    None,
}

/// Serializable traversal configuration
///
/// ```
/// use trellis_core::types::config::{Depth, TraversalConfig};
///
/// let config = TraversalConfig::from_json(
///     r#"{"relationships": [{"type": "friend", "direction": "outgoing"}], "depth": "all"}"#,
/// )
/// .unwrap();
/// assert_eq!(config.depth, Depth::All);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraversalConfig {
    /// Relationship type/direction pairs to expand along
    pub relationships: Vec<TypeDirection>,
    /// Depth bound
    pub depth: Depth,
    /// Frontier order
    pub order: Order,
    /// Yield raw positions instead of resolved node handles
    pub raw: bool,
    /// Cycle handling
    pub uniqueness: Uniqueness,
}

impl TraversalConfig {
    /// Parse a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidParameter {
            name: "config",
            message: e.to_string(),
        })
    }

    /// Serialize to a JSON document
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|e| ConfigError::InvalidParameter {
            name: "config",
            message: e.to_string(),
        })
    }

    /// Validate the configuration
    ///
    /// Returns the same error `begin_iteration` would.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relationships.is_empty() {
            return Err(ConfigError::MissingRelationshipTypes);
        }
        Ok(())
    }

    /// Build a descriptor carrying this configuration
    ///
    /// No return filter is installed; the descriptor returns every position
    /// except the start.
    pub fn into_descriptor<H>(self) -> TraversalDescriptor<H> {
        let mut descriptor = TraversalDescriptor::new()
            .depth(self.depth)
            .order(self.order)
            .raw(self.raw)
            .uniqueness(self.uniqueness);
        for pair in self.relationships {
            descriptor = descriptor.relationship(pair.rel_type, pair.direction);
        }
        descriptor
    }
}
