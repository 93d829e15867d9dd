//! Traversal positions and emitted values

use crate::types::node::{NodeId, Relationship};

/// One visited step of a traversal
///
/// Created when a node is taken off the frontier and never mutated
/// afterwards. Always carries the unresolved node identity, regardless of the
/// traversal's output mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalPosition {
    node: NodeId,
    last_relationship: Option<Relationship>,
    depth: u32,
    returned_count: u64,
}

impl TraversalPosition {
    pub(crate) fn new(
        node: NodeId,
        last_relationship: Option<Relationship>,
        depth: u32,
        returned_count: u64,
    ) -> Self {
        Self {
            node,
            last_relationship,
            depth,
            returned_count,
        }
    }

    /// Node this position stands on
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Relationship traversed to reach this node (`None` at the start)
    pub fn last_relationship(&self) -> Option<&Relationship> {
        self.last_relationship.as_ref()
    }

    /// Node the last relationship was traversed from
    pub fn previous_node(&self) -> Option<NodeId> {
        self.last_relationship
            .as_ref()
            .and_then(|rel| rel.other_node(self.node))
    }

    /// Hops from the start node
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of positions returned before this one
    pub fn returned_count(&self) -> u64 {
        self.returned_count
    }

    /// Check if this is the start position
    pub fn is_start(&self) -> bool {
        self.last_relationship.is_none()
    }
}

/// A node either as a raw identity or as a resolved domain handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef<H> {
    Raw(NodeId),
    Resolved(H),
}

impl<H> NodeRef<H> {
    /// Raw identity, if unresolved
    pub fn as_raw(&self) -> Option<NodeId> {
        match self {
            NodeRef::Raw(id) => Some(*id),
            NodeRef::Resolved(_) => None,
        }
    }

    /// Resolved handle, if any
    pub fn as_resolved(&self) -> Option<&H> {
        match self {
            NodeRef::Raw(_) => None,
            NodeRef::Resolved(handle) => Some(handle),
        }
    }

    /// Take the resolved handle, if any
    pub fn into_resolved(self) -> Option<H> {
        match self {
            NodeRef::Raw(_) => None,
            NodeRef::Resolved(handle) => Some(handle),
        }
    }
}

/// A position as seen by return filters and `each_with_position` callers
///
/// The node accessor follows the output mode the view was built for; the
/// underlying position always keeps the raw identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionView<H> {
    position: TraversalPosition,
    node: NodeRef<H>,
}

impl<H> PositionView<H> {
    pub(crate) fn new(position: TraversalPosition, node: NodeRef<H>) -> Self {
        Self { position, node }
    }

    /// Current node, raw or resolved
    pub fn node(&self) -> &NodeRef<H> {
        &self.node
    }

    /// Raw identity of the current node
    pub fn node_id(&self) -> NodeId {
        self.position.node()
    }

    /// Underlying raw position
    pub fn position(&self) -> &TraversalPosition {
        &self.position
    }

    pub fn depth(&self) -> u32 {
        self.position.depth()
    }

    pub fn returned_count(&self) -> u64 {
        self.position.returned_count()
    }

    pub fn last_relationship(&self) -> Option<&Relationship> {
        self.position.last_relationship()
    }

    pub fn previous_node(&self) -> Option<NodeId> {
        self.position.previous_node()
    }

    pub fn is_start(&self) -> bool {
        self.position.is_start()
    }

    /// Split into the raw position and the node reference
    pub fn into_parts(self) -> (TraversalPosition, NodeRef<H>) {
        (self.position, self.node)
    }
}

/// Value handed to the consumer for each returned position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted<H> {
    /// Raw mode: the position itself
    Position(TraversalPosition),
    /// Resolved mode: the domain node handle
    Node(H),
}

impl<H> Emitted<H> {
    /// Check if this value was produced in raw mode
    pub fn is_raw(&self) -> bool {
        matches!(self, Emitted::Position(_))
    }

    pub fn position(&self) -> Option<&TraversalPosition> {
        match self {
            Emitted::Position(position) => Some(position),
            Emitted::Node(_) => None,
        }
    }

    pub fn node(&self) -> Option<&H> {
        match self {
            Emitted::Position(_) => None,
            Emitted::Node(handle) => Some(handle),
        }
    }

    pub fn into_position(self) -> Option<TraversalPosition> {
        match self {
            Emitted::Position(position) => Some(position),
            Emitted::Node(_) => None,
        }
    }

    pub fn into_node(self) -> Option<H> {
        match self {
            Emitted::Position(_) => None,
            Emitted::Node(handle) => Some(handle),
        }
    }
}
