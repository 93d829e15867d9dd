//! In-memory graph store
//!
//! `MemGraph` keeps nodes, relationships and per-node adjacency lists in hash
//! maps. Adjacency preserves insertion order, so traversals over a `MemGraph`
//! are deterministic.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use trellis_core::{
    Direction, GraphStore, GraphStoreError, NodeId, Relationship, RelationshipId,
    RelationshipIter, RelationshipType, StoreResult,
};

/// Domain handle for a `MemGraph` node
///
/// Properties are stored as raw bytes, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemNode {
    /// Unique identifier
    pub id: NodeId,
    /// Node properties
    pub properties: HashMap<String, Vec<u8>>,
}

impl MemNode {
    /// Create a node without properties
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            properties: HashMap::new(),
        }
    }

    /// Add a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get a property
    pub fn property(&self, key: &str) -> Option<&[u8]> {
        self.properties.get(key).map(Vec::as_slice)
    }
}

/// Relationship ids attached to one node, in insertion order
#[derive(Debug, Default, Clone)]
struct Adjacency {
    outgoing: SmallVec<[RelationshipId; 4]>,
    incoming: SmallVec<[RelationshipId; 4]>,
}

/// In-memory property graph
///
/// Mutation needs `&mut self`; reads only need `&self`, so a finished graph can
/// be shared across threads behind an `Arc` and traversed concurrently.
///
/// # Usage
///
/// ```
/// use trellis_core::TraversalDescriptor;
/// use trellis_storage::MemGraph;
///
/// let mut graph = MemGraph::new();
/// let alice = graph.create_node();
/// let bob = graph.create_node();
/// graph.create_relationship(alice, "friend", bob).unwrap();
///
/// let friends: Vec<_> = TraversalDescriptor::new()
///     .outgoing(["friend"])
///     .begin_iteration(&graph, alice)
///     .unwrap()
///     .map(|e| e.unwrap().into_node().unwrap().id)
///     .collect();
/// assert_eq!(friends, vec![bob]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemGraph {
    nodes: FxHashMap<NodeId, MemNode>,
    adjacency: FxHashMap<NodeId, Adjacency>,
    relationships: FxHashMap<RelationshipId, Relationship>,
    next_node_id: NodeId,
    next_relationship_id: RelationshipId,
}

impl MemGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node with the next free id
    pub fn create_node(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.add_node(MemNode::new(id))
    }

    /// Insert (or replace) a node under its own id
    ///
    /// Existing relationships of a replaced node are kept.
    pub fn add_node(&mut self, node: MemNode) -> NodeId {
        let id = node.id;
        self.next_node_id = self.next_node_id.max(id.saturating_add(1));
        self.adjacency.entry(id).or_default();
        self.nodes.insert(id, node);
        id
    }

    /// Create `start -[rel_type]-> end`
    ///
    /// Both endpoints must already exist.
    pub fn create_relationship(
        &mut self,
        start: NodeId,
        rel_type: impl Into<RelationshipType>,
        end: NodeId,
    ) -> StoreResult<RelationshipId> {
        for id in [start, end] {
            if !self.nodes.contains_key(&id) {
                return Err(GraphStoreError::NodeNotFound { id });
            }
        }

        let id = self.next_relationship_id;
        self.next_relationship_id += 1;
        self.relationships
            .insert(id, Relationship::new(id, rel_type, start, end));
        self.adjacency.entry(start).or_default().outgoing.push(id);
        self.adjacency.entry(end).or_default().incoming.push(id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&MemNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut MemNode> {
        self.nodes.get_mut(&id)
    }

    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.get(&id)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of relationships
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Number of relationships attached to `node` in `direction`, any type
    ///
    /// A loop counts once for `Both`.
    pub fn degree(&self, node: NodeId, direction: Direction) -> usize {
        let Some(adjacency) = self.adjacency.get(&node) else {
            return 0;
        };
        match direction {
            Direction::Outgoing => adjacency.outgoing.len(),
            Direction::Incoming => adjacency.incoming.len(),
            Direction::Both => {
                let loops = adjacency
                    .outgoing
                    .iter()
                    .filter(|id| self.relationships.get(*id).is_some_and(Relationship::is_loop))
                    .count();
                adjacency.outgoing.len() + adjacency.incoming.len() - loops
            }
        }
    }

    /// Clear all data
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl GraphStore for MemGraph {
    type Handle = MemNode;

    fn node_by_id(&self, id: NodeId) -> StoreResult<NodeId> {
        if self.nodes.contains_key(&id) {
            Ok(id)
        } else {
            Err(GraphStoreError::NodeNotFound { id })
        }
    }

    fn relationships<'a>(
        &'a self,
        node: NodeId,
        direction: Direction,
        rel_type: &RelationshipType,
    ) -> StoreResult<RelationshipIter<'a>> {
        let adjacency = self
            .adjacency
            .get(&node)
            .ok_or(GraphStoreError::NodeNotFound { id: node })?;

        let outgoing = direction
            .covers(Direction::Outgoing)
            .then(|| adjacency.outgoing.iter())
            .into_iter()
            .flatten()
            .map(|id| (*id, false));
        // With Both, loops were already produced by the outgoing list
        let skip_loops = direction == Direction::Both;
        let incoming = direction
            .covers(Direction::Incoming)
            .then(|| adjacency.incoming.iter())
            .into_iter()
            .flatten()
            .map(move |id| (*id, skip_loops));

        let rel_type = rel_type.clone();
        Ok(Box::new(outgoing.chain(incoming).filter_map(
            move |(id, skip_loop)| match self.relationships.get(&id) {
                None => Some(Err(GraphStoreError::RelationshipNotFound { id })),
                Some(rel) if rel.rel_type != rel_type => None,
                Some(rel) if skip_loop && rel.is_loop() => None,
                Some(rel) => Some(Ok(rel.clone())),
            },
        )))
    }

    fn resolve(&self, node: NodeId) -> StoreResult<MemNode> {
        self.nodes
            .get(&node)
            .cloned()
            .ok_or(GraphStoreError::NodeNotFound { id: node })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(graph: &MemGraph, node: NodeId, direction: Direction, rel_type: &str) -> Vec<RelationshipId> {
        graph
            .relationships(node, direction, &RelationshipType::from(rel_type))
            .unwrap()
            .map(|r| r.unwrap().id)
            .collect()
    }

    #[test]
    fn test_new_graph_is_empty() {
        let graph = MemGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.relationship_count(), 0);
    }

    #[test]
    fn test_create_nodes_and_relationships() {
        let mut graph = MemGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        assert_eq!((a, b), (0, 1));

        let rel = graph.create_relationship(a, "friend", b).unwrap();
        assert_eq!(graph.relationship_count(), 1);

        let stored = graph.relationship(rel).unwrap();
        assert_eq!(stored.start, a);
        assert_eq!(stored.end, b);
        assert_eq!(stored.rel_type.name(), "friend");
    }

    #[test]
    fn test_relationship_to_missing_node_fails() {
        let mut graph = MemGraph::new();
        let a = graph.create_node();

        let err = graph.create_relationship(a, "friend", 42).unwrap_err();
        assert_eq!(err, GraphStoreError::NodeNotFound { id: 42 });
        assert_eq!(graph.relationship_count(), 0);
    }

    #[test]
    fn test_add_node_with_explicit_id() {
        let mut graph = MemGraph::new();
        graph.add_node(MemNode::new(10).with_property("name", "ten"));
        assert_eq!(graph.create_node(), 11);
        assert_eq!(graph.node(10).unwrap().property("name"), Some(&b"ten"[..]));

        graph.node_mut(10).unwrap().properties.clear();
        assert!(graph.node(10).unwrap().properties.is_empty());
    }

    #[test]
    fn test_add_node_with_max_id() {
        let mut graph = MemGraph::new();
        assert_eq!(graph.add_node(MemNode::new(NodeId::MAX)), NodeId::MAX);
        assert!(graph.node(NodeId::MAX).is_some());
        assert_eq!(graph.node_by_id(NodeId::MAX), Ok(NodeId::MAX));

        let other = graph.add_node(MemNode::new(3));
        graph.create_relationship(other, "next", NodeId::MAX).unwrap();
        assert_eq!(graph.degree(NodeId::MAX, Direction::Incoming), 1);
    }

    #[test]
    fn test_adjacency_by_direction_and_type() {
        let mut graph = MemGraph::new();
        let hub = graph.create_node();
        let x = graph.create_node();
        let y = graph.create_node();

        let r0 = graph.create_relationship(hub, "friend", x).unwrap();
        let r1 = graph.create_relationship(y, "friend", hub).unwrap();
        let r2 = graph.create_relationship(hub, "enemy", y).unwrap();

        assert_eq!(ids(&graph, hub, Direction::Outgoing, "friend"), vec![r0]);
        assert_eq!(ids(&graph, hub, Direction::Incoming, "friend"), vec![r1]);
        assert_eq!(ids(&graph, hub, Direction::Both, "friend"), vec![r0, r1]);
        assert_eq!(ids(&graph, hub, Direction::Both, "enemy"), vec![r2]);
        assert!(ids(&graph, hub, Direction::Both, "stranger").is_empty());
    }

    #[test]
    fn test_loop_reported_once_for_both() {
        let mut graph = MemGraph::new();
        let n = graph.create_node();
        let rel = graph.create_relationship(n, "self", n).unwrap();

        assert_eq!(ids(&graph, n, Direction::Outgoing, "self"), vec![rel]);
        assert_eq!(ids(&graph, n, Direction::Incoming, "self"), vec![rel]);
        assert_eq!(ids(&graph, n, Direction::Both, "self"), vec![rel]);
        assert_eq!(graph.degree(n, Direction::Both), 1);
    }

    #[test]
    fn test_relationships_restart_per_call() {
        let mut graph = MemGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.create_relationship(a, "next", b).unwrap();

        let first = ids(&graph, a, Direction::Outgoing, "next");
        let second = ids(&graph, a, Direction::Outgoing, "next");
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_node_lookups() {
        let graph = MemGraph::new();
        assert_eq!(graph.node_by_id(3), Err(GraphStoreError::NodeNotFound { id: 3 }));
        assert_eq!(graph.resolve(3), Err(GraphStoreError::NodeNotFound { id: 3 }));
        assert!(graph
            .relationships(3, Direction::Both, &RelationshipType::from("x"))
            .is_err());
        assert_eq!(graph.degree(3, Direction::Outgoing), 0);
    }

    #[test]
    fn test_resolve_returns_node_with_properties() {
        let mut graph = MemGraph::new();
        let id = graph.add_node(MemNode::new(5).with_property("name", "morpheus"));
        let node = graph.resolve(id).unwrap();
        assert_eq!(node.id, 5);
        assert_eq!(node.property("name"), Some(&b"morpheus"[..]));
    }

    #[test]
    fn test_clear() {
        let mut graph = MemGraph::new();
        let a = graph.create_node();
        graph.create_relationship(a, "loop", a).unwrap();

        graph.clear();

        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.relationship_count(), 0);
        assert_eq!(graph.create_node(), 0);
    }

    #[test]
    fn test_mem_node_serde() {
        let node = MemNode::new(1).with_property("k", vec![1u8, 2, 3]);
        let json = serde_json::to_string(&node).unwrap();
        let back: MemNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
