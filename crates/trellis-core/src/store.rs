//! Graph store abstraction
//!
//! The traversal engine never touches a concrete graph. It asks an injected
//! `GraphStore` for node lookups, per-node adjacency and domain-level node
//! handles, and propagates whatever that collaborator fails with.
//!
//! # Implementations
//!
//! - `MemGraph` (in `trellis-storage`): in-memory property graph
//! - `FailingGraph` (in `trellis-test-harness`): failure injection wrapper

use crate::types::node::{Direction, NodeId, Relationship, RelationshipId, RelationshipType};
use std::sync::Arc;
use thiserror::Error;

/// Graph store errors
///
/// Raised by the collaborator and surfaced unchanged at the pull that triggered them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphStoreError {
    #[error("Node not found: {id}")]
    NodeNotFound { id: NodeId },

    #[error("Relationship not found: {id}")]
    RelationshipNotFound { id: RelationshipId },

    /// The relationship does not touch the node it was reached from
    #[error("Dangling relationship {relationship}: node {node} is not an endpoint")]
    DanglingRelationship {
        relationship: RelationshipId,
        node: NodeId,
    },

    /// Backend-specific failure (I/O, lock poisoning, injected faults)
    #[error("Graph store backend error: {message}")]
    Backend { message: String },
}

/// Convenience type alias for store results
pub type StoreResult<T> = Result<T, GraphStoreError>;

/// Lazy adjacency sequence returned by [`GraphStore::relationships`]
pub type RelationshipIter<'a> = Box<dyn Iterator<Item = StoreResult<Relationship>> + 'a>;

/// Read-only graph collaborator consumed by the traversal engine
///
/// Implementations must tolerate concurrent reads if iterators are run on
/// several threads; the engine itself never mutates the store.
pub trait GraphStore {
    /// Domain-level node handle produced for non-raw output
    type Handle;

    /// Look up a node, failing with `NodeNotFound` if it is absent
    fn node_by_id(&self, id: NodeId) -> StoreResult<NodeId>;

    /// Relationships of `rel_type` attached to `node` in `direction`
    ///
    /// The sequence is finite and each call starts a fresh enumeration.
    /// With `Direction::Both` a loop must be reported once.
    fn relationships<'a>(
        &'a self,
        node: NodeId,
        direction: Direction,
        rel_type: &RelationshipType,
    ) -> StoreResult<RelationshipIter<'a>>;

    /// The endpoint of `relationship` opposite to `from`
    fn other_endpoint(&self, relationship: &Relationship, from: NodeId) -> StoreResult<NodeId> {
        relationship
            .other_node(from)
            .ok_or(GraphStoreError::DanglingRelationship {
                relationship: relationship.id,
                node: from,
            })
    }

    /// Resolve a node identity into a domain-level handle
    fn resolve(&self, node: NodeId) -> StoreResult<Self::Handle>;
}

impl<S: GraphStore + ?Sized> GraphStore for &S {
    type Handle = S::Handle;

    fn node_by_id(&self, id: NodeId) -> StoreResult<NodeId> {
        (**self).node_by_id(id)
    }

    fn relationships<'a>(
        &'a self,
        node: NodeId,
        direction: Direction,
        rel_type: &RelationshipType,
    ) -> StoreResult<RelationshipIter<'a>> {
        (**self).relationships(node, direction, rel_type)
    }

    fn other_endpoint(&self, relationship: &Relationship, from: NodeId) -> StoreResult<NodeId> {
        (**self).other_endpoint(relationship, from)
    }

    fn resolve(&self, node: NodeId) -> StoreResult<Self::Handle> {
        (**self).resolve(node)
    }
}

impl<S: GraphStore + ?Sized> GraphStore for Arc<S> {
    type Handle = S::Handle;

    fn node_by_id(&self, id: NodeId) -> StoreResult<NodeId> {
        (**self).node_by_id(id)
    }

    fn relationships<'a>(
        &'a self,
        node: NodeId,
        direction: Direction,
        rel_type: &RelationshipType,
    ) -> StoreResult<RelationshipIter<'a>> {
        (**self).relationships(node, direction, rel_type)
    }

    fn other_endpoint(&self, relationship: &Relationship, from: NodeId) -> StoreResult<NodeId> {
        (**self).other_endpoint(relationship, from)
    }

    fn resolve(&self, node: NodeId) -> StoreResult<Self::Handle> {
        (**self).resolve(node)
    }
}
