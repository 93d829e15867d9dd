//! Trellis Core - lazy property-graph traversal
//!
//! This crate implements the traversal engine:
//! - Node/relationship identities and the `GraphStore` collaborator trait
//! - Type/direction filters, stop and return policies
//! - A fluent `TraversalDescriptor` that validates and creates iterators
//! - Pull-based breadth-first and depth-first iteration
//!
//! # Separation from storage
//!
//! No graph data lives here. Concrete stores (see `trellis-storage`) are
//! injected into each traversal and only read through the trait.
//!
//! ```
//! use trellis_core::graph::{Emitted, TraversalDescriptor};
//! use trellis_core::store::{GraphStore, RelationshipIter, StoreResult};
//! use trellis_core::types::node::{Direction, NodeId, Relationship, RelationshipType};
//!
//! /// 0 -next-> 1 -next-> 2
//! struct Chain;
//!
//! impl GraphStore for Chain {
//!     type Handle = NodeId;
//!
//!     fn node_by_id(&self, id: NodeId) -> StoreResult<NodeId> {
//!         Ok(id)
//!     }
//!
//!     fn relationships<'a>(
//!         &'a self,
//!         node: NodeId,
//!         direction: Direction,
//!         _rel_type: &RelationshipType,
//!     ) -> StoreResult<RelationshipIter<'a>> {
//!         let rels: Vec<StoreResult<Relationship>> = match direction {
//!             Direction::Outgoing if node < 2 => vec![Ok(Relationship::new(node, "next", node, node + 1))],
//!             _ => vec![],
//!         };
//!         Ok(Box::new(rels.into_iter()))
//!     }
//!
//!     fn resolve(&self, node: NodeId) -> StoreResult<NodeId> {
//!         Ok(node)
//!     }
//! }
//!
//! let nodes: Vec<NodeId> = TraversalDescriptor::new()
//!     .outgoing(["next"])
//!     .depth(trellis_core::Depth::All)
//!     .begin_iteration(Chain, 0)?
//!     .filter_map(|e| e.map(Emitted::into_node).transpose())
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(nodes, vec![1, 2]);
//! # Ok::<(), trellis_core::TraversalError>(())
//! ```

pub mod error;
pub mod graph;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, TraversalError, TraversalResult};
pub use graph::{
    Emitted, IterState, NodeRef, PositionIterator, PositionView, ReturnPolicy, StopPolicy,
    TraversalDescriptor, TraversalIterator, TraversalPosition, TypeDirection, TypeDirectionFilter,
};
pub use store::{GraphStore, GraphStoreError, RelationshipIter, StoreResult};
pub use types::config::{Depth, Order, TraversalConfig, Uniqueness};
pub use types::node::{Direction, NodeId, Relationship, RelationshipId, RelationshipType};
