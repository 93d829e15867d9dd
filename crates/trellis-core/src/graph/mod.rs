//! Graph traversal module
//!
//! Builder, policies and the lazy BFS/DFS iterator. Everything here talks to
//! the graph only through the `GraphStore` trait.

pub mod descriptor;
pub mod filter;
pub mod policy;
pub mod position;
pub mod traversal;

pub use descriptor::TraversalDescriptor;
pub use filter::{TypeDirection, TypeDirectionFilter};
pub use policy::{ReturnPolicy, ReturnPredicate, StopPolicy};
pub use position::{Emitted, NodeRef, PositionView, TraversalPosition};
pub use traversal::{IterState, PositionIterator, TraversalIterator};
