//! Traversal descriptor (builder)
//!
//! Accumulates relationship filters, depth, order, output mode and the return
//! filter, then hands out independent iterators on demand.
//!
//! ```
//! use trellis_core::graph::TraversalDescriptor;
//! use trellis_core::types::config::Depth;
//!
//! let descriptor: TraversalDescriptor<()> = TraversalDescriptor::new()
//!     .outgoing(["friend"])
//!     .depth(Depth::All)
//!     .filter(|pos| pos.depth() == 2);
//! assert_eq!(descriptor.type_filter().len(), 1);
//! ```
//!
//! Configuration calls never fail; the single validation point is
//! [`TraversalDescriptor::begin_iteration`].

use crate::error::{ConfigError, TraversalResult};
use crate::graph::filter::TypeDirectionFilter;
use crate::graph::policy::{ReturnPolicy, StopPolicy};
use crate::graph::position::{Emitted, PositionView};
use crate::graph::traversal::{PositionIterator, TraversalIterator};
use crate::store::GraphStore;
use crate::types::config::{Depth, Order, Uniqueness};
use crate::types::node::{Direction, NodeId, RelationshipType};
use std::fmt;
use std::sync::Arc;

/// Traversal configuration with fluent setters
///
/// `H` is the domain handle type of the store the descriptor will run against.
/// The descriptor is read-only while iterators exist; each iterator takes its
/// own snapshot and shares no mutable state with siblings.
pub struct TraversalDescriptor<H> {
    filter: TypeDirectionFilter,
    depth: Depth,
    order: Order,
    return_policy: ReturnPolicy<H>,
    raw: bool,
    uniqueness: Uniqueness,
}

impl<H> TraversalDescriptor<H> {
    /// Create a descriptor with the defaults: depth 1, breadth-first,
    /// all-but-start returns, resolved output, no relationship types
    pub fn new() -> Self {
        Self {
            filter: TypeDirectionFilter::new(),
            depth: Depth::default(),
            order: Order::default(),
            return_policy: ReturnPolicy::AllButStart,
            raw: false,
            uniqueness: Uniqueness::default(),
        }
    }

    /// Set the depth bound (`Depth::All` for unbounded)
    pub fn depth(mut self, depth: impl Into<Depth>) -> Self {
        self.depth = depth.into();
        self
    }

    /// Follow `types` along outgoing relationships
    pub fn outgoing<I, T>(self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RelationshipType>,
    {
        self.with_direction(types, Direction::Outgoing)
    }

    /// Follow `types` along incoming relationships
    pub fn incoming<I, T>(self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RelationshipType>,
    {
        self.with_direction(types, Direction::Incoming)
    }

    /// Follow `types` in both directions
    pub fn both<I, T>(self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RelationshipType>,
    {
        self.with_direction(types, Direction::Both)
    }

    /// Append a single type/direction pair
    pub fn relationship(mut self, rel_type: impl Into<RelationshipType>, direction: Direction) -> Self {
        self.filter.add(rel_type, direction);
        self
    }

    fn with_direction<I, T>(mut self, types: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RelationshipType>,
    {
        for rel_type in types {
            self.filter.add(rel_type, direction);
        }
        self
    }

    /// Install a return filter
    ///
    /// The filter is tagged with the current output mode: after `raw(true)` it
    /// sees raw node identities, otherwise every visited node is resolved
    /// through the store before the filter runs.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PositionView<H>) -> bool + Send + Sync + 'static,
    {
        self.return_policy = ReturnPolicy::Predicate {
            predicate: Arc::new(predicate),
            raw: self.raw,
        };
        self
    }

    /// Yield raw positions (`true`) or resolved node handles (`false`)
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Set the frontier order
    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Visit positions level by level (FIFO frontier)
    pub fn breadth_first(self) -> Self {
        self.order(Order::BreadthFirst)
    }

    /// Follow each branch to its end first (LIFO frontier)
    pub fn depth_first(self) -> Self {
        self.order(Order::DepthFirst)
    }

    /// Choose how revisits are handled on cyclic graphs
    pub fn uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    /// Configured type/direction pairs, in insertion order
    pub fn type_filter(&self) -> &TypeDirectionFilter {
        &self.filter
    }

    /// Configured depth bound
    pub fn depth_setting(&self) -> Depth {
        self.depth
    }

    /// Stop policy derived from the depth bound
    pub fn stop_policy(&self) -> StopPolicy {
        StopPolicy::from(self.depth)
    }

    /// Installed return policy
    pub fn return_policy(&self) -> &ReturnPolicy<H> {
        &self.return_policy
    }

    /// Configured frontier order
    pub fn order_setting(&self) -> Order {
        self.order
    }

    /// Check if iteration yields raw positions
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Configured revisit handling
    pub fn uniqueness_setting(&self) -> Uniqueness {
        self.uniqueness
    }

    /// Check the configuration without starting a traversal
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filter.is_empty() {
            return Err(ConfigError::MissingRelationshipTypes);
        }
        Ok(())
    }

    /// Validate and create an iterator rooted at `start`
    ///
    /// Fails with `IllegalConfiguration` if no relationship type/direction
    /// was configured. Store errors (including an unknown start node) surface
    /// on the first pull, not here.
    pub fn begin_iteration<S>(&self, store: S, start: NodeId) -> TraversalResult<TraversalIterator<S>>
    where
        S: GraphStore<Handle = H>,
    {
        self.validate()?;

        tracing::debug!(
            start,
            order = ?self.order,
            depth = %self.depth,
            types = self.filter.len(),
            raw = self.raw,
            uniqueness = ?self.uniqueness,
            "Beginning traversal"
        );
        if self.depth.is_unbounded() && self.uniqueness == Uniqueness::None {
            tracing::warn!(
                start,
                "Unbounded traversal without uniqueness may not terminate on cyclic graphs"
            );
        }

        Ok(TraversalIterator::new(
            store,
            start,
            self.filter.clone(),
            self.stop_policy(),
            self.return_policy.clone(),
            self.order,
            self.raw,
            self.uniqueness,
        ))
    }

    /// Iterate resolved nodes paired with their positions
    ///
    /// The node is always resolved; the position view's node follows the
    /// descriptor's output mode.
    pub fn positions<S>(&self, store: S, start: NodeId) -> TraversalResult<PositionIterator<S>>
    where
        S: GraphStore<Handle = H>,
        H: Clone,
    {
        Ok(PositionIterator::new(self.begin_iteration(store, start)?))
    }

    /// Consume the whole traversal, handing each value to `f`
    pub fn each<S, F>(&self, store: S, start: NodeId, mut f: F) -> TraversalResult<()>
    where
        S: GraphStore<Handle = H>,
        F: FnMut(Emitted<H>),
    {
        for emitted in self.begin_iteration(store, start)? {
            f(emitted?);
        }
        Ok(())
    }

    /// Like [`each`](Self::each) but passes the resolved node and its position
    pub fn each_with_position<S, F>(&self, store: S, start: NodeId, mut f: F) -> TraversalResult<()>
    where
        S: GraphStore<Handle = H>,
        H: Clone,
        F: FnMut(H, PositionView<H>),
    {
        for item in self.positions(store, start)? {
            let (node, view) = item?;
            f(node, view);
        }
        Ok(())
    }

    /// Check if the traversal returns nothing
    pub fn is_empty<S>(&self, store: S, start: NodeId) -> TraversalResult<bool>
    where
        S: GraphStore<Handle = H>,
    {
        self.begin_iteration(store, start)?.is_empty()
    }

    /// First returned value, without expanding past it
    pub fn first<S>(&self, store: S, start: NodeId) -> TraversalResult<Option<Emitted<H>>>
    where
        S: GraphStore<Handle = H>,
    {
        self.find(store, start, |_| true)
    }

    /// First returned value accepted by `predicate`
    ///
    /// Stops pulling as soon as a match is found.
    pub fn find<S, P>(&self, store: S, start: NodeId, mut predicate: P) -> TraversalResult<Option<Emitted<H>>>
    where
        S: GraphStore<Handle = H>,
        P: FnMut(&Emitted<H>) -> bool,
    {
        for emitted in self.begin_iteration(store, start)? {
            let emitted = emitted?;
            if predicate(&emitted) {
                return Ok(Some(emitted));
            }
        }
        Ok(None)
    }
}

impl<H> Default for TraversalDescriptor<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for TraversalDescriptor<H> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            depth: self.depth,
            order: self.order,
            return_policy: self.return_policy.clone(),
            raw: self.raw,
            uniqueness: self.uniqueness,
        }
    }
}

impl<H> fmt::Debug for TraversalDescriptor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalDescriptor")
            .field("filter", &self.filter)
            .field("depth", &self.depth)
            .field("order", &self.order)
            .field("return_policy", &self.return_policy)
            .field("raw", &self.raw)
            .field("uniqueness", &self.uniqueness)
            .finish()
    }
}

impl<H> fmt::Display for TraversalDescriptor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TraversalDescriptor [relationships={}, depth={}, order={:?}]",
            self.filter, self.depth, self.order
        )
    }
}
