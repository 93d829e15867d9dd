//! Lazy traversal iterator
//!
//! One pull takes positions off the frontier until the return policy accepts
//! one. Breadth-first uses a FIFO queue, depth-first a LIFO stack; otherwise
//! the expansion logic is shared and knows nothing about the output mode.
//! Resolution into domain handles happens once, on the value being emitted.

use crate::error::{TraversalError, TraversalResult};
use crate::graph::filter::TypeDirectionFilter;
use crate::graph::policy::{ReturnPolicy, StopPolicy};
use crate::graph::position::{Emitted, NodeRef, PositionView, TraversalPosition};
use crate::store::GraphStore;
use crate::types::config::{Order, Uniqueness};
use crate::types::node::{NodeId, Relationship};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;

/// Lifecycle of a traversal iterator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterState {
    /// Nothing pulled yet; the frontier is unseeded
    Fresh,
    /// Positions may still be available
    Active,
    /// Frontier empty or a store error occurred. Terminal.
    Exhausted,
}

/// Frontier entry: a node waiting to be visited
#[derive(Debug)]
struct Pending {
    node: NodeId,
    via: Option<Relationship>,
    depth: u32,
}

#[derive(Debug)]
enum Frontier {
    Queue(VecDeque<Pending>),
    Stack(Vec<Pending>),
}

impl Frontier {
    fn new(order: Order) -> Self {
        match order {
            Order::BreadthFirst => Frontier::Queue(VecDeque::new()),
            Order::DepthFirst => Frontier::Stack(Vec::new()),
        }
    }

    fn push(&mut self, pending: Pending) {
        match self {
            Frontier::Queue(queue) => queue.push_back(pending),
            Frontier::Stack(stack) => stack.push(pending),
        }
    }

    fn pop(&mut self) -> Option<Pending> {
        match self {
            Frontier::Queue(queue) => queue.pop_front(),
            Frontier::Stack(stack) => stack.pop(),
        }
    }

    /// Add the children of one position, in adjacency order
    fn extend(&mut self, children: Vec<Pending>) {
        match self {
            Frontier::Queue(queue) => queue.extend(children),
            // Reverse so the first child ends up on top
            Frontier::Stack(stack) => stack.extend(children.into_iter().rev()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Frontier::Queue(queue) => queue.len(),
            Frontier::Stack(stack) => stack.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            Frontier::Queue(queue) => queue.clear(),
            Frontier::Stack(stack) => stack.clear(),
        }
    }
}

/// Pull-based traversal over a `GraphStore`
///
/// Yields [`Emitted::Position`] in raw mode and [`Emitted::Node`] otherwise.
/// Not safe for concurrent pulls; independent iterators can run on separate
/// threads if the store allows it.
///
/// After a store error the iterator is exhausted and yields nothing more.
pub struct TraversalIterator<S: GraphStore> {
    store: S,
    start: NodeId,
    filter: TypeDirectionFilter,
    stop_policy: StopPolicy,
    return_policy: ReturnPolicy<S::Handle>,
    raw: bool,
    uniqueness: Uniqueness,
    frontier: Frontier,
    visited: FxHashSet<NodeId>,
    state: IterState,
    /// Next returnable position, found ahead of time by `has_next`
    lookahead: Option<(TraversalPosition, NodeRef<S::Handle>)>,
    current: Option<TraversalPosition>,
    visited_count: u64,
    returned_count: u64,
}

impl<S: GraphStore> TraversalIterator<S> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        store: S,
        start: NodeId,
        filter: TypeDirectionFilter,
        stop_policy: StopPolicy,
        return_policy: ReturnPolicy<S::Handle>,
        order: Order,
        raw: bool,
        uniqueness: Uniqueness,
    ) -> Self {
        Self {
            store,
            start,
            filter,
            stop_policy,
            return_policy,
            raw,
            uniqueness,
            frontier: Frontier::new(order),
            visited: FxHashSet::default(),
            state: IterState::Fresh,
            lookahead: None,
            current: None,
            visited_count: 0,
            returned_count: 0,
        }
    }

    pub fn state(&self) -> IterState {
        self.state
    }

    /// Start node of this traversal
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Position of the value most recently handed out
    pub fn current_position(&self) -> Option<&TraversalPosition> {
        self.current.as_ref()
    }

    /// Positions accepted by the return policy so far (including a buffered one)
    pub fn returned_count(&self) -> u64 {
        self.returned_count
    }

    /// Positions taken off the frontier so far
    pub fn visited_count(&self) -> u64 {
        self.visited_count
    }

    /// Check whether another value can be produced
    ///
    /// May expand the frontier up to the next returnable position and buffer
    /// it; the following `next()` hands out exactly that position.
    pub fn has_next(&mut self) -> TraversalResult<bool> {
        if self.lookahead.is_some() {
            return Ok(true);
        }
        match self.advance() {
            Ok(Some(found)) => {
                self.lookahead = Some(found);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Check if the iterator will produce nothing more
    pub fn is_empty(&mut self) -> TraversalResult<bool> {
        Ok(!self.has_next()?)
    }

    /// Next returnable position with its node in the return policy's form
    fn pull(&mut self) -> Option<TraversalResult<(TraversalPosition, NodeRef<S::Handle>)>> {
        if let Some(found) = self.lookahead.take() {
            return Some(Ok(found));
        }
        match self.advance() {
            Ok(found) => found.map(Ok),
            Err(e) => Some(Err(self.fail(e))),
        }
    }

    /// Run the frontier until a position is returned or nothing is left
    fn advance(&mut self) -> TraversalResult<Option<(TraversalPosition, NodeRef<S::Handle>)>> {
        match self.state {
            IterState::Exhausted => return Ok(None),
            IterState::Fresh => self.seed()?,
            IterState::Active => {}
        }

        while let Some(pending) = self.frontier.pop() {
            let position =
                TraversalPosition::new(pending.node, pending.via, pending.depth, self.returned_count);
            self.visited_count += 1;

            if !self.stop_policy.should_stop_expanding(&position) {
                self.expand(&position)?;
            }

            let node = if self.return_policy.resolves_nodes() {
                NodeRef::Resolved(self.store.resolve(position.node())?)
            } else {
                NodeRef::Raw(position.node())
            };
            let view = PositionView::new(position, node);

            if self.return_policy.should_return(&view) {
                self.returned_count += 1;
                return Ok(Some(view.into_parts()));
            }
        }

        self.state = IterState::Exhausted;
        tracing::debug!(
            start = self.start,
            visited = self.visited_count,
            returned = self.returned_count,
            "Traversal exhausted"
        );
        Ok(None)
    }

    fn seed(&mut self) -> TraversalResult<()> {
        let start = self.store.node_by_id(self.start)?;
        if self.uniqueness == Uniqueness::NodeGlobal {
            self.visited.insert(start);
        }
        self.frontier.push(Pending {
            node: start,
            via: None,
            depth: 0,
        });
        self.state = IterState::Active;
        Ok(())
    }

    /// Push the filtered neighbors of `position` onto the frontier
    fn expand(&mut self, position: &TraversalPosition) -> TraversalResult<()> {
        let node = position.node();
        let mut children = Vec::new();

        for pair in &self.filter {
            for rel in self.store.relationships(node, pair.direction, &pair.rel_type)? {
                let rel = rel?;
                let neighbor = self.store.other_endpoint(&rel, node)?;
                if self.uniqueness == Uniqueness::NodeGlobal && !self.visited.insert(neighbor) {
                    continue;
                }
                children.push(Pending {
                    node: neighbor,
                    via: Some(rel),
                    depth: position.depth() + 1,
                });
            }
        }

        tracing::trace!(
            node,
            depth = position.depth(),
            children = children.len(),
            frontier = self.frontier.len(),
            "Expanded position"
        );
        self.frontier.extend(children);
        Ok(())
    }

    fn fail(&mut self, error: TraversalError) -> TraversalError {
        self.state = IterState::Exhausted;
        self.frontier.clear();
        self.lookahead = None;
        tracing::debug!(start = self.start, error = %error, "Traversal aborted");
        error
    }

    /// Hand out a value in the iterator's output mode
    fn emit(&mut self, position: TraversalPosition, node: NodeRef<S::Handle>) -> TraversalResult<Emitted<S::Handle>> {
        self.current = Some(position.clone());
        if self.raw {
            return Ok(Emitted::Position(position));
        }
        let handle = match node {
            NodeRef::Resolved(handle) => handle,
            NodeRef::Raw(id) => self.store.resolve(id)?,
        };
        Ok(Emitted::Node(handle))
    }
}

impl<S: GraphStore> Iterator for TraversalIterator<S> {
    type Item = TraversalResult<Emitted<S::Handle>>;

    fn next(&mut self) -> Option<Self::Item> {
        let (position, node) = match self.pull()? {
            Ok(found) => found,
            Err(e) => return Some(Err(e)),
        };
        Some(self.emit(position, node).map_err(|e| self.fail(e)))
    }
}

impl<S: GraphStore> FusedIterator for TraversalIterator<S> {}

impl<S: GraphStore> fmt::Debug for TraversalIterator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalIterator")
            .field("start", &self.start)
            .field("state", &self.state)
            .field("filter", &self.filter)
            .field("stop_policy", &self.stop_policy)
            .field("return_policy", &self.return_policy)
            .field("raw", &self.raw)
            .field("uniqueness", &self.uniqueness)
            .field("frontier", &self.frontier.len())
            .field("buffered", &self.lookahead.is_some())
            .field("visited_count", &self.visited_count)
            .field("returned_count", &self.returned_count)
            .finish_non_exhaustive()
    }
}

/// Iterator pairing each returned node with its position
///
/// The first element is always resolved. The view's node is raw or resolved
/// according to the descriptor's output mode.
pub struct PositionIterator<S: GraphStore> {
    inner: TraversalIterator<S>,
}

impl<S: GraphStore> PositionIterator<S>
where
    S::Handle: Clone,
{
    pub(crate) fn new(inner: TraversalIterator<S>) -> Self {
        Self { inner }
    }

    pub fn state(&self) -> IterState {
        self.inner.state()
    }

    fn wrap(
        &mut self,
        position: TraversalPosition,
        node: NodeRef<S::Handle>,
    ) -> TraversalResult<(S::Handle, PositionView<S::Handle>)> {
        self.inner.current = Some(position.clone());
        let handle = match node {
            NodeRef::Resolved(handle) => handle,
            NodeRef::Raw(id) => self.inner.store.resolve(id)?,
        };
        let view_node = if self.inner.raw {
            NodeRef::Raw(position.node())
        } else {
            NodeRef::Resolved(handle.clone())
        };
        Ok((handle, PositionView::new(position, view_node)))
    }
}

impl<S: GraphStore> Iterator for PositionIterator<S>
where
    S::Handle: Clone,
{
    type Item = TraversalResult<(S::Handle, PositionView<S::Handle>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (position, node) = match self.inner.pull()? {
            Ok(found) => found,
            Err(e) => return Some(Err(e)),
        };
        Some(self.wrap(position, node).map_err(|e| self.inner.fail(e)))
    }
}

impl<S: GraphStore> FusedIterator for PositionIterator<S> where S::Handle: Clone {}
