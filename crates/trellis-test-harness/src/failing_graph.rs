//! Store with configurable failure injection
//!
//! Wraps another `GraphStore`, counts every collaborator call and can fail a
//! chosen call or corrupt a relationship on its way out.

use std::sync::atomic::{AtomicU64, Ordering};
use trellis_core::{
    Direction, GraphStore, GraphStoreError, NodeId, Relationship, RelationshipId,
    RelationshipIter, RelationshipType, StoreResult,
};

/// Endpoint id used for corrupted relationships
pub const DANGLING_NODE: NodeId = NodeId::MAX;

/// Store that delegates to `inner` but can inject failures
///
/// Set `*_fail_at` to a call count to trigger a backend error on that call
/// and every later one. Set to 0 to disable failure (default). Use
/// `clear_failures()` to reset.
pub struct FailingGraph<S> {
    inner: S,
    /// Fail `relationships` on this call number (0 = never)
    pub relationships_fail_at: AtomicU64,
    /// Fail `resolve` on this call number (0 = never)
    pub resolve_fail_at: AtomicU64,
    /// Relationship handed out with both endpoints replaced by `DANGLING_NODE`
    corrupt: Option<RelationshipId>,
    node_lookups: AtomicU64,
    relationships_calls: AtomicU64,
    resolve_calls: AtomicU64,
}

impl<S: GraphStore> FailingGraph<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            relationships_fail_at: AtomicU64::new(0),
            resolve_fail_at: AtomicU64::new(0),
            corrupt: None,
            node_lookups: AtomicU64::new(0),
            relationships_calls: AtomicU64::new(0),
            resolve_calls: AtomicU64::new(0),
        }
    }

    /// Fail the `n`th adjacency lookup (1-based)
    pub fn fail_relationships_at(self, n: u64) -> Self {
        self.relationships_fail_at.store(n, Ordering::SeqCst);
        self
    }

    /// Fail the `n`th node resolution (1-based)
    pub fn fail_resolve_at(self, n: u64) -> Self {
        self.resolve_fail_at.store(n, Ordering::SeqCst);
        self
    }

    /// Hand out relationship `id` with endpoints that match no node
    pub fn corrupt_relationship(mut self, id: RelationshipId) -> Self {
        self.corrupt = Some(id);
        self
    }

    pub fn clear_failures(&self) {
        self.relationships_fail_at.store(0, Ordering::SeqCst);
        self.resolve_fail_at.store(0, Ordering::SeqCst);
    }

    pub fn node_lookups(&self) -> u64 {
        self.node_lookups.load(Ordering::SeqCst)
    }

    pub fn relationships_calls(&self) -> u64 {
        self.relationships_calls.load(Ordering::SeqCst)
    }

    pub fn resolve_calls(&self) -> u64 {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn should_fail(counter: &AtomicU64, fail_at: &AtomicU64) -> bool {
        let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
        let target = fail_at.load(Ordering::SeqCst);
        target != 0 && count >= target
    }
}

impl<S: GraphStore> GraphStore for FailingGraph<S> {
    type Handle = S::Handle;

    fn node_by_id(&self, id: NodeId) -> StoreResult<NodeId> {
        self.node_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.node_by_id(id)
    }

    fn relationships<'a>(
        &'a self,
        node: NodeId,
        direction: Direction,
        rel_type: &RelationshipType,
    ) -> StoreResult<RelationshipIter<'a>> {
        if Self::should_fail(&self.relationships_calls, &self.relationships_fail_at) {
            return Err(GraphStoreError::Backend {
                message: "Injected relationships failure".into(),
            });
        }
        let rels = self.inner.relationships(node, direction, rel_type)?;
        let corrupt = self.corrupt;
        Ok(Box::new(rels.map(move |rel| {
            rel.map(|rel| match corrupt {
                Some(id) if rel.id == id => Relationship {
                    start: DANGLING_NODE,
                    end: DANGLING_NODE,
                    ..rel
                },
                _ => rel,
            })
        })))
    }

    fn resolve(&self, node: NodeId) -> StoreResult<S::Handle> {
        if Self::should_fail(&self.resolve_calls, &self.resolve_fail_at) {
            return Err(GraphStoreError::Backend {
                message: "Injected resolve failure".into(),
            });
        }
        self.inner.resolve(node)
    }
}
