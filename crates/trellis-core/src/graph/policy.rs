//! Stop and return policies
//!
//! Both are closed sets of variants evaluated through a single method:
//! `StopPolicy::should_stop_expanding` runs before a position's children are
//! generated, `ReturnPolicy::should_return` runs for every visited position.

use crate::graph::position::{PositionView, TraversalPosition};
use crate::types::config::Depth;
use std::fmt;
use std::sync::Arc;

/// Decides whether to expand past a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPolicy {
    /// Stop expanding at positions with `depth >= bound`
    DepthBound(u32),
    /// Expand until the frontier runs dry
    Unbounded,
}

impl StopPolicy {
    pub fn should_stop_expanding(&self, position: &TraversalPosition) -> bool {
        match self {
            StopPolicy::DepthBound(bound) => position.depth() >= *bound,
            StopPolicy::Unbounded => false,
        }
    }
}

impl From<Depth> for StopPolicy {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Levels(levels) => StopPolicy::DepthBound(levels),
            Depth::All => StopPolicy::Unbounded,
        }
    }
}

/// Caller-supplied return filter
pub type ReturnPredicate<H> = Arc<dyn Fn(&PositionView<H>) -> bool + Send + Sync>;

/// Decides whether a visited position is handed to the consumer
pub enum ReturnPolicy<H> {
    /// Every position except the start
    AllButStart,
    /// Positions accepted by `predicate`
    ///
    /// `raw` is captured when the filter is installed: a raw predicate sees
    /// node identities, otherwise nodes are resolved through the store first.
    Predicate {
        predicate: ReturnPredicate<H>,
        raw: bool,
    },
}

impl<H> ReturnPolicy<H> {
    /// Check if evaluating this policy requires a resolved node
    pub fn resolves_nodes(&self) -> bool {
        matches!(self, ReturnPolicy::Predicate { raw: false, .. })
    }

    pub fn should_return(&self, view: &PositionView<H>) -> bool {
        match self {
            ReturnPolicy::AllButStart => !view.is_start(),
            ReturnPolicy::Predicate { predicate, .. } => predicate(view),
        }
    }
}

impl<H> Default for ReturnPolicy<H> {
    fn default() -> Self {
        ReturnPolicy::AllButStart
    }
}

impl<H> Clone for ReturnPolicy<H> {
    fn clone(&self) -> Self {
        match self {
            ReturnPolicy::AllButStart => ReturnPolicy::AllButStart,
            ReturnPolicy::Predicate { predicate, raw } => ReturnPolicy::Predicate {
                predicate: Arc::clone(predicate),
                raw: *raw,
            },
        }
    }
}

impl<H> fmt::Debug for ReturnPolicy<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnPolicy::AllButStart => f.write_str("AllButStart"),
            ReturnPolicy::Predicate { raw, .. } => f
                .debug_struct("Predicate")
                .field("raw", raw)
                .finish_non_exhaustive(),
        }
    }
}
