//! Trellis traversal benchmark suite
//!
//! Seeded random graphs loaded into `MemGraph`, plus a small runner that
//! drains a traversal and reports how much of the graph it touched.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench -p trellis-bench
//!
//! # Compare against baseline
//! cargo bench -p trellis-bench -- --save-baseline main
//! cargo bench -p trellis-bench -- --baseline main
//! ```
//!
//! ## Benchmark Categories
//!
//! - **Breadth-first / depth-first**: bounded traversals over random graphs
//! - **Unbounded**: full reachability with node-global uniqueness
//! - **First value**: cost of a lazy `first()` on a large graph

pub mod datasets;

use std::time::{Duration, Instant};
use trellis_core::{NodeId, TraversalDescriptor, TraversalResult};
use trellis_storage::{MemGraph, MemNode};

/// Outcome of draining one traversal
#[derive(Debug, Clone)]
pub struct TraversalRun {
    pub name: String,
    pub duration: Duration,
    pub returned: usize,
    pub graph_size: usize,
}

impl TraversalRun {
    /// Fraction of the graph's nodes that were returned
    pub fn coverage(&self) -> f64 {
        if self.graph_size == 0 {
            return 0.0;
        }
        self.returned as f64 / self.graph_size as f64
    }

    pub fn print_summary(&self) {
        println!("\n=== {} ===", self.name);
        println!("Graph size: {} nodes", self.graph_size);
        println!(
            "Returned:   {} ({:.1}% coverage)",
            self.returned,
            self.coverage() * 100.0
        );
        println!("Duration:   {:>10.3}ms", self.duration.as_secs_f64() * 1000.0);
    }
}

/// Drain a traversal and count the values it returns
pub fn drain(
    descriptor: &TraversalDescriptor<MemNode>,
    graph: &MemGraph,
    start: NodeId,
) -> TraversalResult<usize> {
    let mut returned = 0;
    for emitted in descriptor.begin_iteration(graph, start)? {
        emitted?;
        returned += 1;
    }
    Ok(returned)
}

/// Time a single drained traversal
pub fn timed_run(
    name: impl Into<String>,
    descriptor: &TraversalDescriptor<MemNode>,
    graph: &MemGraph,
    start: NodeId,
) -> TraversalResult<TraversalRun> {
    let begin = Instant::now();
    let returned = drain(descriptor, graph, start)?;
    Ok(TraversalRun {
        name: name.into(),
        duration: begin.elapsed(),
        returned,
        graph_size: graph.node_count(),
    })
}
