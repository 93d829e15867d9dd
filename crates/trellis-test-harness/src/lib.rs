//! Test infrastructure for trellis traversal tests
//!
//! Provides reusable graph fixtures and a store wrapper for failure
//! injection and collaborator call counting.

pub mod failing_graph;
pub mod fixtures;

pub use failing_graph::FailingGraph;
pub use fixtures::{
    chain_graph, collect_ids, cycle_graph, diamond_graph, graph_from_edges, star_graph, tree_graph,
};
