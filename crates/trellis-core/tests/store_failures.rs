//! Store failure, laziness and concurrency tests
//!
//! Uses `FailingGraph` to count collaborator calls and inject backend errors.

use std::sync::Arc;
use std::thread;
use trellis_core::{
    Depth, GraphStoreError, IterState, Order, TraversalDescriptor, TraversalError,
};
use trellis_storage::{MemGraph, MemNode};
use trellis_test_harness::{chain_graph, collect_ids, star_graph, tree_graph, FailingGraph};

fn chain_descriptor() -> TraversalDescriptor<MemNode> {
    TraversalDescriptor::new().outgoing(["next"]).depth(Depth::All)
}

#[test]
fn test_first_expands_only_what_it_needs() {
    let graph = FailingGraph::new(chain_graph(100));

    let first = chain_descriptor().first(&graph, 0).unwrap().unwrap();
    assert_eq!(first.into_node().map(|n| n.id), Some(1));

    // Start and node 1 were expanded, nothing past them
    assert_eq!(graph.node_lookups(), 1);
    assert_eq!(graph.relationships_calls(), 2);
    assert_eq!(graph.resolve_calls(), 1);
}

#[test]
fn test_begin_iteration_touches_no_store() {
    let graph = FailingGraph::new(chain_graph(10));

    let iter = chain_descriptor().begin_iteration(&graph, 0).unwrap();
    assert_eq!(iter.state(), IterState::Fresh);
    assert_eq!(graph.node_lookups(), 0);
    assert_eq!(graph.relationships_calls(), 0);
    assert_eq!(graph.resolve_calls(), 0);
}

#[test]
fn test_has_next_buffers_one_position() {
    let graph = FailingGraph::new(chain_graph(100));
    let mut iter = chain_descriptor().begin_iteration(&graph, 0).unwrap();

    assert!(iter.has_next().unwrap());
    assert!(iter.has_next().unwrap());
    assert_eq!(graph.relationships_calls(), 2);
    // Resolution of the buffered value waits for next()
    assert_eq!(graph.resolve_calls(), 0);

    let node = iter.next().unwrap().unwrap().into_node().unwrap();
    assert_eq!(node.id, 1);
    assert_eq!(graph.relationships_calls(), 2);
    assert_eq!(iter.current_position().map(|p| p.depth()), Some(1));
}

#[test]
fn test_full_traversal_expands_every_node_once() {
    let graph = FailingGraph::new(chain_graph(50));

    let found = collect_ids(chain_descriptor().begin_iteration(&graph, 0).unwrap()).unwrap();
    assert_eq!(found, (1..50).collect::<Vec<_>>());
    assert_eq!(graph.relationships_calls(), 50);
    assert_eq!(graph.resolve_calls(), 49);
}

#[test]
fn test_relationships_failure_propagates_and_fuses() {
    let graph = FailingGraph::new(chain_graph(5)).fail_relationships_at(3);
    let mut iter = chain_descriptor().begin_iteration(&graph, 0).unwrap();

    let first = iter.next().unwrap().unwrap();
    assert_eq!(first.into_node().map(|n| n.id), Some(1));

    let err = iter.next().unwrap().unwrap_err();
    assert!(matches!(
        err,
        TraversalError::Store(GraphStoreError::Backend { ref message })
            if message.contains("relationships")
    ));

    assert_eq!(iter.state(), IterState::Exhausted);
    assert!(iter.next().is_none());
    assert!(!iter.has_next().unwrap());

    // Nothing else was asked of the store after the failure
    assert_eq!(graph.relationships_calls(), 3);
}

#[test]
fn test_resolve_failure_on_emit() {
    let graph = FailingGraph::new(star_graph()).fail_resolve_at(2);
    let descriptor: TraversalDescriptor<MemNode> = TraversalDescriptor::new().outgoing(["friend"]);
    let mut iter = descriptor.begin_iteration(&graph, 0).unwrap();

    assert_eq!(iter.next().unwrap().unwrap().into_node().map(|n| n.id), Some(1));
    assert!(matches!(
        iter.next(),
        Some(Err(TraversalError::Store(GraphStoreError::Backend { .. })))
    ));
    assert!(iter.next().is_none());
}

#[test]
fn test_raw_mode_never_resolves() {
    let graph = FailingGraph::new(star_graph()).fail_resolve_at(1);
    let descriptor: TraversalDescriptor<MemNode> =
        TraversalDescriptor::new().outgoing(["friend"]).raw(true);

    let found = collect_ids(descriptor.begin_iteration(&graph, 0).unwrap()).unwrap();
    assert_eq!(found, vec![1, 2, 3]);
    assert_eq!(graph.resolve_calls(), 0);
}

#[test]
fn test_resolved_filter_resolves_every_visited_node() {
    let graph = FailingGraph::new(chain_graph(4));
    let descriptor = chain_descriptor().filter(|view| view.depth() >= 2);

    let found = collect_ids(descriptor.begin_iteration(&graph, 0).unwrap()).unwrap();
    assert_eq!(found, vec![2, 3]);
    // One per visited position (start included); emitted values reuse them
    assert_eq!(graph.resolve_calls(), 4);
}

#[test]
fn test_dangling_relationship() {
    // Relationship 1 is 0 -friend-> 2
    let graph = FailingGraph::new(star_graph()).corrupt_relationship(1);
    let descriptor: TraversalDescriptor<MemNode> = TraversalDescriptor::new().outgoing(["friend"]);
    let mut iter = descriptor.begin_iteration(&graph, 0).unwrap();

    // The start is expanded on the first pull, so the error shows up there
    assert_eq!(
        iter.next(),
        Some(Err(TraversalError::Store(GraphStoreError::DanglingRelationship {
            relationship: 1,
            node: 0,
        })))
    );
    assert!(iter.next().is_none());
}

#[test]
fn test_unknown_start_node() {
    let graph = chain_graph(3);
    let descriptor = chain_descriptor();

    let mut iter = descriptor.begin_iteration(&graph, 77).unwrap();
    assert_eq!(
        iter.next(),
        Some(Err(TraversalError::Store(GraphStoreError::NodeNotFound { id: 77 })))
    );
    assert!(iter.next().is_none());

    assert!(descriptor.is_empty(&graph, 77).is_err());
    assert!(descriptor.each(&graph, 77, |_| {}).is_err());
}

#[test]
fn test_failure_during_each_stops_callback() {
    let graph = FailingGraph::new(chain_graph(10)).fail_relationships_at(4);

    let mut seen = Vec::new();
    let result = chain_descriptor().each(&graph, 0, |e| {
        seen.extend(e.into_node().map(|n| n.id));
    });
    assert!(result.is_err());
    assert_eq!(seen, vec![1, 2]);
}

#[test]
fn test_clear_failures_restores_traversal() {
    let graph = FailingGraph::new(chain_graph(4)).fail_relationships_at(1);
    let descriptor = chain_descriptor();

    assert!(descriptor.first(&graph, 0).is_err());
    graph.clear_failures();
    assert_eq!(
        collect_ids(descriptor.begin_iteration(&graph, 0).unwrap()).unwrap(),
        vec![1, 2, 3]
    );
}

#[test]
fn test_concurrent_iterators_over_shared_graph() {
    let graph: Arc<MemGraph> = Arc::new(tree_graph(4, 3));
    let descriptor: TraversalDescriptor<MemNode> = TraversalDescriptor::new()
        .outgoing(["child"])
        .depth(Depth::All)
        .raw(true);

    let handles: Vec<_> = [Order::BreadthFirst, Order::DepthFirst, Order::BreadthFirst]
        .into_iter()
        .map(|order| {
            let graph = Arc::clone(&graph);
            let descriptor = descriptor.clone().order(order);
            thread::spawn(move || {
                let iter = descriptor.begin_iteration(graph, 0).unwrap();
                collect_ids(iter).unwrap()
            })
        })
        .collect();

    let results: Vec<Vec<u64>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for ids in &results {
        // 3 + 9 + 27 + 81
        assert_eq!(ids.len(), 120);
    }
    assert_eq!(results[0], (1..=120).collect::<Vec<_>>());
    assert_eq!(results[0], results[2]);

    let mut dfs = results[1].clone();
    assert_ne!(dfs, results[0]);
    dfs.sort_unstable();
    assert_eq!(dfs, results[0]);
}
