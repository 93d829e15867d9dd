//! Graph fixtures
//!
//! All fixtures number their nodes from 0 in creation order and create
//! relationships in the order listed, so adjacency order is predictable.

use trellis_core::{Emitted, NodeId, TraversalResult};
use trellis_storage::{MemGraph, MemNode};

/// Build a graph with `nodes` nodes and the given `(start, type, end)` edges
pub fn graph_from_edges(nodes: u64, edges: &[(NodeId, &str, NodeId)]) -> MemGraph {
    let mut graph = MemGraph::new();
    for id in 0..nodes {
        graph.add_node(MemNode::new(id).with_property("name", format!("node-{}", id)));
    }
    for &(start, rel_type, end) in edges {
        graph
            .create_relationship(start, rel_type, end)
            .expect("fixture edge endpoints exist");
    }
    graph
}

/// Node 0 connected to 1, 2 and 3 by outgoing `friend` relationships
pub fn star_graph() -> MemGraph {
    graph_from_edges(4, &[(0, "friend", 1), (0, "friend", 2), (0, "friend", 3)])
}

/// `0 -next-> 1 -next-> ... -next-> len-1`
pub fn chain_graph(len: u64) -> MemGraph {
    let edges: Vec<(NodeId, &str, NodeId)> = (1..len).map(|i| (i - 1, "next", i)).collect();
    graph_from_edges(len, &edges)
}

/// A chain closed back onto node 0
pub fn cycle_graph(len: u64) -> MemGraph {
    let mut edges: Vec<(NodeId, &str, NodeId)> = (1..len).map(|i| (i - 1, "next", i)).collect();
    if len > 0 {
        edges.push((len - 1, "next", 0));
    }
    graph_from_edges(len, &edges)
}

/// `0 -> {1, 2} -> 3` over `link` relationships
pub fn diamond_graph() -> MemGraph {
    graph_from_edges(4, &[(0, "link", 1), (0, "link", 2), (1, "link", 3), (2, "link", 3)])
}

/// Complete tree of `child` relationships, root 0, numbered level by level
pub fn tree_graph(depth: u32, fanout: u64) -> MemGraph {
    let mut edges: Vec<(NodeId, &str, NodeId)> = Vec::new();
    let mut level: Vec<NodeId> = vec![0];
    let mut next: NodeId = 1;
    for _ in 0..depth {
        let mut children = Vec::new();
        for &parent in &level {
            for _ in 0..fanout {
                edges.push((parent, "child", next));
                children.push(next);
                next += 1;
            }
        }
        level = children;
    }
    graph_from_edges(next, &edges)
}

/// Node ids of every emitted value, raw or resolved
pub fn collect_ids<I>(iter: I) -> TraversalResult<Vec<NodeId>>
where
    I: IntoIterator<Item = TraversalResult<Emitted<MemNode>>>,
{
    iter.into_iter()
        .map(|emitted| {
            Ok(match emitted? {
                Emitted::Position(position) => position.node(),
                Emitted::Node(node) => node.id,
            })
        })
        .collect()
}
