//! Test dataset generation for benchmarks

use rand::prelude::*;
use trellis_core::NodeId;
use trellis_storage::{MemGraph, MemNode};

/// Relationship types used by generated graphs
pub const REL_TYPES: [&str; 4] = ["KNOWS", "FRIENDS_WITH", "WORKS_WITH", "FOLLOWS"];

/// Relationship data for graph generation
#[derive(Debug, Clone)]
pub struct RelationshipData {
    pub from: NodeId,
    pub to: NodeId,
    pub rel_type: &'static str,
}

/// Generate relationships between nodes (social network style)
///
/// Self-loops are never generated; parallel relationships may be.
pub fn generate_relationships(
    node_count: usize,
    avg_connections: usize,
    seed: u64,
) -> Vec<RelationshipData> {
    if node_count < 2 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let total_relationships = node_count * avg_connections / 2;

    (0..total_relationships)
        .map(|_| {
            let from = rng.gen_range(0..node_count);
            let mut to = rng.gen_range(0..node_count);
            while to == from {
                to = rng.gen_range(0..node_count);
            }

            RelationshipData {
                from: from as NodeId,
                to: to as NodeId,
                rel_type: REL_TYPES[rng.gen_range(0..REL_TYPES.len())],
            }
        })
        .collect()
}

/// Build a random `MemGraph` with nodes `0..node_count`
pub fn build_graph(node_count: usize, avg_connections: usize, seed: u64) -> MemGraph {
    let mut graph = MemGraph::new();
    for id in 0..node_count as NodeId {
        graph.add_node(MemNode::new(id).with_property("idx", id.to_le_bytes().to_vec()));
    }
    for rel in generate_relationships(node_count, avg_connections, seed) {
        // Endpoints come from 0..node_count, all of which exist
        let _ = graph.create_relationship(rel.from, rel.rel_type, rel.to);
    }
    graph
}

/// Start nodes for repeated traversals, drawn from the same seed
pub fn generate_starts(node_count: usize, count: usize, seed: u64) -> Vec<NodeId> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| rng.gen_range(0..node_count.max(1)) as NodeId)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::Direction;

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_relationships(100, 4, 42);
        let b = generate_relationships(100, 4, 42);
        assert_eq!(a.len(), 200);
        assert!(a
            .iter()
            .zip(&b)
            .all(|(x, y)| x.from == y.from && x.to == y.to && x.rel_type == y.rel_type));
        assert!(a.iter().all(|r| r.from != r.to));
    }

    #[test]
    fn test_build_graph() {
        let graph = build_graph(50, 4, 3);
        assert_eq!(graph.node_count(), 50);
        assert_eq!(graph.relationship_count(), 100);

        let total_out: usize = (0..50).map(|id| graph.degree(id, Direction::Outgoing)).sum();
        assert_eq!(total_out, 100);
    }

    #[test]
    fn test_tiny_graphs_have_no_relationships() {
        assert!(generate_relationships(1, 10, 0).is_empty());
        assert_eq!(build_graph(0, 4, 0).node_count(), 0);
        assert_eq!(generate_starts(0, 3, 0), vec![0, 0, 0]);
    }
}
