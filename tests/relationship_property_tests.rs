//! Universal invariant 5: adding a relation with a missing endpoint
//! fails; `get_related(id, 0)` is empty; `get_related` grows
//! monotonically with depth.

use memory_intel_core::error::Error;
use memory_intel_core::graph::{GraphConfig, KnowledgeGraph, Node, NodeKind, Relation, RelationKind};
use proptest::prelude::*;

fn chain_graph(length: usize) -> (KnowledgeGraph, Vec<String>) {
    let config = GraphConfig::default();
    let mut graph = KnowledgeGraph::new(&config);
    let mut ids = Vec::new();
    for i in 0..length {
        let id = format!("node-{i}");
        graph.add_node(Node::new(id.clone(), NodeKind::Concept, &id)).unwrap();
        ids.push(id);
    }
    for window in ids.windows(2) {
        graph
            .add_relation(Relation::new(window[0].clone(), window[1].clone(), RelationKind::Follows))
            .unwrap();
    }
    (graph, ids)
}

#[test]
fn relation_with_missing_endpoint_fails() {
    let config = GraphConfig::default();
    let mut graph = KnowledgeGraph::new(&config);
    graph.add_node(Node::new("a", NodeKind::Chunk, "a")).unwrap();

    let result = graph.add_relation(Relation::new("a", "missing", RelationKind::References));
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn get_related_at_depth_zero_is_empty() {
    let (graph, ids) = chain_graph(5);
    assert!(graph.get_related(&ids[0], 0).is_empty());
}

#[test]
fn get_related_on_unknown_node_is_empty() {
    let (graph, _ids) = chain_graph(3);
    assert!(graph.get_related("does-not-exist", 5).is_empty());
}

proptest! {
    #[test]
    fn get_related_grows_monotonically_with_depth(length in 2usize..12, depth in 0usize..10) {
        let (graph, ids) = chain_graph(length);
        let shallow = graph.get_related(&ids[0], depth);
        let deeper = graph.get_related(&ids[0], depth + 1);

        let shallow_ids: std::collections::HashSet<&str> =
            shallow.iter().map(|n| n.id.as_str()).collect();
        let deeper_ids: std::collections::HashSet<&str> =
            deeper.iter().map(|n| n.id.as_str()).collect();

        prop_assert!(shallow_ids.is_subset(&deeper_ids));
    }
}

#[test]
fn build_from_chunks_rejects_beyond_max_nodes() {
    let config = GraphConfig {
        max_nodes: 2,
        ..GraphConfig::default()
    };
    let mut graph = KnowledgeGraph::new(&config);
    graph.add_node(Node::new("a", NodeKind::Chunk, "a")).unwrap();
    graph.add_node(Node::new("b", NodeKind::Chunk, "b")).unwrap();
    let result = graph.add_node(Node::new("c", NodeKind::Chunk, "c"));
    assert!(matches!(result, Err(Error::CapacityExceeded(_))));
}
