//! Query surface over a built [`KnowledgeGraph`].

use std::collections::{HashSet, VecDeque};

use crate::graph::builder::KnowledgeGraph;
use crate::graph::node::{Node, NodeKind};
use crate::graph::relation::RelationKind;

/// Query parameters for [`KnowledgeGraph::query`].
#[derive(Debug, Clone, Default)]
pub struct GraphQuery {
    pub node_kinds: Vec<NodeKind>,
    pub relation_kinds: Vec<RelationKind>,
    pub keywords: Vec<String>,
    pub min_confidence: f32,
    pub max_depth: usize,
    pub limit: Option<usize>,
}

/// Aggregate statistics over a knowledge graph.
#[derive(Debug, Clone, Default)]
pub struct GraphStats {
    pub node_count: usize,
    pub relation_count: usize,
    pub nodes_by_kind: std::collections::HashMap<String, usize>,
    pub relations_by_kind: std::collections::HashMap<String, usize>,
    pub inferred_relation_count: usize,
}

impl KnowledgeGraph {
    /// Query nodes matching kind/keyword/confidence filters, sorted by
    /// `confidence * (usage_count + 1)` descending, with the limit
    /// applied after sorting.
    #[must_use]
    pub fn query(&self, query: &GraphQuery) -> Vec<&Node> {
        let mut matched: Vec<&Node> = self
            .nodes
            .values()
            .filter(|node| {
                (query.node_kinds.is_empty() || query.node_kinds.contains(&node.kind))
                    && node.confidence >= query.min_confidence
                    && (query.keywords.is_empty()
                        || query.keywords.iter().any(|kw| {
                            node.name.to_lowercase().contains(&kw.to_lowercase())
                                || node.content.to_lowercase().contains(&kw.to_lowercase())
                        }))
            })
            .collect();

        matched.sort_by(|a, b| {
            let score_a = a.confidence * (a.usage_count as f32 + 1.0);
            let score_b = b.confidence * (b.usage_count as f32 + 1.0);
            score_b.partial_cmp(&score_a).unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        matched
    }

    /// Nodes reachable from `node_id` within `max_depth` hops, treating
    /// relations as undirected (traverses both outgoing and incoming
    /// edges), via breadth-first search.
    #[must_use]
    pub fn get_related(&self, node_id: &str, max_depth: usize) -> Vec<&Node> {
        if max_depth == 0 || !self.nodes.contains_key(node_id) {
            return Vec::new();
        }

        let mut visited = HashSet::new();
        visited.insert(node_id.to_string());
        let mut frontier = VecDeque::new();
        frontier.push_back((node_id.to_string(), 0usize));
        let mut result = Vec::new();

        while let Some((current, depth)) = frontier.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for neighbor in self.neighbors(&current) {
                if visited.insert(neighbor.clone()) {
                    if let Some(node) = self.nodes.get(&neighbor) {
                        result.push(node);
                    }
                    frontier.push_back((neighbor, depth + 1));
                }
            }
        }
        result
    }

    fn neighbors(&self, node_id: &str) -> Vec<String> {
        self.relations
            .values()
            .filter_map(|relation| {
                if relation.from == node_id {
                    Some(relation.to.clone())
                } else if relation.to == node_id {
                    Some(relation.from.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Aggregate node/relation counts, grouped by kind.
    #[must_use]
    pub fn get_stats(&self) -> GraphStats {
        let mut nodes_by_kind = std::collections::HashMap::new();
        for node in self.nodes.values() {
            *nodes_by_kind.entry(format!("{:?}", node.kind)).or_insert(0) += 1;
        }
        let mut relations_by_kind = std::collections::HashMap::new();
        let mut inferred_relation_count = 0;
        for relation in self.relations.values() {
            *relations_by_kind
                .entry(format!("{:?}", relation.kind))
                .or_insert(0) += 1;
            if relation.is_inferred() {
                inferred_relation_count += 1;
            }
        }
        GraphStats {
            node_count: self.node_count(),
            relation_count: self.relation_count(),
            nodes_by_kind,
            relations_by_kind,
            inferred_relation_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::GraphConfig;
    use crate::graph::relation::Relation;

    fn line_graph() -> KnowledgeGraph {
        let config = GraphConfig::default();
        let mut graph = KnowledgeGraph::new(&config);
        for id in ["a", "b", "c", "d"] {
            graph.add_node(Node::new(id, NodeKind::Concept, id)).unwrap();
        }
        graph
            .add_relation(Relation::new("a", "b", RelationKind::SimilarTo))
            .unwrap();
        graph
            .add_relation(Relation::new("b", "c", RelationKind::SimilarTo))
            .unwrap();
        graph
            .add_relation(Relation::new("c", "d", RelationKind::SimilarTo))
            .unwrap();
        graph
    }

    #[test]
    fn get_related_depth_zero_is_empty() {
        let graph = line_graph();
        assert!(graph.get_related("a", 0).is_empty());
    }

    #[test]
    fn get_related_depth_is_monotonic() {
        let graph = line_graph();
        let at_one: HashSet<String> = graph.get_related("a", 1).iter().map(|n| n.id.clone()).collect();
        let at_two: HashSet<String> = graph.get_related("a", 2).iter().map(|n| n.id.clone()).collect();
        assert!(at_one.is_subset(&at_two));
    }

    #[test]
    fn query_sorts_by_confidence_times_usage() {
        let config = GraphConfig::default();
        let mut graph = KnowledgeGraph::new(&config);
        let mut low = Node::new("low", NodeKind::Concept, "low");
        low.confidence = 0.2;
        let mut high = Node::new("high", NodeKind::Concept, "high");
        high.confidence = 0.9;
        graph.add_node(low).unwrap();
        graph.add_node(high).unwrap();

        let results = graph.query(&GraphQuery {
            node_kinds: vec![NodeKind::Concept],
            min_confidence: 0.0,
            ..GraphQuery::default()
        });
        assert_eq!(results.first().map(|n| n.id.as_str()), Some("high"));
    }
}
