//! Three-pass `build_from_chunks`.

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use crate::chunk::{Chunk, ChunkKind};
use crate::error::{Error, Result};
use crate::extraction;
use crate::graph::node::{Node, NodeKind};
use crate::graph::relation::{Relation, RelationKind};
use crate::pattern::similarity::keyword_overlap;

/// Tuning constants for the knowledge graph builder.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub max_nodes: usize,
    pub min_concept_confidence: f32,
    pub relation_threshold: f32,
    pub follows_window: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_nodes: 10_000,
            min_concept_confidence: 0.5,
            relation_threshold: 0.5,
            follows_window: 5,
        }
    }
}

/// The in-process knowledge graph: owns its node and relation maps,
/// built synchronously but served concurrently for reads.
#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    config_max_nodes: usize,
    pub(super) nodes: HashMap<String, Node>,
    pub(super) relations: HashMap<String, Relation>,
}

impl KnowledgeGraph {
    #[must_use]
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            config_max_nodes: config.max_nodes,
            nodes: HashMap::new(),
            relations: HashMap::new(),
        }
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Add a node, or touch the existing one with the same id.
    ///
    /// # Errors
    /// Returns [`Error::CapacityExceeded`] when at `max_nodes` and the
    /// node is new.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if !self.nodes.contains_key(&node.id) && self.nodes.len() >= self.config_max_nodes {
            return Err(Error::CapacityExceeded(format!(
                "knowledge graph at max_nodes={}",
                self.config_max_nodes
            )));
        }
        self.nodes
            .entry(node.id.clone())
            .and_modify(|existing| existing.touch(Utc::now()))
            .or_insert(node);
        Ok(())
    }

    /// Add a relation. Both endpoints must already exist.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if either endpoint is missing.
    pub fn add_relation(&mut self, relation: Relation) -> Result<()> {
        if !self.nodes.contains_key(&relation.from) {
            return Err(Error::NotFound(format!("node {}", relation.from)));
        }
        if !self.nodes.contains_key(&relation.to) {
            return Err(Error::NotFound(format!("node {}", relation.to)));
        }
        self.relations.insert(relation.id.clone(), relation);
        Ok(())
    }

    /// Build (or extend) the graph from an ordered chunk sequence,
    /// following the three-pass process.
    ///
    /// # Errors
    /// Propagates [`Error::CapacityExceeded`] if `max_nodes` is reached.
    #[tracing::instrument(skip(self, chunks, config))]
    pub fn build_from_chunks(&mut self, chunks: &[Chunk], config: &GraphConfig) -> Result<()> {
        self.pass_one_entities(chunks, config)?;
        self.pass_two_sequence(chunks, config)?;
        self.pass_three_similarity(config)?;
        Ok(())
    }

    fn pass_one_entities(&mut self, chunks: &[Chunk], config: &GraphConfig) -> Result<()> {
        for chunk in chunks {
            let chunk_node_id = Node::chunk_node_id(&chunk.id);
            let mut node = Node::new(chunk_node_id.clone(), NodeKind::Chunk, chunk.id.clone());
            node.content = chunk.content.clone();
            node.chunk_id = Some(chunk.id.clone());
            node.confidence = chunk.confidence.as_ref().and_then(|c| c.score).unwrap_or(0.5);
            self.add_node(node)?;

            for concept in extraction::extract_concepts(&chunk.content) {
                if concept.confidence < config.min_concept_confidence {
                    continue;
                }
                let concept_node_id = Node::entity_node_id(NodeKind::Concept, &concept.name);
                let mut concept_node = Node::new(concept_node_id.clone(), NodeKind::Concept, &concept.name);
                concept_node.description = concept.description.clone();
                concept_node.confidence = concept.confidence;
                self.add_node(concept_node)?;
                self.add_relation(Relation::new(
                    chunk_node_id.clone(),
                    concept_node_id,
                    RelationKind::Contains,
                ))?;
            }

            for file in extraction::extract_files(&chunk.content) {
                let file_node_id = Node::entity_node_id(NodeKind::File, &file);
                self.add_node(Node::new(file_node_id.clone(), NodeKind::File, &file))?;
                self.add_relation(Relation::new(
                    chunk_node_id.clone(),
                    file_node_id,
                    RelationKind::References,
                ))?;
            }

            for function in extraction::extract_functions(&chunk.content) {
                let function_node_id = Node::entity_node_id(NodeKind::Function, &function);
                self.add_node(Node::new(function_node_id.clone(), NodeKind::Function, &function))?;
                self.add_relation(Relation::new(
                    chunk_node_id,
                    function_node_id,
                    RelationKind::References,
                ))?;
            }
        }
        Ok(())
    }

    fn pass_two_sequence(&mut self, chunks: &[Chunk], config: &GraphConfig) -> Result<()> {
        for window in chunks.windows(2) {
            let from = Node::chunk_node_id(&window[0].id);
            let to = Node::chunk_node_id(&window[1].id);
            self.add_relation(Relation::new(from, to, RelationKind::Follows))?;
        }

        for (i, chunk) in chunks.iter().enumerate() {
            if chunk.kind != ChunkKind::Problem {
                continue;
            }
            let problem_phrases = extraction::extract_key_phrases(&chunk.content);
            let window_end = (i + 1 + config.follows_window).min(chunks.len());
            for candidate in &chunks[i + 1..window_end] {
                if candidate.kind != ChunkKind::Solution {
                    continue;
                }
                let solution_phrases = extraction::extract_key_phrases(&candidate.content);
                let overlap = keyword_overlap(&problem_phrases, &solution_phrases);
                if overlap > 0.0 {
                    let mut relation = Relation::new(
                        Node::chunk_node_id(&candidate.id),
                        Node::chunk_node_id(&chunk.id),
                        RelationKind::Solves,
                    );
                    relation.weight = overlap;
                    self.add_relation(relation)?;
                }
            }
        }
        Ok(())
    }

    fn pass_three_similarity(&mut self, config: &GraphConfig) -> Result<()> {
        let ids: Vec<String> = self.nodes.keys().cloned().collect();
        let mut to_add = Vec::new();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let a = &self.nodes[&ids[i]];
                let b = &self.nodes[&ids[j]];
                if a.kind != b.kind {
                    continue;
                }
                let similarity = word_overlap(&text_of(a), &text_of(b));
                if similarity >= config.relation_threshold {
                    let mut relation =
                        Relation::new(a.id.clone(), b.id.clone(), RelationKind::SimilarTo).inferred();
                    relation.weight = similarity;
                    relation.confidence = similarity;
                    to_add.push(relation);
                }
            }
        }
        for relation in to_add {
            self.add_relation(relation)?;
        }
        Ok(())
    }
}

fn text_of(node: &Node) -> String {
    format!("{} {} {}", node.name, node.description, node.content)
}

fn word_overlap(a: &str, b: &str) -> f32 {
    let set_a: HashSet<&str> = a.split_whitespace().collect();
    let set_b: HashSet<&str> = b.split_whitespace().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Outcome;
    use std::collections::HashMap as StdHashMap;

    fn chunk(id: &str, kind: ChunkKind, content: &str) -> Chunk {
        Chunk {
            id: id.into(),
            session_id: "s1".into(),
            repository: "repo".into(),
            content: content.into(),
            summary: None,
            timestamp: Utc::now(),
            kind,
            outcome: Outcome::InProgress,
            tags: vec![],
            files_modified: vec![],
            tools_used: vec![],
            quality: None,
            confidence: None,
            metadata: StdHashMap::new(),
        }
    }

    #[test]
    fn relation_rejects_missing_endpoint() {
        let config = GraphConfig::default();
        let mut graph = KnowledgeGraph::new(&config);
        graph
            .add_node(Node::new("a", NodeKind::Chunk, "a"))
            .unwrap();
        let err = graph
            .add_relation(Relation::new("a", "missing", RelationKind::Follows))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn scenario_s1_follows_and_solves_edges() {
        let config = GraphConfig::default();
        let mut graph = KnowledgeGraph::new(&config);
        let chunks = vec![
            chunk("c1", ChunkKind::Problem, "there is a bug where login fails"),
            chunk("c2", ChunkKind::Analysis, "looking into it"),
            chunk("c3", ChunkKind::Solution, "add nil check in auth() for login fails"),
            chunk("c4", ChunkKind::Verification, "verified, login works"),
        ];
        graph.build_from_chunks(&chunks, &config).unwrap();

        let c1 = Node::chunk_node_id("c1");
        let c2 = Node::chunk_node_id("c2");
        let c3 = Node::chunk_node_id("c3");
        let c4 = Node::chunk_node_id("c4");

        assert!(graph
            .relations
            .values()
            .any(|r| r.from == c1 && r.to == c2 && r.kind == RelationKind::Follows));
        assert!(graph
            .relations
            .values()
            .any(|r| r.from == c2 && r.to == c3 && r.kind == RelationKind::Follows));
        assert!(graph
            .relations
            .values()
            .any(|r| r.from == c3 && r.to == c4 && r.kind == RelationKind::Follows));
        assert!(graph
            .relations
            .values()
            .any(|r| r.from == c3 && r.to == c1 && r.kind == RelationKind::Solves && r.weight > 0.0));
    }

    #[test]
    fn capacity_exceeded_rejects_new_nodes() {
        let config = GraphConfig {
            max_nodes: 1,
            ..GraphConfig::default()
        };
        let mut graph = KnowledgeGraph::new(&config);
        graph
            .add_node(Node::new("a", NodeKind::Chunk, "a"))
            .unwrap();
        let err = graph
            .add_node(Node::new("b", NodeKind::Chunk, "b"))
            .unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded(_)));
    }
}
