//! Knowledge graph node types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "proptest-arbitrary")]
use proptest::prelude::{prop_oneof, Arbitrary, BoxedStrategy, Just, Strategy};

/// Closed set of knowledge-node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Chunk,
    Concept,
    File,
    Function,
    Pattern,
    Problem,
    Solution,
    Decision,
    Repository,
    Workflow,
}

#[cfg(feature = "proptest-arbitrary")]
impl Arbitrary for NodeKind {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Self::Chunk),
            Just(Self::Concept),
            Just(Self::File),
            Just(Self::Function),
            Just(Self::Pattern),
            Just(Self::Problem),
            Just(Self::Solution),
            Just(Self::Decision),
            Just(Self::Repository),
            Just(Self::Workflow),
        ]
        .boxed()
    }
}

/// A node in the in-process knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub description: String,
    pub content: String,
    pub properties: HashMap<String, String>,
    pub tags: Vec<String>,
    pub chunk_id: Option<String>,
    pub confidence: f32,
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

impl Node {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: NodeKind, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            description: String::new(),
            content: String::new(),
            properties: HashMap::new(),
            tags: Vec::new(),
            chunk_id: None,
            confidence: 0.5,
            usage_count: 0,
            created_at: now,
            updated_at: now,
            last_used_at: now,
        }
    }

    /// Node id for a chunk node: `chunk_{chunk_id}` (deterministic).
    #[must_use]
    pub fn chunk_node_id(chunk_id: &str) -> String {
        format!("chunk_{chunk_id}")
    }

    /// Node id for an entity node: `{kind}_{slug(name)}` (deterministic,
    /// collision-resistant enough for merge-or-create lookups).
    #[must_use]
    pub fn entity_node_id(kind: NodeKind, name: &str) -> String {
        format!("{}_{}", kind_slug(kind), slug(name))
    }

    /// Record a fresh use of this node: bumps `usage_count` and
    /// `last_used_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.usage_count += 1;
        self.last_used_at = now;
        self.updated_at = now;
    }
}

fn kind_slug(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Chunk => "chunk",
        NodeKind::Concept => "concept",
        NodeKind::File => "file",
        NodeKind::Function => "function",
        NodeKind::Pattern => "pattern",
        NodeKind::Problem => "problem",
        NodeKind::Solution => "solution",
        NodeKind::Decision => "decision",
        NodeKind::Repository => "repository",
        NodeKind::Workflow => "workflow",
    }
}

fn slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_node_id_is_deterministic() {
        assert_eq!(Node::chunk_node_id("abc"), "chunk_abc");
    }

    #[test]
    fn entity_node_id_slugifies_name() {
        assert_eq!(
            Node::entity_node_id(NodeKind::Concept, "GraphQL API!"),
            "concept_graphql_api"
        );
    }
}
