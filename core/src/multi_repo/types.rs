//! Multi-repository data types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate per-repository state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryContext {
    pub id: String,
    pub display_name: String,
    pub language: Option<String>,
    pub framework: Option<String>,
    pub architecture: Option<String>,
    pub team_size: Option<u32>,
    pub tech_stack: Vec<String>,
    pub common_patterns: Vec<String>,
    pub success_rate: f32,
    pub total_sessions: u64,
    pub last_activity: DateTime<Utc>,
    pub metadata: HashMap<String, String>,
}

impl RepositoryContext {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            language: None,
            framework: None,
            architecture: None,
            team_size: None,
            tech_stack: Vec::new(),
            common_patterns: Vec::new(),
            success_rate: 0.5,
            total_sessions: 0,
            last_activity: now,
            metadata: HashMap::new(),
        }
    }
}

/// Kind of relation between two repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryRelationKind {
    Similar,
}

/// A relation between two repositories, with evidence tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRelation {
    pub from: String,
    pub to: String,
    pub kind: RepositoryRelationKind,
    pub similarity: f32,
    pub evidence: Vec<String>,
}

/// A pattern observed across at least two repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossRepoPattern {
    pub name: String,
    pub repositories: Vec<String>,
    pub frequency: usize,
    pub tech_stacks: Vec<String>,
    pub frameworks: Vec<String>,
    pub success_rate: f32,
    pub confidence: f32,
}

/// Query parameters for `query_multi_repo`.
#[derive(Debug, Clone, Default)]
pub struct MultiRepoQuery {
    pub repository_ids: Vec<String>,
    pub tech: Option<String>,
    pub framework: Option<String>,
    pub active_within_days: Option<i64>,
    pub limit: Option<usize>,
}

/// One scored repository result from `query_multi_repo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRepoResult {
    pub repository_id: String,
    pub relevance: f32,
}

/// Aggregate cross-repository insights.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MultiRepoInsights {
    pub tech_distribution: HashMap<String, usize>,
    pub framework_distribution: HashMap<String, usize>,
    pub language_distribution: HashMap<String, usize>,
    pub average_success_rate: f32,
    pub common_pattern_frequency: HashMap<String, usize>,
}
