//! The [`Chunk`] record: one immutable conversation fragment.
//!
//! Chunks are owned by the `Storage` collaborator; the core only
//! reads them, except through `Storage::update` to persist refresh
//! metadata (see [`crate::freshness`]).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "proptest-arbitrary")]
use proptest::prelude::{prop_oneof, Arbitrary, BoxedStrategy, Just, Strategy};

/// Closed set of conversation-fragment kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Problem,
    Solution,
    ArchitectureDecision,
    CodeChange,
    Analysis,
    Verification,
    Question,
    Discussion,
    Task,
    TaskUpdate,
    TaskProgress,
    SessionSummary,
}

#[cfg(feature = "proptest-arbitrary")]
impl Arbitrary for ChunkKind {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Self::Problem),
            Just(Self::Solution),
            Just(Self::ArchitectureDecision),
            Just(Self::CodeChange),
            Just(Self::Analysis),
            Just(Self::Verification),
            Just(Self::Question),
            Just(Self::Discussion),
            Just(Self::Task),
            Just(Self::TaskUpdate),
            Just(Self::TaskProgress),
            Just(Self::SessionSummary),
        ]
        .boxed()
    }
}

/// Closed set of chunk outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failed,
    InProgress,
    Abandoned,
}

#[cfg(feature = "proptest-arbitrary")]
impl Arbitrary for Outcome {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Self::Success),
            Just(Self::Failed),
            Just(Self::InProgress),
            Just(Self::Abandoned),
        ]
        .boxed()
    }
}

/// Optional quality sub-record attached to a chunk by prior analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityInfo {
    pub completeness: Option<f32>,
    pub clarity: Option<f32>,
    pub usage_score: Option<f32>,
}

/// Optional confidence sub-record, possibly pre-populated by an earlier
/// `calculate_chunk_confidence` run and cached on the chunk by Storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInfo {
    pub score: Option<f32>,
    /// User-asserted certainty, when the author recorded one explicitly.
    pub user_certainty: Option<f32>,
}

/// Extension metadata carried alongside a chunk; used for freshness
/// refresh bookkeeping (`last_refreshed`) and arbitrary caller data.
pub type ChunkMetadata = HashMap<String, String>;

/// One immutable conversation fragment.
///
/// The core never mutates a `Chunk` directly; refresh metadata updates
/// go through `Storage::update` with a freshly cloned chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub session_id: String,
    pub repository: String,
    pub content: String,
    pub summary: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub kind: ChunkKind,
    pub outcome: Outcome,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub files_modified: Vec<String>,
    #[serde(default)]
    pub tools_used: Vec<String>,
    #[serde(default)]
    pub quality: Option<QualityInfo>,
    #[serde(default)]
    pub confidence: Option<ConfidenceInfo>,
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Age of this chunk in whole days, relative to `now`.
    #[must_use]
    pub fn days_old(&self, now: DateTime<Utc>) -> i64 {
        (now - self.timestamp).num_days().max(0)
    }

    /// `last_refreshed` extension metadata, parsed as an ISO-8601 timestamp.
    #[must_use]
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.metadata
            .get("last_refreshed")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Global/unassigned repository sentinel used by contextual-relevance
    /// scoring to distinguish "general" chunks from repo-scoped ones.
    #[must_use]
    pub fn is_global_repository(&self) -> bool {
        self.repository.is_empty() || self.repository == "global"
    }

    /// Deterministic, collision-resistant node id for this chunk when
    /// inserted into the knowledge graph: `chunk_{id}`.
    #[must_use]
    pub fn node_id(&self) -> String {
        format!("chunk_{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Chunk {
        Chunk {
            id: "c1".into(),
            session_id: "s1".into(),
            repository: "repo-a".into(),
            content: "there is a bug where login fails".into(),
            summary: None,
            timestamp: Utc::now(),
            kind: ChunkKind::Problem,
            outcome: Outcome::InProgress,
            tags: vec![],
            files_modified: vec![],
            tools_used: vec![],
            quality: None,
            confidence: None,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn node_id_is_deterministic() {
        let c = sample();
        assert_eq!(c.node_id(), format!("chunk_{}", c.id));
    }

    #[test]
    fn global_repository_detection() {
        let mut c = sample();
        c.repository = "global".into();
        assert!(c.is_global_repository());
        c.repository = "acme/widgets".into();
        assert!(!c.is_global_repository());
    }

    #[test]
    fn last_refreshed_parses_rfc3339() {
        let mut c = sample();
        c.metadata
            .insert("last_refreshed".into(), "2024-01-01T00:00:00Z".into());
        assert!(c.last_refreshed().is_some());
    }
}
