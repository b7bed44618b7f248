//! Conflict and resolution record types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "proptest-arbitrary")]
use proptest::prelude::{prop_oneof, Arbitrary, BoxedStrategy, Just, Strategy};

/// Dimension along which two chunks were found to conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    Architectural,
    Technical,
    Temporal,
    Methodology,
    Outcome,
    Pattern,
    Decision,
}

#[cfg(feature = "proptest-arbitrary")]
impl Arbitrary for ConflictKind {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Self::Architectural),
            Just(Self::Technical),
            Just(Self::Temporal),
            Just(Self::Methodology),
            Just(Self::Outcome),
            Just(Self::Pattern),
            Just(Self::Decision),
        ]
        .boxed()
    }
}

/// Severity of a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Weight used to sort conflicts by severity (critical 5 .. info 1).
    #[must_use]
    pub fn weight(self) -> u8 {
        match self {
            Severity::Critical => 5,
            Severity::High => 4,
            Severity::Medium => 3,
            Severity::Low => 2,
            Severity::Info => 1,
        }
    }
}

/// One specific point of divergence within a conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictPoint {
    pub aspect: String,
    pub primary: String,
    pub conflicting: String,
    pub confidence: f32,
}

/// A pairwise conflict between two chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub id: Uuid,
    pub kind: ConflictKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub confidence: f32,
    pub primary_chunk_id: String,
    pub conflicting_chunk_id: String,
    pub related_chunk_ids: Vec<String>,
    pub points: Vec<ConflictPoint>,
    pub evidence: Vec<(String, String)>,
    pub context: HashMap<String, String>,
    pub time_difference_days: i64,
    pub detected_at: DateTime<Utc>,
    pub resolution_type: Option<String>,
    pub resolution_note: Option<String>,
}

/// Kind of resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionType {
    AcceptLatest,
    AcceptHighestConfidence,
    Merge,
    ManualReview,
    Contextual,
    Evolutionary,
    DomainSpecific,
}

/// A candidate way to resolve a conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionStrategy {
    pub strategy_type: ResolutionType,
    pub title: String,
    pub description: String,
    pub confidence: f32,
    pub rationale: String,
    pub steps: Vec<String>,
    pub risks: Vec<String>,
    pub benefits: Vec<String>,
    pub context: HashMap<String, String>,
}

/// Recommendation bundle returned by `resolve_conflicts` for one conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionRecommendation {
    pub conflict_id: Uuid,
    pub strategies: Vec<ResolutionStrategy>,
    pub recommended: ResolutionStrategy,
    pub repository: String,
    pub affected_files: Vec<String>,
    pub stakeholder_impact: HashMap<String, Severity>,
    pub technical_context: HashMap<String, String>,
    pub valid_until: DateTime<Utc>,
}

/// Result of `detect_conflicts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub total_chunks: usize,
    pub conflicts_found: usize,
    pub conflicts: Vec<Conflict>,
    pub processing_time_micros: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_weight_orders_critical_highest() {
        assert!(Severity::Critical.weight() > Severity::High.weight());
        assert!(Severity::High.weight() > Severity::Medium.weight());
        assert!(Severity::Low.weight() > Severity::Info.weight());
    }
}
