//! Pattern, Occurrence, and Relationship data types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "proptest-arbitrary")]
use proptest::prelude::{prop_oneof, Arbitrary, BoxedStrategy, Just, Strategy};

/// Closed set of pattern kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Code,
    Workflow,
    Architectural,
    Behavioral,
    Error,
    Optimization,
    Refactoring,
    ProblemSolution,
    Debugging,
    CodeEvolution,
    Configuration,
    Testing,
    DecisionMaking,
}

#[cfg(feature = "proptest-arbitrary")]
impl Arbitrary for PatternKind {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Self::Code),
            Just(Self::Workflow),
            Just(Self::Architectural),
            Just(Self::Behavioral),
            Just(Self::Error),
            Just(Self::Optimization),
            Just(Self::Refactoring),
            Just(Self::ProblemSolution),
            Just(Self::Debugging),
            Just(Self::CodeEvolution),
            Just(Self::Configuration),
            Just(Self::Testing),
            Just(Self::DecisionMaking),
        ]
        .boxed()
    }
}

/// Validation lifecycle state of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Unvalidated,
    Pending,
    Validated,
    Invalidated,
    Evolved,
}

/// Quintile bucket of a pattern's confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    /// Derive the quintile bucket for a confidence score in `[0, 1]`.
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        let clamped = score.clamp(0.0, 1.0);
        if clamped < 0.2 {
            ConfidenceLevel::VeryLow
        } else if clamped < 0.4 {
            ConfidenceLevel::Low
        } else if clamped < 0.6 {
            ConfidenceLevel::Medium
        } else if clamped < 0.8 {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::VeryHigh
        }
    }
}

/// One example pinning chunk ids and an outcome to a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternExample {
    pub chunk_ids: Vec<String>,
    pub outcome: String,
}

/// A recognized regularity extracted from chunk sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: Uuid,
    pub kind: PatternKind,
    pub name: String,
    pub description: String,
    pub category: String,
    pub keywords: Vec<String>,
    pub signature: HashMap<String, String>,
    pub file_globs: Vec<String>,
    pub language: Option<String>,
    pub confidence_score: f32,
    pub validation_status: ValidationStatus,
    pub occurrence_count: u64,
    pub positive_feedback_count: u64,
    pub negative_feedback_count: u64,
    pub last_seen: DateTime<Utc>,
    pub parent_pattern_id: Option<Uuid>,
    pub evolution_reason: Option<String>,
    pub version: u32,
    pub embedding: Option<Vec<f32>>,
    pub steps: Option<Vec<String>>,
    pub related_pattern_ids: Vec<Uuid>,
    pub examples: Vec<PatternExample>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pattern {
    /// Build a new, unvalidated pattern with zeroed feedback counters.
    #[must_use]
    pub fn new(kind: PatternKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            description: description.into(),
            category: String::new(),
            keywords: Vec::new(),
            signature: HashMap::new(),
            file_globs: Vec::new(),
            language: None,
            confidence_score: 0.5,
            validation_status: ValidationStatus::Unvalidated,
            occurrence_count: 0,
            positive_feedback_count: 0,
            negative_feedback_count: 0,
            last_seen: now,
            parent_pattern_id: None,
            evolution_reason: None,
            version: 1,
            embedding: None,
            steps: None,
            related_pattern_ids: Vec::new(),
            examples: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Derived confidence level, a pure function of `confidence_score`.
    #[must_use]
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence_score)
    }

    /// Set `keywords`, normalizing to lowercase, deduplicated, and
    /// stable-sorted by first insertion order.
    pub fn set_keywords(&mut self, keywords: impl IntoIterator<Item = String>) {
        let mut seen = std::collections::HashSet::new();
        let mut normalized = Vec::new();
        for kw in keywords {
            let lower = kw.to_lowercase();
            if seen.insert(lower.clone()) {
                normalized.push(lower);
            }
        }
        self.keywords = normalized;
    }

    /// Laplace-smoothed Bayesian confidence estimate:
    /// `(positive + 1) / (positive + negative + 2)`.
    #[must_use]
    pub fn bayesian_confidence(&self) -> f32 {
        let positive = self.positive_feedback_count as f32;
        let negative = self.negative_feedback_count as f32;
        (positive + 1.0) / (positive + negative + 2.0)
    }

    /// Record feedback from one observed outcome and recompute confidence.
    pub fn record_feedback(&mut self, is_positive: bool, now: DateTime<Utc>) {
        if is_positive {
            self.positive_feedback_count += 1;
        } else {
            self.negative_feedback_count += 1;
        }
        self.occurrence_count += 1;
        self.confidence_score = self.bayesian_confidence();
        self.last_seen = now;
        self.updated_at = now;
    }
}

/// One detection of a pattern in context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternOccurrence {
    pub id: Uuid,
    pub pattern_id: Uuid,
    pub repository: String,
    pub file_path: Option<String>,
    pub line_range: Option<(u32, u32)>,
    pub code_snippet: Option<String>,
    pub surrounding_context: Option<String>,
    pub detection_score: f32,
    pub detection_method: DetectionMethod,
    pub session_id: String,
    pub chunk_id: String,
    pub detected_at: DateTime<Utc>,
}

/// How a pattern occurrence was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMethod {
    AiAssisted,
    Regex,
    Embedding,
}

/// Kind of directed edge between two patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Extends,
    ConflictsWith,
    Complements,
    AlternativeTo,
}

/// A directed, weighted edge between two patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRelationship {
    pub id: Uuid,
    pub from_pattern_id: Uuid,
    pub to_pattern_id: Uuid,
    pub kind: RelationshipKind,
    pub strength: f32,
    pub confidence: f32,
    pub rationale: String,
    pub examples: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_level_is_pure_function_of_score() {
        assert_eq!(ConfidenceLevel::from_score(0.05), ConfidenceLevel::VeryLow);
        assert_eq!(ConfidenceLevel::from_score(0.25), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0.5), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.75), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.95), ConfidenceLevel::VeryHigh);
    }

    #[test]
    fn keywords_are_lowercased_deduplicated_and_stable() {
        let mut pattern = Pattern::new(PatternKind::Code, "n", "d");
        pattern.set_keywords(vec!["Foo".into(), "bar".into(), "FOO".into()]);
        assert_eq!(pattern.keywords, vec!["foo".to_string(), "bar".to_string()]);
    }

    #[test]
    fn bayesian_confidence_converges_with_alternating_feedback() {
        let mut pattern = Pattern::new(PatternKind::Code, "n", "d");
        let now = Utc::now();
        for i in 0..50 {
            pattern.record_feedback(i % 2 == 0, now);
        }
        let expected = (pattern.positive_feedback_count as f32 + 1.0)
            / (pattern.positive_feedback_count as f32 + pattern.negative_feedback_count as f32 + 2.0);
        assert!((pattern.confidence_score - expected).abs() < 1e-6);
    }
}
