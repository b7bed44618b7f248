//! Universal invariants 2 and 3: `confidence_level` is a pure quintile
//! function of `confidence_score`, and repeated learn cycles converge
//! to the Laplace-smoothed Bayesian estimate.

use chrono::Utc;
use memory_intel_core::pattern::{ConfidenceLevel, Pattern, PatternKind};
use proptest::prelude::*;

proptest! {
    #[test]
    fn confidence_level_matches_quintile_bucket(score in 0.0f32..=1.0) {
        let level = ConfidenceLevel::from_score(score);
        let expected = if score < 0.2 {
            ConfidenceLevel::VeryLow
        } else if score < 0.4 {
            ConfidenceLevel::Low
        } else if score < 0.6 {
            ConfidenceLevel::Medium
        } else if score < 0.8 {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::VeryHigh
        };
        prop_assert_eq!(level, expected);
    }

    #[test]
    fn bayesian_confidence_matches_formula_after_feedback_cycles(
        outcomes in prop::collection::vec(any::<bool>(), 1..200),
    ) {
        let mut pattern = Pattern::new(PatternKind::ProblemSolution, "p", "d");
        let now = Utc::now();
        for is_positive in &outcomes {
            pattern.record_feedback(*is_positive, now);
        }
        let expected = (pattern.positive_feedback_count as f32 + 1.0)
            / (pattern.positive_feedback_count as f32 + pattern.negative_feedback_count as f32 + 2.0);
        prop_assert!((pattern.confidence_score - expected).abs() < 1e-5);
    }

    #[test]
    fn feedback_counts_never_exceed_occurrence_plus_window(
        outcomes in prop::collection::vec(any::<bool>(), 0..200),
    ) {
        // Invariant from the design document:
        // positive + negative <= occurrence_count + feedback_window (0 here,
        // since `record_feedback` increments all three in lockstep).
        let mut pattern = Pattern::new(PatternKind::Debugging, "p", "d");
        let now = Utc::now();
        for is_positive in &outcomes {
            pattern.record_feedback(*is_positive, now);
        }
        prop_assert!(
            pattern.positive_feedback_count + pattern.negative_feedback_count
                <= pattern.occurrence_count
        );
    }
}

#[test]
fn keywords_set_via_constructor_are_lowercase_deduplicated_and_stable() {
    let mut pattern = Pattern::new(PatternKind::Code, "n", "d");
    pattern.set_keywords(["Bug".to_string(), "fix".to_string(), "BUG".to_string(), "fix".to_string()]);
    assert_eq!(pattern.keywords, vec!["bug".to_string(), "fix".to_string()]);
}

#[test]
fn evolved_child_carries_incremented_version_from_parent() {
    let parent = Pattern::new(PatternKind::Workflow, "parent", "d");
    let mut child = Pattern::new(PatternKind::Workflow, "child", "d");
    child.parent_pattern_id = Some(parent.id);
    child.version = parent.version + 1;
    assert_eq!(child.version, parent.version + 1);
}
