//! Built-in Pattern Catalog: seed patterns always available to
//! the Pattern Engine, baked in as plain factory functions rather
//! than loaded from a file.

use chrono::Utc;

use crate::pattern::types::{Pattern, PatternKind, ValidationStatus};

fn seed(
    kind: PatternKind,
    name: &str,
    description: &str,
    category: &str,
    keywords: &[&str],
    steps: &[&str],
    confidence: f32,
    occurrence_count: u64,
) -> Pattern {
    let now = Utc::now();
    let mut pattern = Pattern::new(kind, name, description);
    pattern.category = category.to_string();
    pattern.set_keywords(keywords.iter().map(|s| s.to_string()));
    pattern.steps = Some(steps.iter().map(|s| s.to_string()).collect());
    pattern.confidence_score = confidence;
    pattern.validation_status = ValidationStatus::Validated;
    pattern.occurrence_count = occurrence_count;
    pattern.positive_feedback_count = (occurrence_count as f32 * confidence) as u64;
    pattern.negative_feedback_count =
        occurrence_count.saturating_sub(pattern.positive_feedback_count);
    pattern.created_at = now;
    pattern.updated_at = now;
    pattern.last_seen = now;
    pattern
}

/// The six built-in seed patterns: problem-solution,
/// debugging, code review, feature development, configuration, and
/// learning exploration.
#[must_use]
pub fn seed_patterns() -> Vec<Pattern> {
    vec![
        seed(
            PatternKind::ProblemSolution,
            "Problem-Solution Cycle",
            "Report a problem, analyze it, propose and implement a fix, then verify it",
            "workflow",
            &["bug", "fix", "problem", "solution", "verify"],
            &[
                "report the problem",
                "analyze root cause",
                "propose a solution",
                "implement the fix",
                "verify the fix",
            ],
            0.82,
            40,
        ),
        seed(
            PatternKind::Debugging,
            "Debugging Session",
            "Investigate a reported failure and implement a verified fix",
            "workflow",
            &["bug", "debug", "investigate", "fix", "verify"],
            &[
                "reproduce the failure",
                "investigate root cause",
                "implement the fix",
                "verify the fix",
            ],
            0.78,
            35,
        ),
        seed(
            PatternKind::CodeEvolution,
            "Code Review",
            "Review a proposed change, request adjustments, and approve",
            "workflow",
            &["review", "pull request", "approve", "feedback", "diff"],
            &[
                "read the proposed change",
                "identify issues or improvements",
                "request changes",
                "approve the change",
            ],
            0.7,
            20,
        ),
        seed(
            PatternKind::Workflow,
            "Feature Development",
            "Plan a feature, implement it incrementally, and verify behavior",
            "workflow",
            &["feature", "implement", "plan", "test", "ship"],
            &[
                "plan the approach",
                "implement incrementally",
                "test the feature",
                "ship the change",
            ],
            0.72,
            25,
        ),
        seed(
            PatternKind::Configuration,
            "Configuration Change",
            "Adjust configuration, validate, and roll out the change",
            "configuration",
            &["config", "settings", "environment", "deploy", "rollout"],
            &[
                "identify the configuration to change",
                "validate the new configuration",
                "roll out the change",
            ],
            0.68,
            15,
        ),
        seed(
            PatternKind::DecisionMaking,
            "Learning Exploration",
            "Explore an unfamiliar area, gather context, and document findings",
            "learning",
            &["explore", "learn", "research", "document", "understand"],
            &[
                "gather context",
                "experiment with the unfamiliar area",
                "document findings",
            ],
            0.6,
            10,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_six_seed_patterns() {
        assert_eq!(seed_patterns().len(), 6);
    }

    #[test]
    fn seed_patterns_are_pre_validated_with_keywords() {
        for pattern in seed_patterns() {
            assert_eq!(pattern.validation_status, ValidationStatus::Validated);
            assert!(!pattern.keywords.is_empty());
            assert!(pattern.steps.as_ref().is_some_and(|s| !s.is_empty()));
        }
    }
}
