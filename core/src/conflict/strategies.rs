//! Dimension-specific resolution-strategy factories.

use std::collections::HashMap;

use crate::conflict::types::{Conflict, ConflictKind, ResolutionStrategy, ResolutionType};

/// Base confidence weight per (dimension, strategy) pair, consulted
/// before the conflict-specific adjustment is applied.
fn base_weight(kind: ConflictKind, strategy_type: ResolutionType) -> f32 {
    match (kind, strategy_type) {
        (ConflictKind::Architectural, ResolutionType::Evolutionary) => 0.7,
        (ConflictKind::Architectural, ResolutionType::ManualReview) => 0.6,
        (ConflictKind::Architectural, ResolutionType::Contextual) => 0.5,
        (ConflictKind::Technical, ResolutionType::AcceptHighestConfidence) => 0.65,
        (ConflictKind::Technical, ResolutionType::Merge) => 0.6,
        (ConflictKind::Technical, ResolutionType::ManualReview) => 0.5,
        (ConflictKind::Temporal, ResolutionType::AcceptLatest) => 0.7,
        (ConflictKind::Temporal, ResolutionType::Contextual) => 0.55,
        (ConflictKind::Outcome, ResolutionType::ManualReview) => 0.65,
        (ConflictKind::Outcome, ResolutionType::AcceptLatest) => 0.5,
        (ConflictKind::Decision, ResolutionType::ManualReview) => 0.65,
        (ConflictKind::Decision, ResolutionType::DomainSpecific) => 0.55,
        (ConflictKind::Methodology, ResolutionType::DomainSpecific) => 0.6,
        (ConflictKind::Methodology, ResolutionType::Contextual) => 0.5,
        (ConflictKind::Pattern, ResolutionType::Merge) => 0.6,
        (ConflictKind::Pattern, ResolutionType::Contextual) => 0.55,
        _ => 0.4,
    }
}

/// Archetypes offered for a given conflict dimension, in priority order.
fn archetypes(kind: ConflictKind) -> &'static [(ResolutionType, &'static str, &'static str)] {
    match kind {
        ConflictKind::Architectural => &[
            (
                ResolutionType::Evolutionary,
                "Evolutionary migration",
                "Treat the divergence as an intentional architecture evolution and migrate forward",
            ),
            (
                ResolutionType::ManualReview,
                "Investigate root cause",
                "Have an architect review both decisions and determine which reflects current intent",
            ),
            (
                ResolutionType::Contextual,
                "Re-evaluate with context",
                "Re-examine both decisions against the repository's current constraints",
            ),
        ],
        ConflictKind::Technical => &[
            (
                ResolutionType::AcceptHighestConfidence,
                "Benchmark and choose",
                "Benchmark both implementations and adopt the one with stronger evidence",
            ),
            (
                ResolutionType::Merge,
                "Merge patterns",
                "Combine the non-conflicting parts of both implementations",
            ),
            (
                ResolutionType::ManualReview,
                "Manual expert review",
                "Escalate to a maintainer familiar with both change paths",
            ),
        ],
        ConflictKind::Temporal => &[
            (
                ResolutionType::AcceptLatest,
                "Accept latest",
                "Trust the more recent chunk as superseding the earlier one",
            ),
            (
                ResolutionType::Contextual,
                "Re-evaluate with context",
                "Check whether intervening changes explain the contradiction",
            ),
        ],
        ConflictKind::Outcome => &[
            (
                ResolutionType::ManualReview,
                "Investigate root cause",
                "Determine why one session reported success and another failure",
            ),
            (
                ResolutionType::AcceptLatest,
                "Accept latest",
                "Trust the more recent outcome report",
            ),
        ],
        ConflictKind::Decision | ConflictKind::Methodology => &[
            (
                ResolutionType::DomainSpecific,
                "Establish standard methodology",
                "Codify one approach as the team standard going forward",
            ),
            (
                ResolutionType::ManualReview,
                "Manual expert review",
                "Have a lead confirm which decision should stand",
            ),
            (
                ResolutionType::Contextual,
                "Re-evaluate with context",
                "Weigh both decisions against current project constraints",
            ),
        ],
        ConflictKind::Pattern => &[
            (
                ResolutionType::Merge,
                "Merge patterns",
                "Combine the compatible aspects of both patterns",
            ),
            (
                ResolutionType::Contextual,
                "Context-based pattern selection",
                "Choose the pattern that fits the current repository's context",
            ),
        ],
    }
}

/// Build the top-N resolution strategies for a conflict.
#[must_use]
pub fn build_strategies(conflict: &Conflict, top_n: usize) -> Vec<ResolutionStrategy> {
    let severity_adjustment = match conflict.severity {
        crate::conflict::types::Severity::Critical => 0.1,
        crate::conflict::types::Severity::High => 0.05,
        crate::conflict::types::Severity::Medium => 0.0,
        crate::conflict::types::Severity::Low | crate::conflict::types::Severity::Info => -0.05,
    };

    let mut strategies: Vec<ResolutionStrategy> = archetypes(conflict.kind)
        .iter()
        .map(|(strategy_type, title, description)| {
            let confidence = (base_weight(conflict.kind, *strategy_type)
                + severity_adjustment
                + (conflict.confidence - 0.5) * 0.2)
                .clamp(0.0, 1.0);
            ResolutionStrategy {
                strategy_type: *strategy_type,
                title: (*title).to_string(),
                description: (*description).to_string(),
                confidence,
                rationale: format!(
                    "derived from a {:?} conflict with severity {:?}",
                    conflict.kind, conflict.severity
                ),
                steps: vec![
                    "review both chunks side by side".to_string(),
                    "apply the recommended strategy".to_string(),
                    "record the resolution outcome".to_string(),
                ],
                risks: vec!["may require stakeholder sign-off".to_string()],
                benefits: vec!["removes the contradictory record from active context".to_string()],
                context: HashMap::new(),
            }
        })
        .collect();

    strategies.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal));
    strategies.truncate(top_n);
    strategies
}
