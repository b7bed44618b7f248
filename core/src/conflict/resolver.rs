//! `resolve_conflicts`: turn detected conflicts into resolution
//! recommendations.

use std::collections::HashMap;

use chrono::{Duration, Utc};

use crate::chunk::Chunk;
use crate::conflict::strategies::build_strategies;
use crate::conflict::types::{Conflict, ConflictKind, ResolutionRecommendation, Severity};

/// Number of candidate strategies offered per conflict.
pub const DEFAULT_TOP_N_STRATEGIES: usize = 3;

/// Produce one [`ResolutionRecommendation`] per conflict. `lookup`
/// resolves a chunk id back to its chunk for repository/file context.
#[must_use]
pub fn resolve_conflicts(
    conflicts: &[Conflict],
    lookup: impl Fn(&str) -> Option<Chunk>,
) -> Vec<ResolutionRecommendation> {
    conflicts
        .iter()
        .map(|conflict| resolve_one(conflict, &lookup))
        .collect()
}

fn resolve_one(conflict: &Conflict, lookup: &impl Fn(&str) -> Option<Chunk>) -> ResolutionRecommendation {
    let strategies = build_strategies(conflict, DEFAULT_TOP_N_STRATEGIES);
    let recommended = strategies
        .first()
        .cloned()
        .unwrap_or_else(|| fallback_strategy(conflict));

    let primary = lookup(&conflict.primary_chunk_id);
    let conflicting = lookup(&conflict.conflicting_chunk_id);

    let repository = primary
        .as_ref()
        .map(|c| c.repository.clone())
        .unwrap_or_default();

    let mut affected_files: Vec<String> = Vec::new();
    for chunk in [&primary, &conflicting].into_iter().flatten() {
        for file in &chunk.files_modified {
            if !affected_files.contains(file) {
                affected_files.push(file.clone());
            }
        }
    }

    let stakeholder_impact = stakeholder_impact_map(conflict.kind, conflict.severity);

    let mut technical_context = HashMap::new();
    technical_context.insert("primary_chunk_id".to_string(), conflict.primary_chunk_id.clone());
    technical_context.insert(
        "conflicting_chunk_id".to_string(),
        conflict.conflicting_chunk_id.clone(),
    );

    ResolutionRecommendation {
        conflict_id: conflict.id,
        strategies,
        recommended,
        repository,
        affected_files,
        stakeholder_impact,
        technical_context,
        valid_until: Utc::now() + Duration::days(7),
    }
}

fn stakeholder_impact_map(kind: ConflictKind, severity: Severity) -> HashMap<String, Severity> {
    let mut map = HashMap::new();
    match kind {
        ConflictKind::Architectural => {
            map.insert("architect".to_string(), severity);
            map.insert("tech_lead".to_string(), severity);
        }
        ConflictKind::Technical => {
            map.insert("engineer".to_string(), severity);
        }
        ConflictKind::Temporal | ConflictKind::Outcome => {
            map.insert("maintainer".to_string(), severity);
        }
        ConflictKind::Decision => {
            map.insert("product_owner".to_string(), severity);
        }
        ConflictKind::Methodology => {
            map.insert("team_lead".to_string(), severity);
        }
        ConflictKind::Pattern => {
            map.insert("engineer".to_string(), severity);
        }
    }
    map
}

fn fallback_strategy(conflict: &Conflict) -> crate::conflict::types::ResolutionStrategy {
    crate::conflict::types::ResolutionStrategy {
        strategy_type: crate::conflict::types::ResolutionType::ManualReview,
        title: "Manual review".to_string(),
        description: "No automated strategy matched; escalate for manual review".to_string(),
        confidence: 0.3,
        rationale: format!("no archetype matched {:?}", conflict.kind),
        steps: vec!["escalate to a maintainer".to_string()],
        risks: vec![],
        benefits: vec![],
        context: HashMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::types::ConflictPoint;
    use uuid::Uuid;

    fn sample_conflict() -> Conflict {
        Conflict {
            id: Uuid::new_v4(),
            kind: ConflictKind::Outcome,
            severity: Severity::High,
            title: "t".into(),
            description: "d".into(),
            confidence: 0.75,
            primary_chunk_id: "a".into(),
            conflicting_chunk_id: "b".into(),
            related_chunk_ids: vec![],
            points: vec![ConflictPoint {
                aspect: "outcome".into(),
                primary: "success".into(),
                conflicting: "failed".into(),
                confidence: 0.8,
            }],
            evidence: vec![],
            context: HashMap::new(),
            time_difference_days: 1,
            detected_at: Utc::now(),
            resolution_type: None,
            resolution_note: None,
        }
    }

    #[test]
    fn recommendation_carries_seven_day_validity() {
        let conflict = sample_conflict();
        let recs = resolve_conflicts(&[conflict], |_| None);
        let rec = &recs[0];
        let expected_min = Utc::now() + Duration::days(6) + Duration::hours(23);
        assert!(rec.valid_until > expected_min);
    }

    #[test]
    fn recommended_strategy_is_the_top_confidence_one() {
        let conflict = sample_conflict();
        let recs = resolve_conflicts(&[conflict], |_| None);
        let rec = &recs[0];
        assert_eq!(rec.recommended.confidence, rec.strategies[0].confidence);
    }
}
