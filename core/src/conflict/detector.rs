//! Pairwise conflict scan across six dimensions.

use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::chunk::Chunk;
use crate::conflict::dimensions::{
    content_similarity, has_antonym_contradiction, is_architectural, is_decision, is_methodology,
    is_technical,
};
use crate::conflict::types::{Conflict, ConflictKind, ConflictPoint, ConflictReport, Severity};

/// Tuning constants for conflict detection.
#[derive(Debug, Clone)]
pub struct ConflictDetectorConfig {
    pub min_confidence: f32,
    pub max_time_difference_days: i64,
    pub architectural_similarity_threshold: f32,
    pub technical_similarity_threshold: f32,
    pub temporal_similarity_threshold: f32,
    pub outcome_similarity_threshold: f32,
}

impl Default for ConflictDetectorConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            max_time_difference_days: 180,
            architectural_similarity_threshold: 0.3,
            technical_similarity_threshold: 0.3,
            temporal_similarity_threshold: 0.4,
            outcome_similarity_threshold: 0.5,
        }
    }
}

/// Scan an ordered chunk slice and report pairwise conflicts across all
/// six dimensions. Short-circuits with an empty report for fewer than
/// two chunks.
///
/// Same-session pairs never conflict — they are treated as evolution
/// within one continuous train of thought.
#[must_use]
#[tracing::instrument(skip(chunks, config))]
pub fn detect_conflicts(chunks: &[Chunk], config: &ConflictDetectorConfig) -> ConflictReport {
    let started = Instant::now();
    if chunks.len() < 2 {
        return ConflictReport {
            total_chunks: chunks.len(),
            conflicts_found: 0,
            conflicts: Vec::new(),
            processing_time_micros: started.elapsed().as_micros() as u64,
        };
    }

    let mut conflicts = Vec::new();
    let sorted_by_time: Vec<&Chunk> = {
        let mut v: Vec<&Chunk> = chunks.iter().collect();
        v.sort_by_key(|c| c.timestamp);
        v
    };

    for i in 0..chunks.len() {
        for j in (i + 1)..chunks.len() {
            let a = &chunks[i];
            let b = &chunks[j];
            if a.session_id == b.session_id {
                continue;
            }

            if is_architectural(a) && is_architectural(b) {
                try_push(&mut conflicts, a, b, ConflictKind::Architectural, config, architectural_points);
            }
            if is_technical(a) && is_technical(b) {
                try_push(&mut conflicts, a, b, ConflictKind::Technical, config, technical_points);
            }
            if a.outcome != b.outcome {
                try_push_outcome(&mut conflicts, a, b, config);
            }
            if is_decision(a) && is_decision(b) {
                try_push(&mut conflicts, a, b, ConflictKind::Decision, config, decision_points);
            }
            if is_methodology(a) && is_methodology(b) {
                try_push(&mut conflicts, a, b, ConflictKind::Methodology, config, methodology_points);
            }
        }
    }

    // All pairs within the cutoff, not just time-adjacent neighbors: a
    // chunk sitting between two temporally contradicting chunks must not
    // hide their conflict.
    for i in 0..sorted_by_time.len() {
        for j in (i + 1)..sorted_by_time.len() {
            let (a, b) = (sorted_by_time[i], sorted_by_time[j]);
            let days = (b.timestamp - a.timestamp).num_days().abs();
            if days > config.max_time_difference_days {
                break;
            }
            if a.session_id == b.session_id {
                continue;
            }
            let similarity = content_similarity(&a.content, &b.content);
            if similarity < config.temporal_similarity_threshold {
                continue;
            }
            let contradicts =
                a.outcome != b.outcome || has_antonym_contradiction(&a.content, &b.content);
            if !contradicts {
                continue;
            }
            let points = vec![ConflictPoint {
                aspect: "temporal contradiction".into(),
                primary: a.content.clone(),
                conflicting: b.content.clone(),
                confidence: 0.7,
            }];
            push_conflict(&mut conflicts, a, b, ConflictKind::Temporal, similarity, points, days, config);
        }
    }

    conflicts.retain(|c| c.confidence >= config.min_confidence);
    conflicts.sort_by(|a, b| {
        b.severity
            .weight()
            .cmp(&a.severity.weight())
            .then(b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal))
    });

    ConflictReport {
        total_chunks: chunks.len(),
        conflicts_found: conflicts.len(),
        conflicts,
        processing_time_micros: started.elapsed().as_micros() as u64,
    }
}

fn try_push(
    conflicts: &mut Vec<Conflict>,
    a: &Chunk,
    b: &Chunk,
    kind: ConflictKind,
    config: &ConflictDetectorConfig,
    points_fn: fn(&Chunk, &Chunk) -> Vec<ConflictPoint>,
) {
    let threshold = match kind {
        ConflictKind::Architectural => config.architectural_similarity_threshold,
        ConflictKind::Technical => config.technical_similarity_threshold,
        _ => config.technical_similarity_threshold,
    };
    let similarity = content_similarity(&a.content, &b.content);
    if similarity < threshold {
        return;
    }
    let points = points_fn(a, b);
    if points.is_empty() {
        return;
    }
    let days = (b.timestamp - a.timestamp).num_days().abs();
    push_conflict(conflicts, a, b, kind, similarity, points, days, config);
}

fn try_push_outcome(conflicts: &mut Vec<Conflict>, a: &Chunk, b: &Chunk, config: &ConflictDetectorConfig) {
    let similarity = content_similarity(&a.content, &b.content);
    if similarity < config.outcome_similarity_threshold {
        return;
    }
    let points = vec![ConflictPoint {
        aspect: "outcome".into(),
        primary: format!("{:?}", a.outcome),
        conflicting: format!("{:?}", b.outcome),
        confidence: 0.8,
    }];
    let days = (b.timestamp - a.timestamp).num_days().abs();
    push_conflict(conflicts, a, b, ConflictKind::Outcome, similarity, points, days, config);
}

fn push_conflict(
    conflicts: &mut Vec<Conflict>,
    a: &Chunk,
    b: &Chunk,
    kind: ConflictKind,
    similarity: f32,
    points: Vec<ConflictPoint>,
    days: i64,
    _config: &ConflictDetectorConfig,
) {
    let mean_point_confidence =
        points.iter().map(|p| p.confidence).sum::<f32>() / points.len().max(1) as f32;
    let confidence = (0.3 * similarity + 0.7 * mean_point_confidence).clamp(0.0, 1.0);
    let severity = derive_severity(kind, points.len(), days, a, b);

    conflicts.push(Conflict {
        id: Uuid::new_v4(),
        kind,
        severity,
        title: format!("{kind:?} conflict between chunks"),
        description: format!(
            "chunk {} and chunk {} diverge on {kind:?}",
            a.id, b.id
        ),
        confidence,
        primary_chunk_id: a.id.clone(),
        conflicting_chunk_id: b.id.clone(),
        related_chunk_ids: Vec::new(),
        points,
        evidence: vec![(a.content.clone(), b.content.clone())],
        context: std::collections::HashMap::new(),
        time_difference_days: days,
        detected_at: Utc::now(),
        resolution_type: None,
        resolution_note: None,
    });
}

fn derive_severity(kind: ConflictKind, point_count: usize, days: i64, a: &Chunk, b: &Chunk) -> Severity {
    match kind {
        ConflictKind::Architectural => {
            if point_count >= 3 {
                Severity::Critical
            } else if point_count == 2 {
                Severity::High
            } else {
                Severity::Medium
            }
        }
        ConflictKind::Temporal => {
            if days > 120 {
                Severity::Low
            } else if days > 30 {
                Severity::Medium
            } else {
                Severity::High
            }
        }
        ConflictKind::Outcome => {
            use crate::chunk::Outcome;
            if matches!(
                (a.outcome, b.outcome),
                (Outcome::Success, Outcome::Failed) | (Outcome::Failed, Outcome::Success)
            ) {
                Severity::High
            } else {
                Severity::Medium
            }
        }
        ConflictKind::Technical | ConflictKind::Decision | ConflictKind::Methodology => Severity::Medium,
        ConflictKind::Pattern => Severity::Low,
    }
}

fn architectural_points(a: &Chunk, b: &Chunk) -> Vec<ConflictPoint> {
    generic_points(a, b, "architecture")
}

fn technical_points(a: &Chunk, b: &Chunk) -> Vec<ConflictPoint> {
    generic_points(a, b, "implementation")
}

fn decision_points(a: &Chunk, b: &Chunk) -> Vec<ConflictPoint> {
    generic_points(a, b, "decision")
}

fn methodology_points(a: &Chunk, b: &Chunk) -> Vec<ConflictPoint> {
    generic_points(a, b, "methodology")
}

fn generic_points(a: &Chunk, b: &Chunk, aspect: &str) -> Vec<ConflictPoint> {
    if a.content.trim().is_empty() || b.content.trim().is_empty() {
        return Vec::new();
    }
    vec![ConflictPoint {
        aspect: aspect.to_string(),
        primary: a.content.clone(),
        conflicting: b.content.clone(),
        confidence: 0.65,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkKind, Outcome};
    use std::collections::HashMap;

    fn chunk(id: &str, session: &str, kind: ChunkKind, outcome: Outcome, content: &str) -> Chunk {
        chunk_at(id, session, kind, outcome, content, Utc::now())
    }

    fn chunk_at(
        id: &str,
        session: &str,
        kind: ChunkKind,
        outcome: Outcome,
        content: &str,
        timestamp: chrono::DateTime<Utc>,
    ) -> Chunk {
        Chunk {
            id: id.into(),
            session_id: session.into(),
            repository: "repo".into(),
            content: content.into(),
            summary: None,
            timestamp,
            kind,
            outcome,
            tags: vec![],
            files_modified: vec![],
            tools_used: vec![],
            quality: None,
            confidence: None,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn fewer_than_two_chunks_short_circuits() {
        let report = detect_conflicts(&[], &ConflictDetectorConfig::default());
        assert_eq!(report.conflicts_found, 0);
    }

    #[test]
    fn scenario_s2_outcome_conflict() {
        let chunks = vec![
            chunk(
                "a",
                "s1",
                ChunkKind::CodeChange,
                Outcome::Success,
                "the jwt validation passed successfully in the login flow",
            ),
            chunk(
                "b",
                "s2",
                ChunkKind::CodeChange,
                Outcome::Failed,
                "the jwt validation failed in the login flow",
            ),
        ];
        let report = detect_conflicts(&chunks, &ConflictDetectorConfig::default());
        assert!(report
            .conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::Outcome && c.severity == Severity::High && c.confidence >= 0.6));
    }

    #[test]
    fn scenario_s3_same_session_has_no_conflicts() {
        let chunks = vec![
            chunk(
                "a",
                "s1",
                ChunkKind::CodeChange,
                Outcome::Success,
                "the jwt validation passed successfully in the login flow",
            ),
            chunk(
                "b",
                "s1",
                ChunkKind::CodeChange,
                Outcome::Failed,
                "the jwt validation failed in the login flow",
            ),
        ];
        let report = detect_conflicts(&chunks, &ConflictDetectorConfig::default());
        assert_eq!(report.conflicts_found, 0);
    }

    #[test]
    fn temporal_conflict_is_found_across_a_non_adjacent_middle_chunk() {
        let now = Utc::now();
        let a = chunk_at(
            "a",
            "s1",
            ChunkKind::Solution,
            Outcome::Success,
            "the jwt validation passed successfully in the login flow",
            now - chrono::Duration::days(120),
        );
        // Sits chronologically between a and c, but on an unrelated
        // topic, so it never itself conflicts with either neighbor.
        let b = chunk_at(
            "b",
            "s2",
            ChunkKind::Discussion,
            Outcome::Success,
            "updated the marketing site footer copy",
            now - chrono::Duration::days(60),
        );
        let c = chunk_at(
            "c",
            "s3",
            ChunkKind::Solution,
            Outcome::Failed,
            "the jwt validation failed in the login flow",
            now,
        );
        let report = detect_conflicts(&[a, b, c], &ConflictDetectorConfig::default());
        assert!(
            report
                .conflicts
                .iter()
                .any(|conflict| conflict.kind == ConflictKind::Temporal
                    && ((conflict.primary_chunk_id == "a" && conflict.conflicting_chunk_id == "c")
                        || (conflict.primary_chunk_id == "c" && conflict.conflicting_chunk_id == "a"))),
            "expected a temporal conflict between the non-adjacent a/c pair, got {:?}",
            report.conflicts
        );
    }

    #[test]
    fn detection_is_stable_across_reruns() {
        let chunks = vec![
            chunk(
                "a",
                "s1",
                ChunkKind::CodeChange,
                Outcome::Success,
                "the jwt validation passed successfully in the login flow",
            ),
            chunk(
                "b",
                "s2",
                ChunkKind::CodeChange,
                Outcome::Failed,
                "the jwt validation failed in the login flow",
            ),
        ];
        let config = ConflictDetectorConfig::default();
        let first = detect_conflicts(&chunks, &config);
        let second = detect_conflicts(&chunks, &config);
        assert_eq!(first.conflicts_found, second.conflicts_found);
        assert_eq!(
            first.conflicts.iter().map(|c| c.kind).collect::<Vec<_>>(),
            second.conflicts.iter().map(|c| c.kind).collect::<Vec<_>>()
        );
    }
}
