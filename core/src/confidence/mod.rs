//! Chunk confidence scoring: a weighted multi-factor score clamped to
//! `[0,1]` over six factors — user certainty, consistency,
//! corroboration, semantic similarity, temporal proximity, and
//! contextual relevance.

use chrono::{DateTime, Utc};

use crate::chunk::{Chunk, Outcome};

/// Per-factor weights for [`calculate_chunk_confidence`]. Defaults:
/// 0.30/0.25/0.20/0.15/0.05/0.05.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceWeights {
    pub user_certainty: f32,
    pub consistency: f32,
    pub corroboration: f32,
    pub semantic_similarity: f32,
    pub temporal_proximity: f32,
    pub contextual_relevance: f32,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            user_certainty: 0.30,
            consistency: 0.25,
            corroboration: 0.20,
            semantic_similarity: 0.15,
            temporal_proximity: 0.05,
            contextual_relevance: 0.05,
        }
    }
}

/// Configuration for chunk-confidence scoring.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceConfig {
    pub weights: ConfidenceWeights,
    /// Distance, in days, at which temporal proximity bottoms out at 0.1.
    pub max_temporal_distance_days: i64,
    /// Exponential monthly decay rate applied to the raw weighted sum.
    pub decay_rate_per_month: f32,
    /// Minimum tag+session count used in the corroboration denominator.
    pub corroboration_min_count: f32,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            weights: ConfidenceWeights::default(),
            max_temporal_distance_days: 7,
            decay_rate_per_month: 0.05,
            corroboration_min_count: 0.0,
        }
    }
}

/// Breakdown of the factors that contributed to a chunk's confidence,
/// retained for explainability (the Search Explainer cites it).
#[derive(Debug, Clone, Default)]
pub struct ConfidenceBreakdown {
    pub user_certainty: Option<f32>,
    pub consistency: f32,
    pub corroboration: f32,
    pub semantic_similarity: f32,
    pub temporal_proximity: f32,
    pub contextual_relevance: f32,
    pub raw_score: f32,
    pub final_score: f32,
}

fn consistency_score(chunk: &Chunk) -> f32 {
    match chunk.outcome {
        Outcome::Success => 0.8,
        Outcome::InProgress => 0.6,
        Outcome::Failed => 0.4,
        Outcome::Abandoned => 0.3,
    }
}

fn corroboration_score(chunk: &Chunk, config: &ConfidenceConfig) -> f32 {
    let session_bonus = if chunk.session_id.is_empty() { 0.0 } else { 1.0 };
    let numerator = chunk.tags.len() as f32 + session_bonus;
    let denominator = config.corroboration_min_count + 3.0;
    (numerator / denominator).min(1.0)
}

fn semantic_similarity_score(chunk: &Chunk) -> f32 {
    let mut score = 0.5;
    if chunk.content.len() > 200 {
        score += 0.2;
    }
    let lower = chunk.content.to_lowercase();
    if lower.contains("error") || lower.contains("```") || lower.contains("exception") {
        score += 0.2;
    }
    if chunk.summary.as_ref().is_some_and(|s| s.len() >= 20) {
        score += 0.1;
    }
    score.min(1.0)
}

fn temporal_proximity_score(chunk: &Chunk, now: DateTime<Utc>, config: &ConfidenceConfig) -> f32 {
    let distance_days = (now - chunk.timestamp).num_days();
    if distance_days <= 0 {
        return 1.0;
    }
    let max_distance = config.max_temporal_distance_days.max(1) as f32;
    let ratio = (distance_days as f32 / max_distance).min(1.0);
    (1.0 - ratio * 0.9).max(0.1)
}

fn contextual_relevance_score(chunk: &Chunk) -> f32 {
    let mut score = 0.5;
    if !chunk.is_global_repository() {
        score += 0.3;
    }
    if !chunk.files_modified.is_empty() {
        score += 0.1;
    }
    if !chunk.tools_used.is_empty() {
        score += 0.1;
    }
    score.min(1.0)
}

/// Compute a chunk's confidence score: always in `[0, 1]`, and
/// monotonic non-increasing as `now` advances.
#[must_use]
pub fn calculate_chunk_confidence(
    chunk: &Chunk,
    now: DateTime<Utc>,
    config: &ConfidenceConfig,
) -> ConfidenceBreakdown {
    let w = config.weights;
    let user_certainty = chunk.confidence.as_ref().and_then(|c| c.user_certainty);
    let consistency = consistency_score(chunk);
    let corroboration = corroboration_score(chunk, config);
    let semantic_similarity = semantic_similarity_score(chunk);
    let temporal_proximity = temporal_proximity_score(chunk, now, config);
    let contextual_relevance = contextual_relevance_score(chunk);

    let mut weighted_sum = 0.0f32;
    let mut weight_total = 0.0f32;

    if let Some(uc) = user_certainty {
        weighted_sum += uc * w.user_certainty;
        weight_total += w.user_certainty;
    }
    weighted_sum += consistency * w.consistency;
    weight_total += w.consistency;
    weighted_sum += corroboration * w.corroboration;
    weight_total += w.corroboration;
    weighted_sum += semantic_similarity * w.semantic_similarity;
    weight_total += w.semantic_similarity;
    weighted_sum += temporal_proximity * w.temporal_proximity;
    weight_total += w.temporal_proximity;
    weighted_sum += contextual_relevance * w.contextual_relevance;
    weight_total += w.contextual_relevance;

    let raw_score = if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        0.5
    };

    let months_old = (now - chunk.timestamp).num_days() as f32 / 30.0;
    let decay = (-config.decay_rate_per_month * months_old.max(0.0)).exp();
    let final_score = (raw_score * decay).clamp(0.0, 1.0);

    ConfidenceBreakdown {
        user_certainty,
        consistency,
        corroboration,
        semantic_similarity,
        temporal_proximity,
        contextual_relevance,
        raw_score,
        final_score,
    }
}

/// Quality metrics computed alongside confidence: completeness,
/// clarity, relevance decay, freshness score, usage score.
#[derive(Debug, Clone, Default)]
pub struct QualityMetrics {
    pub completeness: f32,
    pub clarity: f32,
    pub usage_score: f32,
}

/// Compute completeness, clarity, and usage-score heuristics for a chunk.
#[must_use]
pub fn calculate_quality_metrics(chunk: &Chunk) -> QualityMetrics {
    let mut completeness = 0.3;
    if chunk.content.len() > 50 {
        completeness += 0.2;
    }
    if chunk.summary.is_some() {
        completeness += 0.2;
    }
    if !chunk.tags.is_empty() {
        completeness += 0.15;
    }
    if !chunk.files_modified.is_empty() {
        completeness += 0.15;
    }
    completeness = completeness.min(1.0);

    let lower = chunk.content.to_lowercase();
    let mut clarity = 0.4;
    if lower.contains("problem") || lower.contains("solution") || lower.contains("because") {
        clarity += 0.3;
    }
    if chunk.content.lines().count() > 1 {
        clarity += 0.2;
    }
    clarity = clarity.min(1.0);

    let usage_score = match (chunk.outcome, chunk.kind) {
        (Outcome::Success, _) => 0.9,
        (Outcome::InProgress, _) => 0.5,
        (Outcome::Failed, _) => 0.3,
        (Outcome::Abandoned, _) => 0.1,
    };

    QualityMetrics {
        completeness,
        clarity,
        usage_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkKind, QualityInfo};
    use std::collections::HashMap;

    fn sample_chunk(days_old: i64) -> Chunk {
        Chunk {
            id: "c1".into(),
            session_id: "s1".into(),
            repository: "acme/widgets".into(),
            content: "there is a bug where login fails because of a nil pointer exception"
                .into(),
            summary: Some("login bug with nil pointer".into()),
            timestamp: Utc::now() - chrono::Duration::days(days_old),
            kind: ChunkKind::Problem,
            outcome: Outcome::InProgress,
            tags: vec!["auth".into(), "bug".into()],
            files_modified: vec!["auth.rs".into()],
            tools_used: vec!["grep".into()],
            quality: Some(QualityInfo::default()),
            confidence: None,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn confidence_is_always_in_unit_interval() {
        for days in [0, 1, 7, 30, 365, 3650] {
            let chunk = sample_chunk(days);
            let breakdown =
                calculate_chunk_confidence(&chunk, Utc::now(), &ConfidenceConfig::default());
            assert!((0.0..=1.0).contains(&breakdown.final_score));
        }
    }

    #[test]
    fn decay_is_monotonic_non_increasing_in_now() {
        let chunk = sample_chunk(30);
        let config = ConfidenceConfig::default();
        let earlier = calculate_chunk_confidence(&chunk, chunk.timestamp, &config).final_score;
        let later =
            calculate_chunk_confidence(&chunk, chunk.timestamp + chrono::Duration::days(60), &config)
                .final_score;
        assert!(later <= earlier + 1e-6);
    }

    #[test]
    fn defaults_to_half_when_no_factors_contribute() {
        let config = ConfidenceConfig {
            weights: ConfidenceWeights {
                user_certainty: 0.0,
                consistency: 0.0,
                corroboration: 0.0,
                semantic_similarity: 0.0,
                temporal_proximity: 0.0,
                contextual_relevance: 0.0,
            },
            ..ConfidenceConfig::default()
        };
        let chunk = sample_chunk(0);
        let breakdown = calculate_chunk_confidence(&chunk, chunk.timestamp, &config);
        assert!((breakdown.raw_score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn quality_metrics_reward_structured_content() {
        let chunk = sample_chunk(0);
        let metrics = calculate_quality_metrics(&chunk);
        assert!(metrics.completeness > 0.5);
        assert!(metrics.clarity > 0.5);
    }
}
