//! Shared fixtures and builders for testing the memory intelligence
//! core: chunk/pattern/repository builders plus convenience sequences
//! for the end-to-end scenarios named in the design document (S1-S6).

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use memory_intel_core::chunk::{Chunk, ChunkKind, ConfidenceInfo, Outcome, QualityInfo};
use memory_intel_core::multi_repo::RepositoryContext;
use memory_intel_core::pattern::{Pattern, PatternKind};
use uuid::Uuid;

/// Build a minimal chunk with sensible defaults, overridable via the
/// builder-style setters below. Mirrors the teacher's
/// `create_test_episode`/`create_test_episode_with_context` shape.
#[must_use]
pub fn test_chunk(content: &str, kind: ChunkKind, outcome: Outcome) -> Chunk {
    Chunk {
        id: Uuid::new_v4().to_string(),
        session_id: format!("session-{}", Uuid::new_v4()),
        repository: "acme/widgets".to_string(),
        content: content.to_string(),
        summary: None,
        timestamp: Utc::now(),
        kind,
        outcome,
        tags: Vec::new(),
        files_modified: Vec::new(),
        tools_used: Vec::new(),
        quality: None,
        confidence: None,
        metadata: HashMap::new(),
    }
}

/// A test chunk with an explicit repository, session, and timestamp —
/// the knobs needed by conflict-detection and multi-repo tests.
#[must_use]
pub fn test_chunk_in(
    content: &str,
    kind: ChunkKind,
    outcome: Outcome,
    repository: &str,
    session_id: &str,
    timestamp: DateTime<Utc>,
) -> Chunk {
    let mut chunk = test_chunk(content, kind, outcome);
    chunk.repository = repository.to_string();
    chunk.session_id = session_id.to_string();
    chunk.timestamp = timestamp;
    chunk
}

/// Attach a quality sub-record to a chunk, builder-style.
#[must_use]
pub fn with_quality(mut chunk: Chunk, completeness: f32, clarity: f32) -> Chunk {
    chunk.quality = Some(QualityInfo {
        completeness: Some(completeness),
        clarity: Some(clarity),
        usage_score: None,
    });
    chunk
}

/// Attach an explicit user-certainty confidence sub-record to a chunk.
#[must_use]
pub fn with_user_certainty(mut chunk: Chunk, certainty: f32) -> Chunk {
    chunk.confidence = Some(ConfidenceInfo {
        score: None,
        user_certainty: Some(certainty),
    });
    chunk
}

/// Age a chunk by `days`, relative to its own timestamp.
#[must_use]
pub fn aged_by_days(mut chunk: Chunk, days: i64) -> Chunk {
    chunk.timestamp -= Duration::days(days);
    chunk
}

/// Build the four-chunk problem→solution sequence used by scenario S1:
/// a reported bug, an analysis step, a solution, and a verification,
/// all in the same session, five minutes apart.
#[must_use]
pub fn problem_solution_sequence() -> Vec<Chunk> {
    let session = format!("session-{}", Uuid::new_v4());
    let base = Utc::now() - Duration::hours(1);
    vec![
        test_chunk_in(
            "there is a bug where login fails",
            ChunkKind::Problem,
            Outcome::InProgress,
            "acme/widgets",
            &session,
            base,
        ),
        test_chunk_in(
            "looking into it",
            ChunkKind::Analysis,
            Outcome::InProgress,
            "acme/widgets",
            &session,
            base + Duration::minutes(5),
        ),
        test_chunk_in(
            "add nil check in auth()",
            ChunkKind::Solution,
            Outcome::InProgress,
            "acme/widgets",
            &session,
            base + Duration::minutes(10),
        ),
        test_chunk_in(
            "verified, login works",
            ChunkKind::Verification,
            Outcome::Success,
            "acme/widgets",
            &session,
            base + Duration::minutes(15),
        ),
    ]
}

/// A pair of chunks in distinct sessions, same repository, that
/// disagree on outcome over near-identical content — scenario S2.
#[must_use]
pub fn conflicting_outcome_pair() -> (Chunk, Chunk) {
    let now = Utc::now();
    let a = test_chunk_in(
        "fixed the JWT validation",
        ChunkKind::Solution,
        Outcome::Success,
        "acme/widgets",
        "session-a",
        now,
    );
    let b = test_chunk_in(
        "JWT validation still broken",
        ChunkKind::Solution,
        Outcome::Failed,
        "acme/widgets",
        "session-b",
        now + Duration::hours(2),
    );
    (a, b)
}

/// The same content pair as [`conflicting_outcome_pair`] but within one
/// session — scenario S3, expected to be exempt as same-session
/// evolution rather than a conflict.
#[must_use]
pub fn same_session_outcome_pair() -> (Chunk, Chunk) {
    let now = Utc::now();
    let session = "session-shared".to_string();
    let a = test_chunk_in(
        "fixed the JWT validation",
        ChunkKind::Solution,
        Outcome::Success,
        "acme/widgets",
        &session,
        now,
    );
    let b = test_chunk_in(
        "JWT validation still broken",
        ChunkKind::Solution,
        Outcome::Failed,
        "acme/widgets",
        &session,
        now + Duration::hours(2),
    );
    (a, b)
}

/// A 120-day-old Node.js-flavoured solution chunk with no refresh
/// metadata — scenario S4.
#[must_use]
pub fn stale_node_chunk() -> Chunk {
    let chunk = test_chunk(
        "upgraded the node.js dependency and shipped the fix",
        ChunkKind::Solution,
        Outcome::Success,
    );
    aged_by_days(chunk, 120)
}

/// Build a minimal, pre-validated pattern for tests that need one
/// without going through the pattern engine's learn pipeline.
#[must_use]
pub fn test_pattern(kind: PatternKind, name: &str, keywords: &[&str]) -> Pattern {
    let mut pattern = Pattern::new(kind, name, format!("{name} description"));
    pattern.set_keywords(keywords.iter().map(|s| (*s).to_string()));
    pattern
}

/// A minimal repository context with a tech stack and common-pattern
/// list, for multi-repo engine tests.
#[must_use]
pub fn test_repository(id: &str, tech_stack: &[&str], common_patterns: &[&str]) -> RepositoryContext {
    let mut ctx = RepositoryContext::new(id);
    ctx.tech_stack = tech_stack.iter().map(|s| (*s).to_string()).collect();
    ctx.common_patterns = common_patterns.iter().map(|s| (*s).to_string()).collect();
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_solution_sequence_has_four_ordered_chunks() {
        let chunks = problem_solution_sequence();
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].kind, ChunkKind::Problem);
        assert_eq!(chunks[3].kind, ChunkKind::Verification);
        assert!(chunks.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn same_session_pair_shares_one_session_id() {
        let (a, b) = same_session_outcome_pair();
        assert_eq!(a.session_id, b.session_id);
    }

    #[test]
    fn conflicting_pair_uses_distinct_sessions() {
        let (a, b) = conflicting_outcome_pair();
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn stale_node_chunk_is_120_days_old() {
        let chunk = stale_node_chunk();
        assert_eq!(chunk.days_old(Utc::now()), 120);
    }
}
