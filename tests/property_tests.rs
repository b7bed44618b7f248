//! Universal invariants 1 and 4 from the design document: chunk
//! confidence stays in `[0, 1]` and decays monotonically with `now`;
//! cosine similarity and repository similarity are symmetric.

use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use memory_intel_core::chunk::{Chunk, ChunkKind, Outcome};
use memory_intel_core::collaborators::embeddings::cosine_similarity;
use memory_intel_core::confidence::{calculate_chunk_confidence, ConfidenceConfig};
use memory_intel_core::multi_repo::{repository_similarity, RepositoryContext};
use proptest::prelude::*;

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Success),
        Just(Outcome::Failed),
        Just(Outcome::InProgress),
        Just(Outcome::Abandoned),
    ]
}

fn arb_chunk_kind() -> impl Strategy<Value = ChunkKind> {
    prop_oneof![
        Just(ChunkKind::Problem),
        Just(ChunkKind::Solution),
        Just(ChunkKind::ArchitectureDecision),
        Just(ChunkKind::CodeChange),
        Just(ChunkKind::Discussion),
    ]
}

prop_compose! {
    fn arb_chunk()(
        content in "[a-z ]{0,200}",
        kind in arb_chunk_kind(),
        outcome in arb_outcome(),
        days_old in 0i64..400,
        tag_count in 0usize..5,
        repository in prop_oneof![Just(String::new()), Just("acme/widgets".to_string())],
    ) -> Chunk {
        Chunk {
            id: "c".to_string(),
            session_id: "s".to_string(),
            repository,
            content,
            summary: None,
            timestamp: Utc::now() - Duration::days(days_old),
            kind,
            outcome,
            tags: (0..tag_count).map(|i| format!("tag{i}")).collect(),
            files_modified: Vec::new(),
            tools_used: Vec::new(),
            quality: None,
            confidence: None,
            metadata: HashMap::new(),
        }
    }
}

proptest! {
    #[test]
    fn chunk_confidence_stays_in_unit_interval(chunk in arb_chunk()) {
        let config = ConfidenceConfig::default();
        let now = Utc::now();
        let breakdown = calculate_chunk_confidence(&chunk, now, &config);
        prop_assert!(breakdown.final_score >= 0.0 && breakdown.final_score <= 1.0);
    }

    #[test]
    fn chunk_confidence_decays_as_now_advances(chunk in arb_chunk(), extra_days in 1i64..100) {
        let config = ConfidenceConfig::default();
        let now = Utc.timestamp_opt(chunk.timestamp.timestamp() + 1_000_000, 0).unwrap();
        let later = now + Duration::days(extra_days);

        let at_now = calculate_chunk_confidence(&chunk, now, &config);
        let at_later = calculate_chunk_confidence(&chunk, later, &config);

        // The raw weighted sum is unaffected by `now` except through
        // temporal proximity and the exponential decay factor applied on
        // top of it; both only ever shrink the score as `now` advances.
        prop_assert!(at_later.final_score <= at_now.final_score + 1e-6);
    }
}

proptest! {
    #[test]
    fn cosine_similarity_is_symmetric(
        u in prop::collection::vec(-10.0f32..10.0, 3..8),
        v in prop::collection::vec(-10.0f32..10.0, 3..8),
    ) {
        prop_assume!(u.len() == v.len());
        let forward = cosine_similarity(&u, &v);
        let backward = cosine_similarity(&v, &u);
        prop_assert!((forward - backward).abs() < 1e-5);
    }
}

prop_compose! {
    fn arb_repository(id: &'static str)(
        tech in prop::collection::vec("[a-z]{2,8}", 0..4),
        framework in prop::option::of("[a-z]{2,8}"),
        language in prop::option::of("[a-z]{2,8}"),
    ) -> RepositoryContext {
        let mut ctx = RepositoryContext::new(id);
        ctx.tech_stack = tech;
        ctx.framework = framework;
        ctx.language = language;
        ctx
    }
}

proptest! {
    #[test]
    fn repository_similarity_is_symmetric(a in arb_repository("repo-a"), b in arb_repository("repo-b")) {
        let forward = repository_similarity(&a, &b);
        let backward = repository_similarity(&b, &a);
        prop_assert!((forward - backward).abs() < 1e-5);
    }
}
