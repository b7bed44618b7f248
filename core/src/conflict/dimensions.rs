//! Dimension-specific keyword dictionaries and content-similarity
//! helpers shared by the conflict detector.

use std::collections::HashSet;

use crate::chunk::{Chunk, ChunkKind};

pub const ARCHITECTURAL_KEYWORDS: &[&str] = &[
    "architecture", "design pattern", "microservice", "monolith", "layered", "event-driven",
];

pub const TECHNICAL_KEYWORDS: &[&str] =
    &["implementation", "refactor", "bugfix", "optimization", "migration"];

pub const DECISION_KEYWORDS: &[&str] = &["decided", "we will use", "going with", "chosen approach"];

pub const METHODOLOGY_KEYWORDS: &[&str] = &["agile", "scrum", "kanban", "tdd", "waterfall", "ci/cd"];

/// Fixed antonym pairs used by the temporal dimension to recognize a
/// contradiction beyond a plain outcome flip.
pub const ANTONYM_PAIRS: &[(&str, &str)] = &[
    ("works", "doesn't work"),
    ("successful", "failed"),
    ("fixed", "broken"),
    ("stable", "unstable"),
    ("fast", "slow"),
];

/// Jaccard similarity over lowercased tokens.
#[must_use]
pub fn content_similarity(a: &str, b: &str) -> f32 {
    let set_a: HashSet<String> = a.to_lowercase().split_whitespace().map(String::from).collect();
    let set_b: HashSet<String> = b.to_lowercase().split_whitespace().map(String::from).collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f32 / union as f32
}

#[must_use]
pub fn contains_any(content: &str, keywords: &[&str]) -> bool {
    let lower = content.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

#[must_use]
pub fn is_architectural(chunk: &Chunk) -> bool {
    chunk.kind == ChunkKind::ArchitectureDecision || contains_any(&chunk.content, ARCHITECTURAL_KEYWORDS)
}

#[must_use]
pub fn is_technical(chunk: &Chunk) -> bool {
    chunk.kind == ChunkKind::CodeChange
        || chunk.kind == ChunkKind::Solution
        || contains_any(&chunk.content, TECHNICAL_KEYWORDS)
}

#[must_use]
pub fn is_decision(chunk: &Chunk) -> bool {
    contains_any(&chunk.content, DECISION_KEYWORDS)
}

#[must_use]
pub fn is_methodology(chunk: &Chunk) -> bool {
    contains_any(&chunk.content, METHODOLOGY_KEYWORDS)
}

/// Whether two contents contain an antonym pair contradiction, e.g. one
/// says "works" and the other "doesn't work".
#[must_use]
pub fn has_antonym_contradiction(a: &str, b: &str) -> bool {
    let lower_a = a.to_lowercase();
    let lower_b = b.to_lowercase();
    ANTONYM_PAIRS.iter().any(|(pos, neg)| {
        (lower_a.contains(pos) && lower_b.contains(neg)) || (lower_a.contains(neg) && lower_b.contains(pos))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_similarity_is_symmetric() {
        let a = "the jwt validation is fixed now";
        let b = "jwt validation still broken";
        assert!((content_similarity(a, b) - content_similarity(b, a)).abs() < 1e-6);
    }

    #[test]
    fn antonym_contradiction_detects_works_vs_broken() {
        assert!(has_antonym_contradiction(
            "it works now",
            "it's still broken"
        ));
    }
}
