//! `explained_search`: relevance-score, cite, and contextualize a set
//! of candidate chunks against a query.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::chunk::{Chunk, ChunkKind, Outcome};
use crate::collaborators::embeddings::{cosine_similarity, Embeddings};
use crate::collaborators::storage::{ChunkRelationship, RelationshipQuery, Storage};
use crate::error::Result;
use crate::extraction;
use crate::search::citations::{alphabetic_id, render_citation};
use crate::search::types::{Citation, ExplainedResult, ExplainedSearch, ResultContext, SearchConfig};

/// Run an explained search over `candidates`, scoring each against
/// `query` and enriching the top results with citations and context.
///
/// # Errors
/// Propagates collaborator errors from `embeddings` or `storage`.
pub async fn explained_search(
    query: &str,
    candidates: Vec<Chunk>,
    embeddings: Option<&dyn Embeddings>,
    storage: Option<&dyn Storage>,
    config: &SearchConfig,
) -> Result<ExplainedSearch> {
    if candidates.is_empty() {
        return Ok(ExplainedSearch {
            results: Vec::new(),
            citations: HashMap::new(),
            explanation: format!("no candidates matched \"{query}\""),
        });
    }

    let query_embedding = match embeddings {
        Some(e) => e.generate(query).await.ok(),
        None => None,
    };
    let query_tokens = tokenize(query);

    // Snapshot (id, repository, timestamp) for every candidate before
    // consuming the list, so temporal context can look around the
    // whole candidate set rather than just one result's relationships.
    let siblings: Vec<(String, String, DateTime<Utc>)> = candidates
        .iter()
        .map(|c| (c.id.clone(), c.repository.clone(), c.timestamp))
        .collect();

    let mut scored: Vec<(Chunk, ScoredFactors)> = Vec::new();
    for chunk in candidates {
        let chunk_embedding = match (embeddings, &query_embedding) {
            (Some(e), Some(_)) => e.generate(&chunk.content).await.ok(),
            _ => None,
        };
        let factors = score_chunk(
            &chunk,
            query,
            &query_tokens,
            query_embedding.as_deref(),
            chunk_embedding.as_deref(),
        );
        scored.push((chunk, factors));
    }
    scored.sort_by(|a, b| {
        b.1.overall_score
            .partial_cmp(&a.1.overall_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(config.limit);

    let mut results = Vec::new();
    let mut citations = HashMap::new();

    for (index, (chunk, factors)) in scored.into_iter().enumerate() {
        let citation_id = if config.citations_enabled {
            let id = alphabetic_id(index);
            let citation: Citation = render_citation(
                &id,
                &chunk,
                factors.overall_score,
                config.citation_style,
                config.custom_template.as_deref(),
            );
            citations.insert(id.clone(), citation);
            Some(id)
        } else {
            None
        };

        let mut context = if let Some(storage) = storage {
            build_context(&chunk, storage).await
        } else {
            ResultContext::default()
        };
        context.temporal_context = find_temporal_context(&chunk, &siblings, config);
        let matched_concepts = matched_concepts(&chunk);

        results.push(ExplainedResult {
            semantic: factors.semantic,
            keyword_density: factors.keyword_density,
            recency: factors.recency,
            usage: factors.usage,
            confidence: factors.confidence,
            quality: factors.quality,
            overall_score: factors.overall_score,
            matched_concepts,
            explanation: factors.explanation.clone(),
            citation_id,
            context,
            chunk,
        });
    }

    let explanation = format!(
        "{} result(s) matched \"{query}\", ranked by semantic similarity, keyword density, recency, usage, confidence, and quality",
        results.len()
    );

    Ok(ExplainedSearch {
        results,
        citations,
        explanation,
    })
}

struct ScoredFactors {
    semantic: f32,
    keyword_density: f32,
    recency: f32,
    usage: f32,
    confidence: f32,
    quality: f32,
    overall_score: f32,
    explanation: String,
}

fn score_chunk(
    chunk: &Chunk,
    query: &str,
    query_tokens: &HashSet<String>,
    query_embedding: Option<&[f32]>,
    chunk_embedding: Option<&[f32]>,
) -> ScoredFactors {
    let content_tokens = tokenize(&chunk.content);
    let matched: Vec<&String> = query_tokens.intersection(&content_tokens).collect();
    let keyword_density = if query_tokens.is_empty() {
        0.0
    } else {
        matched.len() as f32 / query_tokens.len() as f32
    };

    // Word overlap is the documented proxy; when both embeddings are
    // available cosine similarity sharpens it rather than replacing it.
    let word_score = word_overlap(query_tokens, &content_tokens);
    let semantic = match (query_embedding, chunk_embedding) {
        (Some(q), Some(c)) => (cosine_similarity(q, c) + word_score) / 2.0,
        _ => word_score,
    };

    let now = chrono::Utc::now();
    let days_old = chunk.days_old(now);
    let recency = if days_old < 1 {
        0.3
    } else if days_old < 7 {
        0.2
    } else if days_old < 30 {
        0.1
    } else {
        0.0
    };

    let mut usage: f32 = 0.0;
    if chunk.outcome == Outcome::Success {
        usage += 0.2;
    }
    if matches!(chunk.kind, ChunkKind::Solution | ChunkKind::ArchitectureDecision) {
        usage += 0.1;
    }

    let confidence = chunk.confidence.as_ref().and_then(|c| c.score).unwrap_or(0.5);
    let quality = chunk
        .quality
        .as_ref()
        .map(|q| {
            let completeness = q.completeness.unwrap_or(0.5);
            let clarity = q.clarity.unwrap_or(0.5);
            (completeness + clarity) / 2.0
        })
        .unwrap_or(0.5);

    let overall_score = 0.40 * semantic
        + 0.20 * keyword_density
        + 0.15 * recency
        + 0.10 * usage
        + 0.10 * confidence
        + 0.05 * quality;

    let matched_words: Vec<String> = matched.iter().map(|s| s.to_string()).collect();
    let explanation = if matched_words.is_empty() {
        format!("matched \"{query}\" by semantic similarity alone")
    } else {
        format!(
            "matched \"{query}\" via keyword(s) {} with semantic similarity {semantic:.2}",
            matched_words.join(", ")
        )
    };

    ScoredFactors {
        semantic,
        keyword_density,
        recency,
        usage,
        confidence,
        quality,
        overall_score,
        explanation,
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

fn word_overlap(query_tokens: &HashSet<String>, content_tokens: &HashSet<String>) -> f32 {
    if query_tokens.is_empty() || content_tokens.is_empty() {
        return 0.0;
    }
    let intersection = query_tokens.intersection(content_tokens).count();
    let union = query_tokens.union(content_tokens).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

/// Matched concepts (for consumers that want them) derived purely from
/// content tokens, independent of the scoring pass.
#[must_use]
pub fn matched_concepts(chunk: &Chunk) -> Vec<String> {
    extraction::extract_concepts(&chunk.content)
        .into_iter()
        .map(|c| c.name)
        .collect()
}

async fn build_context(chunk: &Chunk, storage: &dyn Storage) -> ResultContext {
    let query = RelationshipQuery {
        chunk_id: Some(chunk.id.clone()),
        kinds: Vec::new(),
        limit: Some(20),
    };
    let related: Vec<ChunkRelationship> = storage.get_relationships(&query).await.unwrap_or_default();

    let mut related_chunk_ids = Vec::new();
    for rel in &related {
        let other = if rel.from_chunk_id == chunk.id {
            &rel.to_chunk_id
        } else {
            &rel.from_chunk_id
        };
        if other != &chunk.id && !related_chunk_ids.contains(other) {
            related_chunk_ids.push(other.clone());
        }
    }

    ResultContext {
        related_chunk_ids,
        session_peers: vec![chunk.session_id.clone()],
        repository_peers: vec![chunk.repository.clone()],
        temporal_context: Vec::new(),
        conceptual_context: matched_concepts(chunk),
    }
}

/// Bounded look-around over the candidate set: other chunks in the same
/// repository within `config.temporal_context_window_days` of `chunk`,
/// nearest first. Resolves the formerly-stub `findTemporalContext`
/// contract with a concrete, cheap-to-compute algorithm rather than
/// leaving it unimplemented.
fn find_temporal_context(
    chunk: &Chunk,
    siblings: &[(String, String, DateTime<Utc>)],
    config: &SearchConfig,
) -> Vec<String> {
    let window = chrono::Duration::days(config.temporal_context_window_days.max(0));
    let mut neighbors: Vec<(i64, &str)> = siblings
        .iter()
        .filter(|(id, repository, _)| id != &chunk.id && repository == &chunk.repository)
        .filter_map(|(id, _, timestamp)| {
            let delta = (*timestamp - chunk.timestamp).num_seconds().abs();
            (delta <= window.num_seconds()).then_some((delta, id.as_str()))
        })
        .collect();
    neighbors.sort_by_key(|(delta, _)| *delta);
    neighbors
        .into_iter()
        .map(|(_, id)| id.to_string())
        .collect()
}
