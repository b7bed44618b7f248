//! The Pattern Engine: recognize, learn, suggest, validate,
//! import/export, batched learning, embedding cache, metrics.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::catalog::seed_patterns;
use crate::chunk::Chunk;
use crate::collaborators::ai::{Ai, AiMessage, AiRequest};
use crate::collaborators::embeddings::{cosine_similarity, Embeddings};
use crate::collaborators::storage::PatternStorage;
use crate::error::{Error, Result};
use crate::pattern::batch::{BatchQueue, LearnItem};
use crate::pattern::cache::{EmbeddingCache, PatternMetrics};
use crate::pattern::config::PatternEngineConfig;
use crate::pattern::sequence::match_templates;
use crate::pattern::similarity::keyword_overlap;
use crate::pattern::types::{
    DetectionMethod, Pattern, PatternExample, PatternKind, PatternOccurrence, ValidationStatus,
};

/// The Pattern Engine, holding its collaborators, cache, and metrics.
pub struct PatternEngine {
    config: PatternEngineConfig,
    storage: Arc<dyn PatternStorage>,
    embeddings: Option<Arc<dyn Embeddings>>,
    ai: Option<Arc<dyn Ai>>,
    cache: Arc<EmbeddingCache>,
    metrics: Arc<PatternMetrics>,
    batch_queue: parking_lot::RwLock<Option<Arc<BatchQueue>>>,
}

impl PatternEngine {
    /// Construct a new engine. Batched learning is started separately
    /// via [`PatternEngine::enable_batching`] since it requires `self`
    /// to already be held behind an `Arc`.
    #[must_use]
    pub fn new(
        config: PatternEngineConfig,
        storage: Arc<dyn PatternStorage>,
        embeddings: Option<Arc<dyn Embeddings>>,
        ai: Option<Arc<dyn Ai>>,
    ) -> Self {
        let cache = Arc::new(EmbeddingCache::new(config.embedding_cache_capacity));
        Self {
            config,
            storage,
            embeddings,
            ai,
            cache,
            metrics: Arc::new(PatternMetrics::new()),
            batch_queue: parking_lot::RwLock::new(None),
        }
    }

    #[must_use]
    pub fn metrics(&self) -> Arc<PatternMetrics> {
        self.metrics.sync_cache_counters(&self.cache);
        Arc::clone(&self.metrics)
    }

    /// Start the background batch-learning consumer. Takes
    /// `self: &Arc<Self>` because the consumer closure must hold a
    /// strong reference back into the engine to actually learn.
    pub fn enable_batching(self: &Arc<Self>) {
        let engine = Arc::clone(self);
        let queue = BatchQueue::start(
            self.config.batch_size,
            self.config.batch_interval,
            move |batch: Vec<LearnItem>| {
                let engine = Arc::clone(&engine);
                async move {
                    for item in batch {
                        let result = engine.learn_sync(item.chunks, item.outcome).await;
                        let _ = item.responder.send(result);
                    }
                }
            },
        );
        *self.batch_queue.write() = Some(queue);
    }

    async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        if let Some(cached) = self.cache.get(text) {
            return Some(cached);
        }
        let embeddings = self.embeddings.as_ref()?;
        match embeddings.generate(text).await {
            Ok(vector) => {
                self.cache.put(text.to_string(), vector.clone());
                Some(vector)
            }
            Err(err) => {
                tracing::warn!(error = %err, "embedding generation failed; degrading to keyword overlap");
                None
            }
        }
    }

    /// Recognize patterns in a sequence of chunks. Empty input
    /// returns empty. Combines AI-proposed patterns (if configured),
    /// sequence-template matches, and embedding-similar stored
    /// patterns, deduplicated by id, sorted by confidence, capped at 10.
    ///
    /// # Errors
    /// Propagates `PatternStorage` failures; AI/Embeddings failures are
    /// absorbed and degrade the result instead of failing the call.
    #[tracing::instrument(skip(self, chunks))]
    pub async fn recognize(&self, chunks: &[Chunk]) -> Result<Vec<Pattern>> {
        let started = Instant::now();
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let mut candidates: Vec<Pattern> = Vec::new();

        let combined_text: String = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let embedding = self.embed(&combined_text).await;

        if let Some(ai) = &self.ai {
            self.metrics.record_ai_call();
            if let Ok(response) = ai
                .process_request(AiRequest {
                    messages: vec![AiMessage {
                        role: "user".into(),
                        content: format!("Identify a pattern in:\n{combined_text}"),
                    }],
                    metadata: serde_json::json!({ "task": "recognize" }),
                })
                .await
            {
                if let Some(pattern) = parse_ai_pattern(&response.content) {
                    candidates.push(pattern);
                }
            }
        }

        for template_match in match_templates(chunks) {
            let mut pattern = Pattern::new(
                pattern_kind_from_str(template_match.pattern_kind),
                template_match.template_name,
                format!("sequence-template match: {}", template_match.template_name),
            );
            pattern.confidence_score = template_match.ratio;
            candidates.push(pattern);
        }

        if let Some(embedding) = &embedding {
            if let Ok(stored) = self.storage.list_patterns(None).await {
                for pattern in stored {
                    if let Some(pattern_embedding) = &pattern.embedding {
                        let similarity = cosine_similarity(embedding, pattern_embedding);
                        if similarity >= self.config.min_confidence {
                            candidates.push(pattern);
                        }
                    }
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        candidates.retain(|p| seen.insert(p.id));
        candidates.sort_by(|a, b| {
            b.confidence_score
                .partial_cmp(&a.confidence_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(10);

        self.metrics.record_detected(candidates.len() as u64);
        self.metrics
            .record_processing_time(started.elapsed().as_micros() as u64);

        Ok(candidates)
    }

    /// Learn from a chunk sequence and its outcome. Enqueues
    /// into the batch queue when batching is enabled; otherwise
    /// processes synchronously (bounded by `learn_timeout`).
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] with fewer than two chunks, or a
    /// collaborator/timeout error from the processing path.
    pub async fn learn(&self, chunks: Vec<Chunk>, outcome: String) -> Result<()> {
        if chunks.len() < 2 {
            return Err(Error::InvalidInput(
                "learn requires at least two chunks".into(),
            ));
        }

        let queue = self.batch_queue.read().clone();
        if let Some(queue) = queue {
            let (tx, rx) = tokio::sync::oneshot::channel();
            queue
                .enqueue(LearnItem {
                    chunks,
                    outcome,
                    responder: tx,
                })
                .await?;
            match tokio::time::timeout(self.config.learn_timeout, rx).await {
                Ok(Ok(result)) => result,
                Ok(Err(_)) => Err(Error::Collaborator("batch worker dropped response".into())),
                Err(_) => Err(Error::Cancelled("learn timed out waiting on batch queue".into())),
            }
        } else {
            self.learn_sync(chunks, outcome).await
        }
    }

    async fn learn_sync(&self, chunks: Vec<Chunk>, outcome: String) -> Result<()> {
        let combined_name = derive_pattern_name(&chunks);
        let keywords: Vec<String> = chunks
            .iter()
            .flat_map(|c| crate::extraction::extract_key_phrases(&c.content))
            .take(10)
            .collect();

        let embed_text = format!("{combined_name} {}", keywords.join(" "));
        let embedding = self.embed(&embed_text).await;

        let existing = self
            .find_similar_pattern(&combined_name, &keywords, embedding.as_deref())
            .await?;

        let now = Utc::now();
        let is_positive = outcome == "success";
        let detection_method = if embedding.is_some() {
            DetectionMethod::Embedding
        } else {
            DetectionMethod::Regex
        };

        let occurrence_pattern_id = match existing {
            Some(mut pattern) => {
                let similarity = embedding
                    .as_ref()
                    .zip(pattern.embedding.as_ref())
                    .map_or(0.0, |(a, b)| cosine_similarity(a, b));
                let overlap = keyword_overlap(&keywords, &pattern.keywords);

                pattern.record_feedback(is_positive, now);
                pattern.examples.push(PatternExample {
                    chunk_ids: chunks.iter().map(|c| c.id.clone()).collect(),
                    outcome: outcome.clone(),
                });

                if (0.4..self.config.evolution_threshold).contains(&similarity)
                    || (0.3..=0.7).contains(&overlap)
                {
                    let mut evolved = pattern.clone();
                    evolved.id = Uuid::new_v4();
                    evolved.parent_pattern_id = Some(pattern.id);
                    evolved.version = pattern.version + 1;
                    evolved.confidence_score = 0.8 * pattern.confidence_score;
                    evolved.evolution_reason =
                        Some("diverged from parent beyond keyword/embedding overlap".into());
                    let mut merged_keywords = pattern.keywords.clone();
                    merged_keywords.extend(keywords.clone());
                    evolved.set_keywords(merged_keywords);
                    evolved.created_at = now;
                    evolved.updated_at = now;

                    pattern.validation_status = ValidationStatus::Evolved;
                    self.storage.update_pattern(&pattern).await?;
                    let evolved_id = evolved.id;
                    self.storage.store_pattern(&evolved).await?;
                    evolved_id
                } else {
                    let pattern_id = pattern.id;
                    self.storage.update_pattern(&pattern).await?;
                    pattern_id
                }
            }
            None => {
                let mut pattern = Pattern::new(
                    infer_pattern_kind(&chunks),
                    combined_name,
                    "learned from observed chunk sequence",
                );
                pattern.set_keywords(keywords);
                pattern.embedding = embedding;
                pattern.record_feedback(is_positive, now);
                pattern.examples.push(PatternExample {
                    chunk_ids: chunks.iter().map(|c| c.id.clone()).collect(),
                    outcome,
                });
                let pattern_id = pattern.id;
                self.storage.store_pattern(&pattern).await?;
                pattern_id
            }
        };

        if let Some(occurrence) = derive_occurrence(occurrence_pattern_id, &chunks, detection_method, now) {
            self.storage.store_occurrence(&occurrence).await?;
        }

        self.metrics.record_learned(1);
        Ok(())
    }

    async fn find_similar_pattern(
        &self,
        name: &str,
        keywords: &[String],
        embedding: Option<&[f32]>,
    ) -> Result<Option<Pattern>> {
        let candidates = self.storage.search_patterns(name, 20).await?;
        for candidate in candidates {
            let overlap = keyword_overlap(keywords, &candidate.keywords);
            let embed_similarity = embedding
                .zip(candidate.embedding.as_deref())
                .map_or(0.0, |(a, b)| cosine_similarity(a, b));
            if embed_similarity >= self.config.evolution_threshold || overlap > 0.6 {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Suggest patterns relevant to a chunk sequence.
    ///
    /// # Errors
    /// Propagates `PatternStorage` failures.
    pub async fn suggest(&self, chunks: &[Chunk], limit: usize) -> Result<Vec<Pattern>> {
        let keywords: Vec<String> = chunks
            .iter()
            .flat_map(|c| crate::extraction::extract_key_phrases(&c.content))
            .collect();
        let repo = chunks.first().map(|c| c.repository.as_str()).unwrap_or("");
        let language = chunks
            .first()
            .and_then(|c| c.tags.iter().find(|t| t.starts_with("lang:")));

        let mut all_patterns = self.storage.list_patterns(None).await?;
        all_patterns.extend(seed_patterns());

        let mut scored: Vec<(f32, Pattern)> = all_patterns
            .into_iter()
            .map(|pattern| {
                let keyword_score = keyword_overlap(&keywords, &pattern.keywords);
                let type_relevance = if pattern
                    .signature
                    .get("relevant_repo")
                    .is_some_and(|r| r == repo)
                {
                    1.0
                } else {
                    0.5
                };
                let mut score = 0.4 * keyword_score
                    + 0.3 * type_relevance
                    + 0.2 * pattern.confidence_score;
                if pattern.signature.get("repository").is_some_and(|r| r == repo) {
                    score += 0.2;
                }
                if let Some(lang) = language {
                    if pattern.language.as_deref() == Some(lang.as_str()) {
                        score += 0.1;
                    }
                }
                (score, pattern)
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored.into_iter().take(limit).map(|(_, p)| p).collect())
    }

    /// Validate a pattern by id, adjusting positive/negative feedback
    /// and recomputing Bayesian confidence at the storage layer.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the pattern is absent.
    pub async fn validate_pattern(&self, id: Uuid, is_valid: bool) -> Result<f32> {
        self.storage.update_confidence(id, is_valid).await
    }

    /// Export the full pattern list as a structured JSON document.
    ///
    /// # Errors
    /// Propagates serialization or storage errors.
    pub async fn export_patterns(&self) -> Result<serde_json::Value> {
        let patterns = self.storage.list_patterns(None).await?;
        Ok(serde_json::to_value(patterns)?)
    }

    /// Import a pattern list, assigning each imported pattern a fresh id
    /// and timestamps.
    ///
    /// # Errors
    /// Propagates deserialization or storage errors.
    pub async fn import_patterns(&self, document: serde_json::Value) -> Result<usize> {
        let mut patterns: Vec<Pattern> = serde_json::from_value(document)?;
        let now = Utc::now();
        for pattern in &mut patterns {
            pattern.id = Uuid::new_v4();
            pattern.created_at = now;
            pattern.updated_at = now;
            pattern.last_seen = now;
            pattern.parent_pattern_id = None;
            self.storage.store_pattern(pattern).await?;
        }
        Ok(patterns.len())
    }
}

/// Derive the occurrence pinned by a single `learn` call: the last
/// chunk in the sequence (typically the verification/outcome chunk)
/// anchors the occurrence's session/chunk id, and the first chunk
/// modified provides the file path when present.
fn derive_occurrence(
    pattern_id: Uuid,
    chunks: &[Chunk],
    detection_method: DetectionMethod,
    now: chrono::DateTime<Utc>,
) -> Option<PatternOccurrence> {
    let anchor = chunks.last()?;
    let file_path = chunks
        .iter()
        .find_map(|c| c.files_modified.first().cloned());
    Some(PatternOccurrence {
        id: Uuid::new_v4(),
        pattern_id,
        repository: anchor.repository.clone(),
        file_path,
        line_range: None,
        code_snippet: Some(anchor.content.chars().take(200).collect()),
        surrounding_context: chunks
            .first()
            .map(|c| c.content.chars().take(200).collect()),
        detection_score: 1.0,
        detection_method,
        session_id: anchor.session_id.clone(),
        chunk_id: anchor.id.clone(),
        detected_at: now,
    })
}

fn derive_pattern_name(chunks: &[Chunk]) -> String {
    chunks
        .first()
        .and_then(|c| crate::extraction::extract_key_phrases(&c.content).into_iter().next())
        .unwrap_or_else(|| "observed sequence".to_string())
}

fn infer_pattern_kind(chunks: &[Chunk]) -> PatternKind {
    let matches = match_templates(chunks);
    matches
        .first()
        .map(|m| pattern_kind_from_str(m.pattern_kind))
        .unwrap_or(PatternKind::Behavioral)
}

fn pattern_kind_from_str(s: &str) -> PatternKind {
    match s {
        "problem_solution" => PatternKind::ProblemSolution,
        "debugging" => PatternKind::Debugging,
        "workflow" => PatternKind::Workflow,
        _ => PatternKind::Behavioral,
    }
}

fn parse_ai_pattern(content: &str) -> Option<Pattern> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    let name = value.get("name")?.as_str()?.to_string();
    let description = value
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("AI-proposed pattern")
        .to_string();
    let mut pattern = Pattern::new(PatternKind::Behavioral, name, description);
    if let Some(confidence) = value.get("confidence").and_then(serde_json::Value::as_f64) {
        pattern.confidence_score = confidence as f32;
    }
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkKind, Outcome};
    use crate::collaborators::mock::{HashEmbeddings, InMemoryPatternStorage, UnavailableAi};
    use std::collections::HashMap;

    fn chunk(id: &str, content: &str, kind: ChunkKind) -> Chunk {
        Chunk {
            id: id.into(),
            session_id: "s1".into(),
            repository: "repo".into(),
            content: content.into(),
            summary: None,
            timestamp: Utc::now(),
            kind,
            outcome: Outcome::InProgress,
            tags: vec![],
            files_modified: vec![],
            tools_used: vec![],
            quality: None,
            confidence: None,
            metadata: HashMap::new(),
        }
    }

    fn test_engine() -> PatternEngine {
        PatternEngine::new(
            PatternEngineConfig::default(),
            Arc::new(InMemoryPatternStorage::default()),
            Some(Arc::new(HashEmbeddings::new(16))),
            Some(Arc::new(UnavailableAi)),
        )
    }

    #[tokio::test]
    async fn recognize_empty_input_returns_empty() {
        let engine = test_engine();
        let result = engine.recognize(&[]).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn scenario_s1_recognize_problem_solution() {
        let engine = test_engine();
        let chunks = vec![
            chunk("c1", "there is a bug where login fails", ChunkKind::Problem),
            chunk("c2", "looking into it", ChunkKind::Analysis),
            chunk("c3", "add nil check in auth()", ChunkKind::Solution),
            chunk("c4", "verified, login works", ChunkKind::Verification),
        ];
        let patterns = engine.recognize(&chunks).await.unwrap();
        assert!(patterns
            .iter()
            .any(|p| p.kind == PatternKind::ProblemSolution && p.confidence_score >= 0.6));
    }

    #[tokio::test]
    async fn learn_requires_at_least_two_chunks() {
        let engine = test_engine();
        let err = engine
            .learn(vec![chunk("c1", "solo chunk", ChunkKind::Discussion)], "success".into())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn learn_creates_a_pattern_on_first_observation() {
        let engine = test_engine();
        let chunks = vec![
            chunk("c1", "there is a bug where login fails", ChunkKind::Problem),
            chunk("c3", "add nil check in auth()", ChunkKind::Solution),
        ];
        engine.learn(chunks, "success".to_string()).await.unwrap();
        let patterns = engine.storage.list_patterns(None).await.unwrap();
        assert_eq!(patterns.len(), 1);
    }

    #[tokio::test]
    async fn learn_stores_a_derived_occurrence() {
        let engine = test_engine();
        let chunks = vec![
            chunk("c1", "there is a bug where login fails", ChunkKind::Problem),
            chunk("c3", "add nil check in auth()", ChunkKind::Solution),
        ];
        engine.learn(chunks, "success".to_string()).await.unwrap();

        let patterns = engine.storage.list_patterns(None).await.unwrap();
        let pattern = &patterns[0];
        let occurrences = engine.storage.get_occurrences(pattern.id, 10).await.unwrap();
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].pattern_id, pattern.id);
        assert_eq!(occurrences[0].chunk_id, "c3");
    }
}
