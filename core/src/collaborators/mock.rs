//! In-memory mock collaborators, used by tests and doctests. No
//! production code depends on this module; each mock is a minimal
//! stand-in shipped alongside its trait definition.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::chunk::Chunk;
use crate::collaborators::ai::{Ai, AiRequest, AiResponse};
use crate::collaborators::embeddings::Embeddings;
use crate::collaborators::storage::{
    ChunkRelationship, PatternStatistics, PatternStorage, RelationshipQuery, SearchHit, Storage,
};
use crate::error::{Error, Result};
use crate::pattern::types::{Pattern, PatternOccurrence, PatternRelationship};
use uuid::Uuid;

/// Deterministic hash-based embedding stand-in: stable across calls for
/// the same text, cheap, and good enough for cosine-similarity tests.
#[derive(Debug, Default)]
pub struct HashEmbeddings {
    pub dimension: usize,
}

impl HashEmbeddings {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl Embeddings for HashEmbeddings {
    async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let dim = self.dimension.max(1);
        let mut vector = vec![0.0f32; dim];
        for (i, byte) in text.bytes().enumerate() {
            let slot = i % dim;
            vector[slot] += f32::from(byte) / 255.0;
        }
        Ok(vector)
    }
}

/// An `Ai` collaborator that always reports unavailability, exercising
/// the degraded path from tests.
#[derive(Debug, Default)]
pub struct UnavailableAi;

#[async_trait]
impl Ai for UnavailableAi {
    async fn process_request(&self, _request: AiRequest) -> Result<AiResponse> {
        Err(Error::Collaborator("AI collaborator not configured".into()))
    }
}

/// A trivial in-memory `Storage` backed by a `HashMap`, for unit and
/// property tests that need to exercise the collaborator surface.
#[derive(Default)]
pub struct InMemoryStorage {
    chunks: RwLock<HashMap<String, Chunk>>,
}

impl InMemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, chunks: impl IntoIterator<Item = Chunk>) {
        let mut guard = self.chunks.write();
        for chunk in chunks {
            guard.insert(chunk.id.clone(), chunk);
        }
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get_by_id(&self, id: &str) -> Result<Chunk> {
        self.chunks
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::chunk_not_found(id))
    }

    async fn update(&self, chunk: &Chunk) -> Result<()> {
        self.chunks
            .write()
            .insert(chunk.id.clone(), chunk.clone());
        Ok(())
    }

    async fn search(&self, query: &str, _embedding: &[f32]) -> Result<Vec<SearchHit>> {
        let query_lower = query.to_lowercase();
        let hits = self
            .chunks
            .read()
            .values()
            .filter(|c| c.content.to_lowercase().contains(&query_lower))
            .map(|c| SearchHit {
                chunk: c.clone(),
                score: 0.5,
            })
            .collect();
        Ok(hits)
    }

    async fn list_by_repository(
        &self,
        repository: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Chunk>> {
        let capped_limit = limit.min(1000);
        let mut matching: Vec<Chunk> = self
            .chunks
            .read()
            .values()
            .filter(|c| c.repository == repository)
            .cloned()
            .collect();
        matching.sort_by_key(|c| c.timestamp);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(capped_limit)
            .collect())
    }

    async fn get_relationships(
        &self,
        _query: &RelationshipQuery,
    ) -> Result<Vec<ChunkRelationship>> {
        Ok(Vec::new())
    }
}

/// A trivial in-memory `PatternStorage` backed by a `HashMap`, used by
/// the Pattern Engine's own tests and by the workspace `tests` crate.
#[derive(Default)]
pub struct InMemoryPatternStorage {
    patterns: RwLock<HashMap<Uuid, Pattern>>,
    occurrences: RwLock<HashMap<Uuid, Vec<PatternOccurrence>>>,
}

impl InMemoryPatternStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatternStorage for InMemoryPatternStorage {
    async fn store_pattern(&self, pattern: &Pattern) -> Result<()> {
        self.patterns.write().insert(pattern.id, pattern.clone());
        Ok(())
    }

    async fn get_pattern(&self, id: Uuid) -> Result<Pattern> {
        self.patterns
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::pattern_not_found(id))
    }

    async fn list_patterns(&self, _kind: Option<&str>) -> Result<Vec<Pattern>> {
        Ok(self.patterns.read().values().cloned().collect())
    }

    async fn update_pattern(&self, pattern: &Pattern) -> Result<()> {
        self.patterns.write().insert(pattern.id, pattern.clone());
        Ok(())
    }

    async fn delete_pattern(&self, id: Uuid) -> Result<()> {
        self.patterns.write().remove(&id);
        Ok(())
    }

    async fn search_patterns(&self, query: &str, limit: usize) -> Result<Vec<Pattern>> {
        let lower = query.to_lowercase();
        Ok(self
            .patterns
            .read()
            .values()
            .filter(|p| p.name.to_lowercase().contains(&lower) || lower.contains(&p.name.to_lowercase()))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn store_occurrence(&self, occurrence: &PatternOccurrence) -> Result<()> {
        self.occurrences
            .write()
            .entry(occurrence.pattern_id)
            .or_default()
            .push(occurrence.clone());
        Ok(())
    }

    async fn get_occurrences(&self, pattern_id: Uuid, limit: usize) -> Result<Vec<PatternOccurrence>> {
        Ok(self
            .occurrences
            .read()
            .get(&pattern_id)
            .map(|occurrences| occurrences.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn store_relationship(&self, _relationship: &PatternRelationship) -> Result<()> {
        Ok(())
    }

    async fn get_pattern_relationships(&self, _pattern_id: Uuid) -> Result<Vec<PatternRelationship>> {
        Ok(Vec::new())
    }

    async fn update_confidence(&self, pattern_id: Uuid, is_positive: bool) -> Result<f32> {
        let mut guard = self.patterns.write();
        let pattern = guard
            .get_mut(&pattern_id)
            .ok_or_else(|| Error::pattern_not_found(pattern_id))?;
        pattern.record_feedback(is_positive, chrono::Utc::now());
        Ok(pattern.confidence_score)
    }

    async fn get_pattern_statistics(&self) -> Result<PatternStatistics> {
        Ok(PatternStatistics::default())
    }
}
