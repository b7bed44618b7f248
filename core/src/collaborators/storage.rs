//! The `Storage` collaborator: chunk persistence and vector retrieval.
//!
//! An `async_trait` with a `Send + Sync` bound; no production
//! implementation ships alongside the core.

use async_trait::async_trait;
use uuid::Uuid;

use crate::chunk::Chunk;
use crate::error::Result;
use crate::pattern::types::{Pattern, PatternOccurrence, PatternRelationship};

/// One scored search hit: a chunk plus its retrieval score.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub chunk: Chunk,
    pub score: f32,
}

/// Query shape for `Storage::get_relationships` (chunk-level, not
/// pattern-level — see [`crate::pattern::PatternStore`] for the
/// pattern-flavoured relationship query).
#[derive(Debug, Clone, Default)]
pub struct RelationshipQuery {
    pub chunk_id: Option<String>,
    pub kinds: Vec<String>,
    pub limit: Option<usize>,
}

/// One relationship returned by `Storage::get_relationships`.
#[derive(Debug, Clone)]
pub struct ChunkRelationship {
    pub from_chunk_id: String,
    pub to_chunk_id: String,
    pub kind: String,
}

/// Chunk persistence and vector retrieval, consumed read-mostly by the
/// core. `update` is the sole mutation path, used to persist refresh
/// metadata.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch a chunk by id.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::NotFound`] if absent.
    async fn get_by_id(&self, id: &str) -> Result<Chunk>;

    /// Persist an updated chunk (refresh metadata, quality sub-records).
    ///
    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn update(&self, chunk: &Chunk) -> Result<()>;

    /// Embedding-backed search over stored chunks.
    ///
    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn search(&self, query: &str, embedding: &[f32]) -> Result<Vec<SearchHit>>;

    /// Paginated listing of chunks for one repository, capped
    /// defensively at 1000 rows per call.
    ///
    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn list_by_repository(
        &self,
        repository: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Chunk>>;

    /// Chunk-to-chunk relationships matching the given query.
    ///
    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn get_relationships(&self, query: &RelationshipQuery) -> Result<Vec<ChunkRelationship>>;
}

/// Pattern-flavoured storage, separated from [`Storage`] because only
/// the Pattern Engine needs it.
#[async_trait]
pub trait PatternStorage: Send + Sync {
    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn store_pattern(&self, pattern: &Pattern) -> Result<()>;

    /// # Errors
    /// Returns [`crate::error::Error::NotFound`] if absent.
    async fn get_pattern(&self, id: Uuid) -> Result<Pattern>;

    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn list_patterns(&self, kind: Option<&str>) -> Result<Vec<Pattern>>;

    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn update_pattern(&self, pattern: &Pattern) -> Result<()>;

    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn delete_pattern(&self, id: Uuid) -> Result<()>;

    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn search_patterns(&self, query: &str, limit: usize) -> Result<Vec<Pattern>>;

    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn store_occurrence(&self, occurrence: &PatternOccurrence) -> Result<()>;

    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn get_occurrences(
        &self,
        pattern_id: Uuid,
        limit: usize,
    ) -> Result<Vec<PatternOccurrence>>;

    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn store_relationship(&self, relationship: &PatternRelationship) -> Result<()>;

    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn get_pattern_relationships(&self, pattern_id: Uuid) -> Result<Vec<PatternRelationship>>;

    /// Recompute confidence with a Laplace-smoothed Bayesian update and
    /// persist it.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::NotFound`] if absent.
    async fn update_confidence(&self, pattern_id: Uuid, is_positive: bool) -> Result<f32>;

    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn get_pattern_statistics(&self) -> Result<PatternStatistics>;
}

/// Aggregate pattern statistics exposed by `PatternStorage`.
#[derive(Debug, Clone, Default)]
pub struct PatternStatistics {
    pub total_patterns: usize,
    pub validated_patterns: usize,
    pub average_confidence: f32,
}
