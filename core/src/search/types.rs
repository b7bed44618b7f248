//! Search Explainer data types.

use std::collections::HashMap;

use crate::chunk::Chunk;

/// Supported citation templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CitationStyle {
    #[default]
    Simple,
    Apa,
    Chicago,
    Mla,
    Custom,
}

/// Tuning constants for an `explained_search` call.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub limit: usize,
    pub citations_enabled: bool,
    pub citation_style: CitationStyle,
    /// Only consulted when `citation_style` is [`CitationStyle::Custom`].
    pub custom_template: Option<String>,
    /// Window, in days either side of a result, used to find temporal
    /// neighbors (same repository, nearby timestamp) for its context.
    pub temporal_context_window_days: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            citations_enabled: true,
            citation_style: CitationStyle::Simple,
            custom_template: None,
            temporal_context_window_days: 3,
        }
    }
}

/// Related-item context attached to a result.
#[derive(Debug, Clone, Default)]
pub struct ResultContext {
    pub related_chunk_ids: Vec<String>,
    pub session_peers: Vec<String>,
    pub repository_peers: Vec<String>,
    pub temporal_context: Vec<String>,
    pub conceptual_context: Vec<String>,
}

/// One generated citation entry, keyed by its alphabetic id (`"A"`, `"B"`, ...).
#[derive(Debug, Clone, Default)]
pub struct Citation {
    pub id: String,
    pub chunk_id: String,
    pub text: String,
}

/// One relevance-scored, explained search result: a base chunk
/// enriched with factor breakdown, matched concepts, and context.
#[derive(Debug, Clone)]
pub struct ExplainedResult {
    pub chunk: Chunk,
    pub semantic: f32,
    pub keyword_density: f32,
    pub recency: f32,
    pub usage: f32,
    pub confidence: f32,
    pub quality: f32,
    pub overall_score: f32,
    pub matched_concepts: Vec<String>,
    pub explanation: String,
    pub citation_id: Option<String>,
    pub context: ResultContext,
}

/// Full `explained_search` response.
#[derive(Debug, Clone, Default)]
pub struct ExplainedSearch {
    pub results: Vec<ExplainedResult>,
    pub citations: HashMap<String, Citation>,
    pub explanation: String,
}
