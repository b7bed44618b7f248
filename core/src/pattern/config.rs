//! Pattern Engine configuration.

use std::time::Duration;

/// Tuning constants for the Pattern Engine.
#[derive(Debug, Clone)]
pub struct PatternEngineConfig {
    pub min_confidence: f32,
    pub max_patterns: usize,
    pub evolution_threshold: f32,
    pub batch_size: usize,
    pub batch_interval: Duration,
    pub learn_timeout: Duration,
    pub embedding_cache_capacity: usize,
}

impl Default for PatternEngineConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            max_patterns: 1000,
            evolution_threshold: 0.8,
            batch_size: 10,
            batch_interval: Duration::from_secs(5),
            learn_timeout: Duration::from_secs(30),
            embedding_cache_capacity: 512,
        }
    }
}

impl PatternEngineConfig {
    /// Apply `MCP_MEMORY_*` environment overrides on top of the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("MCP_MEMORY_PATTERN_MIN_CONFIDENCE") {
            if let Ok(value) = raw.parse() {
                config.min_confidence = value;
            }
        }
        if let Ok(raw) = std::env::var("MCP_MEMORY_PATTERN_MAX_PATTERNS") {
            if let Ok(value) = raw.parse() {
                config.max_patterns = value;
            }
        }
        if let Ok(raw) = std::env::var("MCP_MEMORY_PATTERN_EVOLUTION_THRESHOLD") {
            if let Ok(value) = raw.parse() {
                config.evolution_threshold = value;
            }
        }
        config
    }
}
