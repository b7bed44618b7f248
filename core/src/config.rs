//! Top-level configuration aggregate.
//!
//! Each subsystem carries its own `*Config` with a [`Default`] impl
//! matching the documented defaults; [`MemoryIntelConfig`] bundles them
//! for callers that want to construct every subsystem from one value,
//! mirroring the teacher's top-level `MemoryConfig`.

use crate::confidence::ConfidenceConfig;
use crate::conflict::ConflictDetectorConfig;
use crate::freshness::FreshnessConfig;
use crate::graph::GraphConfig;
use crate::multi_repo::MultiRepoConfig;
use crate::pattern::PatternEngineConfig;
use crate::search::SearchConfig;

/// Aggregate configuration for every subsystem in the core.
///
/// Constructed either via [`MemoryIntelConfig::default`] (documented
/// defaults from each subsystem) or [`MemoryIntelConfig::from_env`]
/// (defaults with `MCP_MEMORY_*` environment overrides layered on).
#[derive(Debug, Clone)]
pub struct MemoryIntelConfig {
    pub confidence: ConfidenceConfig,
    pub freshness: FreshnessConfig,
    pub pattern: PatternEngineConfig,
    pub graph: GraphConfig,
    pub conflict: ConflictDetectorConfig,
    pub multi_repo: MultiRepoConfig,
    pub search: SearchConfig,
}

impl Default for MemoryIntelConfig {
    fn default() -> Self {
        Self {
            confidence: ConfidenceConfig::default(),
            freshness: FreshnessConfig::default(),
            pattern: PatternEngineConfig::default(),
            graph: GraphConfig::default(),
            conflict: ConflictDetectorConfig::default(),
            multi_repo: MultiRepoConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl MemoryIntelConfig {
    /// Build the aggregate config, applying `MCP_MEMORY_*` environment
    /// overrides for the subsystems that support them.
    ///
    /// Subsystems without a documented environment override (graph,
    /// search) fall back to their programmatic defaults; only
    /// `pattern` currently exposes `from_env` (§6 of the design
    /// document names it as the worked example).
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            pattern: PatternEngineConfig::from_env(),
            ..Self::default()
        }
    }
}
