//! The Multi-Repository Engine: an in-process map of repository
//! contexts, cross-repo pattern aggregation, and repository relations.

use std::collections::HashMap;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::chunk::Chunk;
use crate::error::{Error, Result};
use crate::multi_repo::types::{
    CrossRepoPattern, MultiRepoInsights, MultiRepoQuery, MultiRepoResult, RepositoryContext,
    RepositoryRelation, RepositoryRelationKind,
};

const TECH_DICTIONARY: &[&str] = &[
    "rust", "python", "typescript", "javascript", "go", "java", "kubernetes", "docker", "postgres",
    "redis", "graphql", "react", "vue", "svelte", "tokio", "axum", "fastapi", "django",
];

const COMMON_PATTERN_DICTIONARY: &[&str] = &[
    "debugging", "code review", "feature development", "configuration change", "refactoring",
    "testing", "deployment",
];

/// Tuning constants for the Multi-Repository Engine.
#[derive(Debug, Clone)]
pub struct MultiRepoConfig {
    pub max_repositories: usize,
    pub repo_similarity_threshold: f32,
    pub pattern_min_frequency: usize,
    pub cross_repo_confidence_divisor: f32,
    pub analysis_interval: StdDuration,
}

impl Default for MultiRepoConfig {
    fn default() -> Self {
        Self {
            max_repositories: 100,
            repo_similarity_threshold: 0.6,
            pattern_min_frequency: 3,
            cross_repo_confidence_divisor: 10.0,
            analysis_interval: StdDuration::from_secs(24 * 3600),
        }
    }
}

/// The Multi-Repository Engine. Shared state is guarded by
/// reader/writer locks, matching the shared-resource policy used by
/// the rest of the core.
pub struct MultiRepoEngine {
    config: MultiRepoConfig,
    repositories: RwLock<HashMap<String, RepositoryContext>>,
    relations: RwLock<Vec<RepositoryRelation>>,
    cross_repo_patterns: RwLock<Vec<CrossRepoPattern>>,
    last_analysis: RwLock<Option<DateTime<Utc>>>,
}

impl MultiRepoEngine {
    #[must_use]
    pub fn new(config: MultiRepoConfig) -> Self {
        Self {
            config,
            repositories: RwLock::new(HashMap::new()),
            relations: RwLock::new(Vec::new()),
            cross_repo_patterns: RwLock::new(Vec::new()),
            last_analysis: RwLock::new(None),
        }
    }

    /// Add a repository context, computing similarity against every
    /// existing repository and recording a `similar` relation above
    /// threshold.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] for an empty id, or
    /// [`Error::CapacityExceeded`] at `max_repositories`.
    pub fn add_repository(&self, ctx: RepositoryContext) -> Result<()> {
        if ctx.id.trim().is_empty() {
            return Err(Error::InvalidInput("repository id must not be empty".into()));
        }
        let mut repositories = self.repositories.write();
        if !repositories.contains_key(&ctx.id) && repositories.len() >= self.config.max_repositories {
            return Err(Error::CapacityExceeded(format!(
                "multi-repo engine at max_repositories={}",
                self.config.max_repositories
            )));
        }

        let mut new_relations = Vec::new();
        for existing in repositories.values() {
            let similarity = repository_similarity(&ctx, existing);
            if similarity >= self.config.repo_similarity_threshold {
                new_relations.push(RepositoryRelation {
                    from: ctx.id.clone(),
                    to: existing.id.clone(),
                    kind: RepositoryRelationKind::Similar,
                    similarity,
                    evidence: similarity_evidence(&ctx, existing),
                });
            }
        }

        repositories.insert(ctx.id.clone(), ctx);
        self.relations.write().extend(new_relations);
        Ok(())
    }

    /// Lazily create or update the repository context for `id` from an
    /// observed chunk batch: bump session count, extend tech stack and
    /// pattern list, and update the running success rate.
    pub fn update_repository_context(&self, id: &str, chunks: &[Chunk]) {
        let mut repositories = self.repositories.write();
        let ctx = repositories
            .entry(id.to_string())
            .or_insert_with(|| RepositoryContext::new(id));

        ctx.total_sessions += chunks.len() as u64;
        ctx.last_activity = Utc::now();

        for chunk in chunks {
            let lower = chunk.content.to_lowercase();
            for tech in TECH_DICTIONARY {
                if lower.contains(tech) && !ctx.tech_stack.iter().any(|t| t == tech) {
                    ctx.tech_stack.push((*tech).to_string());
                }
            }
            for pattern in COMMON_PATTERN_DICTIONARY {
                if lower.contains(pattern) && !ctx.common_patterns.iter().any(|p| p == pattern) {
                    ctx.common_patterns.push((*pattern).to_string());
                }
            }
        }

        let successes = chunks
            .iter()
            .filter(|c| c.outcome == crate::chunk::Outcome::Success)
            .count();
        let failures = chunks
            .iter()
            .filter(|c| c.outcome == crate::chunk::Outcome::Failed)
            .count();
        let observed = successes + failures;
        if observed > 0 {
            let batch_rate = successes as f32 / observed as f32;
            ctx.success_rate = (ctx.success_rate + batch_rate) / 2.0;
        }
    }

    /// Aggregate common patterns across repositories, throttled by
    /// `analysis_interval` — repeating within the interval is a no-op.
    pub fn analyze_cross_repo_patterns(&self) {
        let now = Utc::now();
        {
            let last = self.last_analysis.read();
            if let Some(last) = *last {
                let elapsed = now.signed_duration_since(last);
                if elapsed.to_std().unwrap_or(StdDuration::ZERO) < self.config.analysis_interval {
                    return;
                }
            }
        }

        let repositories = self.repositories.read();
        let mut by_pattern: HashMap<String, Vec<&RepositoryContext>> = HashMap::new();
        for ctx in repositories.values() {
            for pattern in &ctx.common_patterns {
                by_pattern.entry(pattern.clone()).or_default().push(ctx);
            }
        }

        let mut patterns = Vec::new();
        for (name, repos) in by_pattern {
            if repos.len() < self.config.pattern_min_frequency {
                continue;
            }
            let repository_ids: Vec<String> = repos.iter().map(|r| r.id.clone()).collect();
            let mut tech_stacks: Vec<String> = Vec::new();
            for repo in &repos {
                for tech in &repo.tech_stack {
                    if !tech_stacks.contains(tech) {
                        tech_stacks.push(tech.clone());
                    }
                }
            }
            let frameworks: Vec<String> = repos.iter().filter_map(|r| r.framework.clone()).collect();
            let mean_success_rate =
                repos.iter().map(|r| r.success_rate).sum::<f32>() / repos.len() as f32;
            let confidence = (repos.len() as f32 / self.config.cross_repo_confidence_divisor).min(1.0);

            patterns.push(CrossRepoPattern {
                name,
                frequency: repository_ids.len(),
                repositories: repository_ids,
                tech_stacks,
                frameworks,
                success_rate: mean_success_rate,
                confidence,
            });
        }

        drop(repositories);
        *self.cross_repo_patterns.write() = patterns;
        *self.last_analysis.write() = Some(now);
    }

    #[must_use]
    pub fn cross_repo_patterns(&self) -> Vec<CrossRepoPattern> {
        self.cross_repo_patterns.read().clone()
    }

    /// Query repositories by id/tech/framework/activity window, scored
    /// by `0.3*success_rate + 0.4*tech_match_ratio + 0.3*activity_decay`.
    #[must_use]
    pub fn query_multi_repo(&self, query: &MultiRepoQuery) -> Vec<MultiRepoResult> {
        let repositories = self.repositories.read();
        let now = Utc::now();

        let mut results: Vec<MultiRepoResult> = repositories
            .values()
            .filter(|ctx| query.repository_ids.is_empty() || query.repository_ids.contains(&ctx.id))
            .filter(|ctx| {
                query
                    .tech
                    .as_ref()
                    .is_none_or(|tech| ctx.tech_stack.iter().any(|t| t == tech))
            })
            .filter(|ctx| {
                query
                    .framework
                    .as_ref()
                    .is_none_or(|framework| ctx.framework.as_deref() == Some(framework.as_str()))
            })
            .filter(|ctx| {
                query.active_within_days.is_none_or(|days| {
                    (now - ctx.last_activity).num_days() <= days
                })
            })
            .map(|ctx| {
                let tech_match_ratio = query.tech.as_ref().map_or(1.0, |tech| {
                    if ctx.tech_stack.iter().any(|t| t == tech) {
                        1.0
                    } else {
                        0.0
                    }
                });
                let days_since = (now - ctx.last_activity).num_days().max(0) as f32;
                let activity_decay = 1.0 / (1.0 + days_since / 30.0);
                let relevance = 0.3 * ctx.success_rate + 0.4 * tech_match_ratio + 0.3 * activity_decay;
                MultiRepoResult {
                    repository_id: ctx.id.clone(),
                    relevance,
                }
            })
            .collect();

        results.sort_by(|a, b| b.relevance.partial_cmp(&a.relevance).unwrap_or(std::cmp::Ordering::Equal));
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        results
    }

    /// Repositories similar to `id`, at or above the configured
    /// similarity threshold, sorted descending.
    #[must_use]
    pub fn similar_repositories(&self, id: &str, limit: usize) -> Vec<(String, f32)> {
        let mut matches: Vec<(String, f32)> = self
            .relations
            .read()
            .iter()
            .filter(|rel| rel.from == id || rel.to == id)
            .map(|rel| {
                let other = if rel.from == id { &rel.to } else { &rel.from };
                (other.clone(), rel.similarity)
            })
            .collect();
        matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(limit);
        matches
    }

    /// Distribution and success-rate insights across all active
    /// repositories.
    #[must_use]
    pub fn insights(&self) -> MultiRepoInsights {
        let repositories = self.repositories.read();
        let mut insights = MultiRepoInsights::default();
        if repositories.is_empty() {
            return insights;
        }

        for ctx in repositories.values() {
            for tech in &ctx.tech_stack {
                *insights.tech_distribution.entry(tech.clone()).or_insert(0) += 1;
            }
            if let Some(framework) = &ctx.framework {
                *insights.framework_distribution.entry(framework.clone()).or_insert(0) += 1;
            }
            if let Some(language) = &ctx.language {
                *insights.language_distribution.entry(language.clone()).or_insert(0) += 1;
            }
            for pattern in &ctx.common_patterns {
                *insights.common_pattern_frequency.entry(pattern.clone()).or_insert(0) += 1;
            }
        }

        insights.average_success_rate =
            repositories.values().map(|r| r.success_rate).sum::<f32>() / repositories.len() as f32;
        insights
    }
}

/// Repository similarity:
/// `0.4*jaccard(tech_stack) + 0.2*framework_eq + 0.2*language_eq + 0.2*jaccard(common_patterns)`.
#[must_use]
pub fn repository_similarity(a: &RepositoryContext, b: &RepositoryContext) -> f32 {
    let tech_jaccard = jaccard(&a.tech_stack, &b.tech_stack);
    let framework_eq = f32::from(a.framework.is_some() && a.framework == b.framework);
    let language_eq = f32::from(a.language.is_some() && a.language == b.language);
    let pattern_jaccard = jaccard(&a.common_patterns, &b.common_patterns);
    0.4 * tech_jaccard + 0.2 * framework_eq + 0.2 * language_eq + 0.2 * pattern_jaccard
}

fn jaccard(a: &[String], b: &[String]) -> f32 {
    let set_a: std::collections::HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: std::collections::HashSet<&str> = b.iter().map(String::as_str).collect();
    if set_a.is_empty() && set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

fn similarity_evidence(a: &RepositoryContext, b: &RepositoryContext) -> Vec<String> {
    let mut evidence = Vec::new();
    for tech in &a.tech_stack {
        if b.tech_stack.contains(tech) {
            evidence.push(format!("shared_tech:{tech}"));
        }
    }
    if a.framework.is_some() && a.framework == b.framework {
        evidence.push(format!("same_framework:{}", a.framework.as_ref().unwrap()));
    }
    if a.language.is_some() && a.language == b.language {
        evidence.push(format!("same_language:{}", a.language.as_ref().unwrap()));
    }
    evidence
}
