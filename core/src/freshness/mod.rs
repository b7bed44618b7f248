//! Freshness management: technology-aware decay, alerting, and
//! refresh-action suggestion for chunks, using days-since-creation
//! decay curves and keyword-based tech detection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, ChunkKind, Outcome};
use crate::error::Result;

/// One detected technology mentioned in chunk content, with its decay
/// rate in percent-per-day.
#[derive(Debug, Clone, Copy)]
struct Technology {
    name: &'static str,
    keywords: &'static [&'static str],
    daily_decay_pct: f32,
    stale_after_days: i64,
}

const TECHNOLOGIES: &[Technology] = &[
    Technology {
        name: "nodejs",
        keywords: &["node.js", "nodejs", "npm", "express.js"],
        daily_decay_pct: 0.3,
        stale_after_days: 90,
    },
    Technology {
        name: "javascript",
        keywords: &["javascript", "typescript", "react", "vue", "webpack"],
        daily_decay_pct: 0.3,
        stale_after_days: 90,
    },
    Technology {
        name: "container",
        keywords: &["docker", "kubernetes", "container", "helm", "k8s"],
        daily_decay_pct: 0.2,
        stale_after_days: 120,
    },
];

const DEFAULT_DAILY_DECAY_PCT: f32 = 0.1;
const DEFAULT_STALE_AFTER_DAYS: i64 = 180;

fn detect_technology(content: &str) -> Option<&'static Technology> {
    let lower = content.to_lowercase();
    TECHNOLOGIES
        .iter()
        .find(|tech| tech.keywords.iter().any(|kw| lower.contains(kw)))
}

/// Freshness thresholds per content type, in months.
fn fresh_threshold_months(kind: ChunkKind) -> f32 {
    match kind {
        ChunkKind::ArchitectureDecision => 12.0,
        ChunkKind::CodeChange | ChunkKind::Solution => 6.0,
        ChunkKind::Discussion | ChunkKind::SessionSummary => 9.0,
        _ => 6.0,
    }
}

/// Severity of a freshness alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

/// One freshness alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshnessAlert {
    pub alert_type: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub reason: String,
    pub detected: DateTime<Utc>,
    pub action_needed: bool,
}

/// Priority of a suggested refresh action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    High,
    Medium,
    Low,
}

/// One suggested action (`refresh`, `archive`, `verify`, `update`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub action: String,
    pub priority: ActionPriority,
    pub reason: String,
    pub confidence: f32,
}

/// Freshness status for a single chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshnessStatus {
    pub is_fresh: bool,
    pub is_stale: bool,
    pub freshness_score: f32,
    pub days_old: i64,
    pub decay_rate: f32,
    pub alerts: Vec<FreshnessAlert>,
    pub last_checked: DateTime<Utc>,
    pub suggested_actions: Vec<SuggestedAction>,
}

/// Configuration for freshness checks.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessConfig {
    pub enable_alerts: bool,
    /// Days within which an explicit `last_refreshed` override keeps a
    /// chunk fresh regardless of age.
    pub refresh_override_days: i64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            enable_alerts: true,
            refresh_override_days: 30,
        }
    }
}

/// Check freshness for one chunk.
#[must_use]
pub fn check_freshness(chunk: &Chunk, now: DateTime<Utc>, config: &FreshnessConfig) -> FreshnessStatus {
    let days_old = chunk.days_old(now);
    let technology = detect_technology(&chunk.content);
    let daily_decay_pct = technology.map_or(DEFAULT_DAILY_DECAY_PCT, |t| t.daily_decay_pct);
    let decay_rate = daily_decay_pct / 100.0;

    // The tech table's `stale_after_days` is the threshold at which
    // tech-specific content is considered stale outright; the fresh
    // threshold sits at 1/1.5 of that so the generic `1.5x` relationship
    // still holds (matching the per-type months-based thresholds below).
    let (fresh_threshold_days, stale_threshold_days) = technology.map_or_else(
        || {
            let fresh = (fresh_threshold_months(chunk.kind) * 30.0) as i64;
            (fresh, (fresh as f32 * 1.5) as i64)
        },
        |t| (((t.stale_after_days as f32) / 1.5) as i64, t.stale_after_days),
    );

    let freshness_score = (1.0 - decay_rate * days_old as f32).clamp(0.0, 1.0);

    let refreshed_recently = chunk
        .last_refreshed()
        .is_some_and(|refreshed| (now - refreshed).num_days() <= config.refresh_override_days);

    let is_fresh = refreshed_recently || days_old <= fresh_threshold_days;
    let is_stale = !refreshed_recently && days_old > stale_threshold_days;

    let mut alerts = Vec::new();
    if config.enable_alerts && !refreshed_recently {
        if let Some(tech) = technology {
            if days_old >= 60 && days_old <= 90 + 30 && is_stale {
                alerts.push(FreshnessAlert {
                    alert_type: "technology_version_stale".into(),
                    severity: AlertSeverity::High,
                    message: format!("{} content may reference outdated tooling", tech.name),
                    reason: format!("{} days old, technology threshold {} days", days_old, tech.stale_after_days),
                    detected: now,
                    action_needed: true,
                });
            }
        }
        if matches!(chunk.kind, ChunkKind::ArchitectureDecision) && days_old as f32 > 12.0 * 30.0 {
            alerts.push(FreshnessAlert {
                alert_type: "architecture_decision_stale".into(),
                severity: AlertSeverity::Medium,
                message: "architecture decision older than 12 months".into(),
                reason: format!("{days_old} days old"),
                detected: now,
                action_needed: true,
            });
        }
        let lower = chunk.content.to_lowercase();
        if (lower.contains("security") || lower.contains("vulnerability")) && days_old as f32 > 6.0 * 30.0 {
            alerts.push(FreshnessAlert {
                alert_type: "security_content_stale".into(),
                severity: AlertSeverity::Critical,
                message: "security-related content older than 6 months".into(),
                reason: format!("{days_old} days old"),
                detected: now,
                action_needed: true,
            });
        }
        if (lower.contains("performance") || lower.contains("benchmark")) && days_old as f32 > 4.0 * 30.0 {
            alerts.push(FreshnessAlert {
                alert_type: "performance_metrics_stale".into(),
                severity: AlertSeverity::Medium,
                message: "performance metrics older than 4 months".into(),
                reason: format!("{days_old} days old"),
                detected: now,
                action_needed: true,
            });
        }
        if freshness_score < 0.4 && days_old > 30 {
            alerts.push(FreshnessAlert {
                alert_type: "low_freshness".into(),
                severity: AlertSeverity::Low,
                message: "freshness score has dropped below 0.4".into(),
                reason: format!("score {freshness_score:.2} after {days_old} days"),
                detected: now,
                action_needed: false,
            });
        }
    }

    let mut suggested_actions = Vec::new();
    if is_stale {
        suggested_actions.push(SuggestedAction {
            action: "refresh".into(),
            priority: ActionPriority::High,
            reason: "content has crossed the stale threshold".into(),
            confidence: 0.8,
        });
    }
    if freshness_score < 0.1 && !matches!(chunk.outcome, Outcome::Success) {
        suggested_actions.push(SuggestedAction {
            action: "archive".into(),
            priority: ActionPriority::Medium,
            reason: "very low freshness on a non-success chunk".into(),
            confidence: 0.6,
        });
    }
    if freshness_score < 0.5 && freshness_score >= (1.0 - decay_rate * stale_threshold_days as f32).max(0.0) {
        suggested_actions.push(SuggestedAction {
            action: "verify".into(),
            priority: ActionPriority::Medium,
            reason: "freshness has degraded but not yet crossed the stale threshold".into(),
            confidence: 0.5,
        });
    }
    if technology.is_some() && freshness_score < 0.7 {
        suggested_actions.push(SuggestedAction {
            action: "update".into(),
            priority: ActionPriority::High,
            reason: "fast-moving technology with declining freshness".into(),
            confidence: 0.7,
        });
    }

    FreshnessStatus {
        is_fresh,
        is_stale,
        freshness_score,
        days_old,
        decay_rate,
        alerts,
        last_checked: now,
        suggested_actions,
    }
}

/// Reset a chunk's freshness by stamping `last_refreshed` and
/// persisting it through `Storage::update`.
///
/// # Errors
/// Propagates any error from the `Storage` collaborator.
pub async fn mark_refreshed(
    storage: &dyn crate::collaborators::Storage,
    chunk: &Chunk,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut updated = chunk.clone();
    updated
        .metadata
        .insert("last_refreshed".into(), now.to_rfc3339());
    storage.update(&updated).await
}

/// Overall health tag for a repository-wide freshness batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthTag {
    Excellent,
    Good,
    Poor,
    Critical,
}

fn health_tag(average_score: f32) -> HealthTag {
    if average_score >= 0.8 {
        HealthTag::Excellent
    } else if average_score >= 0.6 {
        HealthTag::Good
    } else if average_score >= 0.4 {
        HealthTag::Poor
    } else {
        HealthTag::Critical
    }
}

/// Aggregate freshness report across a set of chunks, e.g. one repository.
#[derive(Debug, Clone)]
pub struct RepositoryFreshnessReport {
    pub chunk_count: usize,
    pub average_score: f32,
    pub stale_count: usize,
    pub health: HealthTag,
}

/// Batch-check freshness across a repository's chunks (e.g. all chunks
/// in a repository). The Storage collaborator caps a single call at
/// 1000 chunks; callers needing more must page.
#[must_use]
pub fn check_repository_freshness(
    chunks: &[Chunk],
    now: DateTime<Utc>,
    config: &FreshnessConfig,
) -> RepositoryFreshnessReport {
    let capped: Vec<&Chunk> = chunks.iter().take(1000).collect();
    if capped.is_empty() {
        return RepositoryFreshnessReport {
            chunk_count: 0,
            average_score: 1.0,
            stale_count: 0,
            health: HealthTag::Excellent,
        };
    }
    let statuses: Vec<FreshnessStatus> = capped
        .iter()
        .map(|c| check_freshness(c, now, config))
        .collect();
    let average_score =
        statuses.iter().map(|s| s.freshness_score).sum::<f32>() / statuses.len() as f32;
    let stale_count = statuses.iter().filter(|s| s.is_stale).count();

    RepositoryFreshnessReport {
        chunk_count: capped.len(),
        average_score,
        stale_count,
        health: health_tag(average_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkKind;
    use std::collections::HashMap;

    fn nodejs_chunk(days_old: i64) -> Chunk {
        Chunk {
            id: "c1".into(),
            session_id: "s1".into(),
            repository: "acme/app".into(),
            content: "Fixed a bug in the Node.js Express.js middleware for auth".into(),
            summary: None,
            timestamp: Utc::now() - chrono::Duration::days(days_old),
            kind: ChunkKind::Solution,
            outcome: Outcome::Success,
            tags: vec![],
            files_modified: vec![],
            tools_used: vec![],
            quality: None,
            confidence: None,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn scenario_s4_nodejs_decay_at_120_days() {
        let chunk = nodejs_chunk(120);
        let status = check_freshness(&chunk, Utc::now(), &FreshnessConfig::default());
        assert!(status.freshness_score < 0.7);
        assert!(status.is_stale);
        assert!(status
            .alerts
            .iter()
            .any(|a| a.alert_type == "technology_version_stale"));
        assert!(status
            .suggested_actions
            .iter()
            .any(|a| a.action == "update" && a.priority == ActionPriority::High));
    }

    #[test]
    fn mark_refreshed_then_check_within_30_days_is_fresh() {
        let mut chunk = nodejs_chunk(120);
        chunk
            .metadata
            .insert("last_refreshed".into(), Utc::now().to_rfc3339());
        let status = check_freshness(&chunk, Utc::now(), &FreshnessConfig::default());
        assert!(status.is_fresh);
    }

    #[test]
    fn repository_batch_reports_health_tag() {
        let chunks = vec![nodejs_chunk(1), nodejs_chunk(1), nodejs_chunk(1)];
        let report = check_repository_freshness(&chunks, Utc::now(), &FreshnessConfig::default());
        assert_eq!(report.health, HealthTag::Excellent);
    }

    #[test]
    fn empty_repository_batch_is_handled() {
        let report = check_repository_freshness(&[], Utc::now(), &FreshnessConfig::default());
        assert_eq!(report.chunk_count, 0);
    }
}
