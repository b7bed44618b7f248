//! Sequence recognition: classify each chunk into an action and
//! match the resulting sequence against built-in templates via
//! longest-common-subsequence modulo semantic equivalence groups.

use std::sync::LazyLock;

use regex::Regex;

use crate::chunk::Chunk;

/// Closed set of per-chunk actions derived by regex classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ReportProblem,
    AnalyzeProblem,
    ProposeSolution,
    ImplementSolution,
    VerifySolution,
    PlanApproach,
    ExecuteSteps,
    ReviewResults,
    GeneralInteraction,
}

impl Action {
    /// Semantic equivalence group used when matching templates: actions
    /// in the same group are interchangeable for LCS purposes.
    fn equivalence_group(self) -> u8 {
        match self {
            Action::ReportProblem | Action::AnalyzeProblem => 0,
            Action::ProposeSolution | Action::PlanApproach => 1,
            Action::ImplementSolution | Action::ExecuteSteps => 2,
            Action::VerifySolution | Action::ReviewResults => 3,
            Action::GeneralInteraction => 4,
        }
    }
}

static RULES: LazyLock<Vec<(Action, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Action::ReportProblem,
            Regex::new(r"(?i)\b(bug|issue|problem|error|fails?|broken|crash)\b").unwrap(),
        ),
        (
            Action::AnalyzeProblem,
            Regex::new(r"(?i)\b(looking into|investigat\w*|analyz\w*|diagnos\w*)\b").unwrap(),
        ),
        (
            Action::ProposeSolution,
            Regex::new(r"(?i)\b(propos\w*|suggest\w*|could try|recommend\w*)\b").unwrap(),
        ),
        (
            Action::ImplementSolution,
            Regex::new(r"(?i)\b(add(?:ed)?|implement\w*|fix(?:ed)?|chang\w*|refactor\w*)\b")
                .unwrap(),
        ),
        (
            Action::VerifySolution,
            Regex::new(r"(?i)\b(verif\w*|confirm\w*|test(?:ed|ing)?|works?\b|passes?)\b").unwrap(),
        ),
        (
            Action::PlanApproach,
            Regex::new(r"(?i)\b(plan\w*|approach|strategy|will do|steps? to)\b").unwrap(),
        ),
        (
            Action::ExecuteSteps,
            Regex::new(r"(?i)\b(execut\w*|run(?:ning)?|perform\w*|carry\w* out)\b").unwrap(),
        ),
        (
            Action::ReviewResults,
            Regex::new(r"(?i)\b(review\w*|evaluat\w*|assess\w*|results? show)\b").unwrap(),
        ),
    ]
});

/// Classify a single chunk's action from its content.
#[must_use]
pub fn classify_action(chunk: &Chunk) -> Action {
    for (action, regex) in RULES.iter() {
        if regex.is_match(&chunk.content) {
            return *action;
        }
    }
    Action::GeneralInteraction
}

/// One built-in sequence template.
#[derive(Debug, Clone)]
pub struct SequenceTemplate {
    pub name: &'static str,
    pub pattern_kind: &'static str,
    pub actions: &'static [Action],
}

pub const PROBLEM_SOLUTION_TEMPLATE: SequenceTemplate = SequenceTemplate {
    name: "problem_solution",
    pattern_kind: "problem_solution",
    actions: &[
        Action::ReportProblem,
        Action::AnalyzeProblem,
        Action::ProposeSolution,
        Action::ImplementSolution,
        Action::VerifySolution,
    ],
};

pub const DEBUGGING_TEMPLATE: SequenceTemplate = SequenceTemplate {
    name: "debugging",
    pattern_kind: "debugging",
    actions: &[
        Action::ReportProblem,
        Action::AnalyzeProblem,
        Action::ImplementSolution,
        Action::VerifySolution,
    ],
};

pub const WORKFLOW_TEMPLATE: SequenceTemplate = SequenceTemplate {
    name: "workflow",
    pattern_kind: "workflow",
    actions: &[
        Action::PlanApproach,
        Action::ExecuteSteps,
        Action::ReviewResults,
    ],
};

const TEMPLATES: &[SequenceTemplate] = &[
    PROBLEM_SOLUTION_TEMPLATE,
    DEBUGGING_TEMPLATE,
    WORKFLOW_TEMPLATE,
];

/// Longest common subsequence length, comparing actions by semantic
/// equivalence group rather than strict identity.
fn lcs_len(a: &[Action], b: &[Action]) -> usize {
    let n = a.len();
    let m = b.len();
    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            if a[i - 1].equivalence_group() == b[j - 1].equivalence_group() {
                table[i][j] = table[i - 1][j - 1] + 1;
            } else {
                table[i][j] = table[i - 1][j].max(table[i][j - 1]);
            }
        }
    }
    table[n][m]
}

/// One matched template with its LCS ratio.
#[derive(Debug, Clone)]
pub struct TemplateMatch {
    pub template_name: &'static str,
    pub pattern_kind: &'static str,
    pub ratio: f32,
}

/// Minimum LCS ratio for a template to count as matched.
pub const MATCH_RATIO_THRESHOLD: f32 = 0.6;

/// Classify every chunk's action and match the resulting sequence
/// against the three built-in templates.
#[must_use]
pub fn match_templates(chunks: &[Chunk]) -> Vec<TemplateMatch> {
    let actions: Vec<Action> = chunks.iter().map(classify_action).collect();
    let mut matches = Vec::new();
    for template in TEMPLATES {
        let lcs = lcs_len(&actions, template.actions);
        let ratio = lcs as f32 / template.actions.len() as f32;
        if ratio >= MATCH_RATIO_THRESHOLD {
            matches.push(TemplateMatch {
                template_name: template.name,
                pattern_kind: template.pattern_kind,
                ratio,
            });
        }
    }
    matches.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).unwrap_or(std::cmp::Ordering::Equal));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkKind, Outcome};
    use std::collections::HashMap;

    fn chunk(content: &str) -> Chunk {
        Chunk {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: "s1".into(),
            repository: "repo".into(),
            content: content.into(),
            summary: None,
            timestamp: chrono::Utc::now(),
            kind: ChunkKind::Discussion,
            outcome: Outcome::InProgress,
            tags: vec![],
            files_modified: vec![],
            tools_used: vec![],
            quality: None,
            confidence: None,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn scenario_s1_problem_solution_sequence_matches() {
        let chunks = vec![
            chunk("there is a bug where login fails"),
            chunk("looking into it"),
            chunk("add nil check in auth()"),
            chunk("verified, login works"),
        ];
        let matches = match_templates(&chunks);
        assert!(matches
            .iter()
            .any(|m| m.pattern_kind == "problem_solution" && m.ratio >= MATCH_RATIO_THRESHOLD));
    }

    #[test]
    fn classify_action_recognizes_problem_reports() {
        let c = chunk("there is a bug where login fails");
        assert_eq!(classify_action(&c), Action::ReportProblem);
    }
}
