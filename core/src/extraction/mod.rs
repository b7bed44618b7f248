//! Deterministic, regex-driven extraction of entities and concepts
//! from arbitrary text.
//!
//! A handful of classifier regexes are compiled once and scanned per
//! call to extract concepts, technical terms, files, functions,
//! variables, and commands.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Closed set of concept type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    TechnicalTerm,
    ArchitecturalConcept,
    Action,
    AbstractConcept,
    KeyPhrase,
}

impl ConceptKind {
    /// Fixed confidence per category.
    #[must_use]
    pub fn base_confidence(self) -> f32 {
        match self {
            ConceptKind::TechnicalTerm => 0.8,
            ConceptKind::ArchitecturalConcept => 0.7,
            ConceptKind::Action => 0.6,
            ConceptKind::AbstractConcept => 0.5,
            ConceptKind::KeyPhrase => 0.4,
        }
    }
}

/// An extracted concept: name, type tag, description, fixed confidence,
/// and a free-form context map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    pub kind: ConceptKind,
    pub description: String,
    pub confidence: f32,
    pub context: HashMap<String, String>,
}

impl Concept {
    fn new(name: impl Into<String>, kind: ConceptKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            confidence: kind.base_confidence(),
            context: HashMap::new(),
        }
    }
}

static TECHNICAL_TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(api|sdk|database|cache|queue|microservice|container|kubernetes|docker|graphql|rest|grpc|websocket|oauth|jwt|cors|middleware|orm|schema|migration|index|transaction)\b")
        .expect("valid technical-term regex")
});

static ARCHITECTURAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(architecture|design pattern|microservices?|monolith|layered|event-driven|pub/?sub|pipeline|dependency injection|singleton|factory|observer|strategy pattern)\b")
        .expect("valid architectural regex")
});

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(implement(?:ed|ing)?|refactor(?:ed|ing)?|fix(?:ed|ing)?|debug(?:ged|ging)?|optimiz(?:e|ed|ing)|test(?:ed|ing)?|deploy(?:ed|ing)?|migrat(?:e|ed|ing))\b")
        .expect("valid action regex")
});

static ABSTRACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(performance|scalability|reliability|security|maintainability|consistency|correctness|usability)\b")
        .expect("valid abstract-concept regex")
});

static FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[\w./-]+\.(rs|ts|tsx|js|jsx|py|go|java|rb|c|cc|cpp|h|hpp|toml|yaml|yml|json|md|sql)\b")
        .expect("valid file regex")
});

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([a-zA-Z_][a-zA-Z0-9_]*)\s*\(").expect("valid function-call regex")
});

static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:let|const|var)\s+([a-zA-Z_][a-zA-Z0-9_]*)").expect("valid variable regex")
});

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*[$#>]\s*([a-zA-Z][\w.-]*(?:\s+[^\n]*)?)$").expect("valid command regex")
});

const NOISE_PHRASES: &[&str] = &[
    "the system",
    "the process",
    "the application",
    "the code",
    "the user",
    "the function",
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "then", "else", "for", "while", "this", "that",
];

const LANGUAGE_KEYWORDS: &[&str] = &[
    "let", "const", "var", "fn", "function", "return", "if", "else", "match", "for", "while",
    "struct", "enum", "impl", "pub", "mod", "use", "async", "await",
];

/// Extract concepts (technical terms, architectural concepts, actions,
/// abstract concepts, key phrases) from free text, deduplicated on
/// lowercased name.
#[must_use]
pub fn extract_concepts(text: &str) -> Vec<Concept> {
    let mut seen = std::collections::HashSet::new();
    let mut concepts = Vec::new();

    let mut push = |name: &str, kind: ConceptKind, description: String| {
        let key = name.to_lowercase();
        if seen.insert(key) {
            concepts.push(Concept::new(name.to_lowercase(), kind, description));
        }
    };

    for m in TECHNICAL_TERM_RE.find_iter(text) {
        push(
            m.as_str(),
            ConceptKind::TechnicalTerm,
            format!("technical term '{}'", m.as_str()),
        );
    }
    for m in ARCHITECTURAL_RE.find_iter(text) {
        push(
            m.as_str(),
            ConceptKind::ArchitecturalConcept,
            format!("architectural concept '{}'", m.as_str()),
        );
    }
    for m in ACTION_RE.find_iter(text) {
        push(
            m.as_str(),
            ConceptKind::Action,
            format!("action '{}'", m.as_str()),
        );
    }
    for m in ABSTRACT_RE.find_iter(text) {
        push(
            m.as_str(),
            ConceptKind::AbstractConcept,
            format!("abstract concept '{}'", m.as_str()),
        );
    }
    for phrase in extract_key_phrases(text) {
        push(
            &phrase.clone(),
            ConceptKind::KeyPhrase,
            format!("key phrase '{phrase}'"),
        );
    }

    concepts
}

/// Extract bare technical terms (no concept wrapping).
#[must_use]
pub fn extract_technical_terms(text: &str) -> Vec<String> {
    dedup_lower(TECHNICAL_TERM_RE.find_iter(text).map(|m| m.as_str().to_string()))
}

/// Extract short (2-4 word) noun-ish phrases, filtering common noise
/// phrases such as "the system" / "the process".
#[must_use]
pub fn extract_key_phrases(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();

    let mut phrases = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for window in words.windows(3) {
        let phrase = window.join(" ");
        if NOISE_PHRASES.contains(&phrase.as_str()) {
            continue;
        }
        if window.iter().all(|w| STOP_WORDS.contains(w)) {
            continue;
        }
        if seen.insert(phrase.clone()) {
            phrases.push(phrase);
        }
    }
    phrases
}

/// Extract file paths referenced in text.
#[must_use]
pub fn extract_files(text: &str) -> Vec<String> {
    dedup_lower(FILE_RE.find_iter(text).map(|m| m.as_str().to_string()))
}

/// Extract function-call-shaped identifiers.
#[must_use]
pub fn extract_functions(text: &str) -> Vec<String> {
    dedup_lower(
        FUNCTION_RE
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .filter(|name| !LANGUAGE_KEYWORDS.contains(&name.as_str())),
    )
}

/// Extract variable declarations (`let x`, `const y`, `var z`),
/// filtering stop words and language keywords.
#[must_use]
pub fn extract_variables(text: &str) -> Vec<String> {
    dedup_lower(
        VARIABLE_RE
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .filter(|name| {
                let lower = name.to_lowercase();
                !STOP_WORDS.contains(&lower.as_str()) && !LANGUAGE_KEYWORDS.contains(&lower.as_str())
            }),
    )
}

/// Extract shell commands written on their own line, prefixed by a
/// shell prompt marker (`$`, `#`, `>`).
#[must_use]
pub fn extract_commands(text: &str) -> Vec<String> {
    dedup_lower(
        COMMAND_RE
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str().trim().to_string())),
    )
}

fn dedup_lower(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let key = item.to_lowercase();
        if seen.insert(key.clone()) {
            out.push(key);
        }
    }
    out
}
