//! The Pattern Engine subsystem: recognition, Bayesian learning,
//! evolution, sequence-template matching, and the batched-learning queue.

pub mod batch;
pub mod cache;
pub mod config;
pub mod engine;
pub mod sequence;
pub mod similarity;
pub mod types;

pub use config::PatternEngineConfig;
pub use engine::PatternEngine;
pub use types::{
    ConfidenceLevel, DetectionMethod, Pattern, PatternExample, PatternKind, PatternOccurrence,
    PatternRelationship, RelationshipKind, ValidationStatus,
};
