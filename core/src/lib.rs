//! # memory-intel-core
//!
//! Conversational-memory intelligence core: the leaf-to-root pipeline
//! that turns a stream of conversation [`chunk::Chunk`]s into patterns,
//! a knowledge graph, cross-repository insight, confidence/freshness
//! scores, conflicts and resolutions, and explained search results.
//!
//! This crate is deliberately *in-process and collaborator-driven*: it
//! never talks to a database, an embedding model, or an LLM directly.
//! Instead it consumes the [`collaborators::Storage`],
//! [`collaborators::Embeddings`], and [`collaborators::Ai`] traits, and
//! degrades gracefully whenever the latter two are absent (see the
//! `mock` module for minimal stand-ins used by this crate's own tests).
//!
//! ## Subsystems
//!
//! | module | responsibility |
//! |---|---|
//! | [`extraction`] | regex-driven concept/entity extraction (leaf) |
//! | [`confidence`] | per-chunk multi-factor confidence scoring |
//! | [`freshness`] | technology-aware staleness detection and alerts |
//! | [`pattern`] | recognize/learn/evolve/suggest patterns |
//! | [`graph`] | three-pass knowledge graph construction and traversal |
//! | [`conflict`] | pairwise conflict detection and resolution strategies |
//! | [`multi_repo`] | cross-repository pattern aggregation |
//! | [`search`] | explained search result decoration |
//! | [`catalog`] | built-in seed patterns |
//!
//! Dependency order follows the table in the design document: leaves
//! ([`extraction`], [`confidence`], [`freshness`]) have no in-crate
//! dependencies; [`pattern`] and [`graph`] depend on them;
//! [`conflict`], [`multi_repo`], and [`search`] sit on top.

#![warn(missing_docs)]

pub mod catalog;
pub mod chunk;
pub mod collaborators;
pub mod confidence;
pub mod conflict;
pub mod config;
pub mod error;
pub mod extraction;
pub mod freshness;
pub mod graph;
pub mod multi_repo;
pub mod pattern;
pub mod search;

pub use chunk::{Chunk, ChunkKind, ChunkMetadata, ConfidenceInfo, Outcome, QualityInfo};
pub use config::MemoryIntelConfig;
pub use error::{Error, Result};
