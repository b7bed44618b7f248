//! External collaborator contracts.
//!
//! The core treats chunk persistence, vector retrieval, embedding
//! generation, and LLM-backed inference as collaborators it consumes
//! through narrow traits. Production implementations (a durable store,
//! a real embedding model, an LLM client) live outside this crate;
//! [`mock`] provides minimal in-memory implementations for tests and
//! doctests.

pub mod ai;
pub mod embeddings;
pub mod mock;
pub mod storage;

pub use ai::{Ai, AiRequest, AiResponse};
pub use embeddings::Embeddings;
pub use storage::{PatternStorage, RelationshipQuery, SearchHit, Storage};
