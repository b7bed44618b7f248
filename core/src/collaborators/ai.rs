//! The `AI` collaborator: an LLM adapter used for pattern-type
//! inference. The core degrades gracefully whenever this
//! collaborator is absent or returns an error — AI-derived
//! patterns are replaced by sequence-template matches.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// One request to the AI collaborator.
#[derive(Debug, Clone)]
pub struct AiRequest {
    pub messages: Vec<AiMessage>,
    pub metadata: Value,
}

/// A single chat-style message.
#[derive(Debug, Clone)]
pub struct AiMessage {
    pub role: String,
    pub content: String,
}

/// The AI collaborator's response.
#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
    pub tokens_used: usize,
}

/// LLM adapter used for pattern identification, learning, and
/// suggestion. Optional at every call site.
#[async_trait]
pub trait Ai: Send + Sync {
    /// # Errors
    /// Returns a collaborator error if the request fails.
    async fn process_request(&self, request: AiRequest) -> Result<AiResponse>;
}
