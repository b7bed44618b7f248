//! Error taxonomy for the memory intelligence core.

use uuid::Uuid;

/// Result type alias used throughout the core.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds produced by the core: invalid input, capacity exceeded,
/// not found, collaborator failure, cancelled/timeout, and integrity
/// violation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller supplied an empty id, nil chunk, or invalid depth.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A bounded collection (graph nodes, repositories) is at capacity.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// A chunk, pattern, or relation endpoint could not be located.
    #[error("not found: {0}")]
    NotFound(String),

    /// The `Storage`, `Embeddings`, or `AI` collaborator failed.
    #[error("collaborator failure: {0}")]
    Collaborator(String),

    /// An operation was cancelled or exceeded its deadline.
    #[error("cancelled or timed out: {0}")]
    Cancelled(String),

    /// A stored record violated an invariant (confidence out of range,
    /// orphan relation) and was skipped rather than committed.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// Serialization failure on import/export.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether a caller may reasonably retry this operation.
    ///
    /// Collaborator failures are retryable by the caller (the failing
    /// collaborator may recover); everything else reflects a caller or
    /// data error that will not change on retry.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Collaborator(_) | Error::Cancelled(_))
    }

    /// Build a [`Error::NotFound`] for a chunk id.
    #[must_use]
    pub fn chunk_not_found(id: &str) -> Self {
        Error::NotFound(format!("chunk {id}"))
    }

    /// Build a [`Error::NotFound`] for a pattern id.
    #[must_use]
    pub fn pattern_not_found(id: Uuid) -> Self {
        Error::NotFound(format!("pattern {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_errors_are_recoverable() {
        let err = Error::Collaborator("ai timeout".into());
        assert!(err.is_recoverable());
    }

    #[test]
    fn invalid_input_is_not_recoverable() {
        let err = Error::InvalidInput("empty id".into());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn not_found_helpers_format_message() {
        let id = Uuid::nil();
        let err = Error::pattern_not_found(id);
        assert!(err.to_string().contains(&id.to_string()));
    }
}
