//! The `Embeddings` collaborator: fixed-dimension vector generation.

use async_trait::async_trait;

use crate::error::Result;

/// Generates a fixed-dimension embedding vector for arbitrary text.
/// Every call site branches cleanly on this collaborator being absent:
/// when no `Embeddings` is configured, callers fall back to keyword
/// overlap.
#[async_trait]
pub trait Embeddings: Send + Sync {
    /// # Errors
    /// Returns a collaborator error on backend failure.
    async fn generate(&self, text: &str) -> Result<Vec<f32>>;
}

/// Cosine similarity between two equal-length, non-zero vectors.
///
/// Returns `0.0` for mismatched lengths or a zero-magnitude vector
/// rather than dividing by zero.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    (dot / (mag_a * mag_b)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_is_symmetric() {
        let u = vec![1.0, 2.0, 3.0];
        let v = vec![4.0, -1.0, 0.5];
        assert!((cosine_similarity(&u, &v) - cosine_similarity(&v, &u)).abs() < 1e-6);
    }

    #[test]
    fn identical_vectors_give_similarity_one() {
        let u = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&u, &u) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_lengths_return_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn zero_vector_returns_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
