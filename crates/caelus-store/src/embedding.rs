//! Text-to-vector boundary for semantic retrieval
//!
//! The engine never computes embeddings itself; it consumes an
//! [`EmbeddingModel`] implementation. Real models live behind HTTP in
//! `caelus-llm`. This module defines the trait and a hash-based mock that
//! produces deterministic vectors, which is what makes retrieval test
//! fixtures reproducible: identical statement text always yields an
//! identical vector.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The embedding capability failed or was unreachable
    #[error("Embedding service failed: {0}")]
    ServiceFailed(String),
}

/// Trait for embedding models.
///
/// Implementations must be deterministic for identical input text; the
/// assessment pipeline relies on that for reproducible retrieval.
pub trait EmbeddingModel {
    /// Generate an embedding vector for the given text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Dimension of vectors produced by this model.
    fn dimension(&self) -> usize;
}

/// Deterministic hash-based embedding model for tests and offline runs.
///
/// Vectors are:
/// - **Deterministic**: same text always produces the same vector
/// - **Normalized**: unit length, so cosine similarity is well behaved
/// - **Diverse**: different texts produce different vectors
///
/// There is no semantic signal in these vectors; they exist so the full
/// pipeline can run without a model service.
pub struct MockEmbeddingModel {
    dimension: usize,
}

impl MockEmbeddingModel {
    /// Create a mock model producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Hash text with a seed to get a deterministic f32 in [-1, 1].
    fn hash_with_seed(text: &str, seed: u64) -> f32 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        seed.hash(&mut hasher);
        let hash_value = hasher.finish();

        let normalized = (hash_value as f64 / u64::MAX as f64) * 2.0 - 1.0;
        normalized as f32
    }
}

impl EmbeddingModel for MockEmbeddingModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Empty text cannot be embedded".to_string(),
            ));
        }

        let mut vector = Vec::with_capacity(self.dimension);
        for i in 0..self.dimension {
            vector.push(Self::hash_with_seed(text, i as u64));
        }

        // Normalize to unit length for cosine similarity
        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
