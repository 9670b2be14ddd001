//! Evidence index for semantic retrieval
//!
//! Stores evidence items with their precomputed vectors and answers exact
//! cosine nearest-neighbor queries. Exactness matters here: retrieval order
//! feeds the auditable verdict trail, so an approximate index with
//! run-to-run variance would leak nondeterminism into the output. At the
//! corpus sizes a single assessment sees (hundreds to low thousands of
//! statements), a full scan is cheap.

use caelus_domain::{EvidenceId, EvidenceItem};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by the evidence index
#[derive(Error, Debug)]
pub enum IndexError {
    /// Retrieval attempted with no items indexed
    #[error("No evidence indexed")]
    EmptyIndex,

    /// Vector length does not match the index dimension
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },

    /// An evidence item with this id is already indexed
    #[error("Duplicate evidence id: {0}")]
    DuplicateId(EvidenceId),
}

/// In-memory evidence index with exact cosine retrieval.
///
/// The index owns its items exclusively; items are immutable once indexed.
/// Vectors come from the external embedding capability at ingestion time;
/// the index itself never computes embeddings.
///
/// # Examples
///
/// ```
/// use caelus_domain::{EvidenceId, EvidenceItem};
/// use caelus_store::EvidenceIndex;
///
/// let mut index = EvidenceIndex::new(3);
/// index.index(EvidenceItem::new(
///     EvidenceId::new("DS-1"),
///     "Design Spec §1",
///     "Wall thickness: 1.35 m",
///     None,
///     vec![1.0, 0.0, 0.0],
/// )).unwrap();
///
/// let hits = index.nearest(&[1.0, 0.0, 0.0], 5).unwrap();
/// assert_eq!(hits[0].0.as_str(), "DS-1");
/// ```
#[derive(Debug)]
pub struct EvidenceIndex {
    /// Expected vector dimension
    dimension: usize,

    /// Items in insertion order
    items: Vec<EvidenceItem>,

    /// Id -> position in `items`
    by_id: HashMap<EvidenceId, usize>,
}

impl EvidenceIndex {
    /// Create an empty index for vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            items: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// The vector dimension this index expects.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the index holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an evidence item to the index.
    ///
    /// The item's vector must match the index dimension.
    pub fn index(&mut self, item: EvidenceItem) -> Result<(), IndexError> {
        if item.vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: item.vector.len(),
            });
        }
        if self.by_id.contains_key(&item.id) {
            return Err(IndexError::DuplicateId(item.id));
        }

        self.by_id.insert(item.id.clone(), self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Look up an indexed item by id.
    pub fn get(&self, id: &EvidenceId) -> Option<&EvidenceItem> {
        self.by_id.get(id).map(|&idx| &self.items[idx])
    }

    /// All indexed items, in insertion order.
    pub fn items(&self) -> &[EvidenceItem] {
        &self.items
    }

    /// The `k` items most similar to `query`, by cosine similarity,
    /// in descending similarity order.
    ///
    /// Ties are broken by evidence id ascending so the ranking is
    /// deterministic. Fails with [`IndexError::EmptyIndex`] when nothing
    /// is indexed; never silently returns an empty list.
    pub fn nearest(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<(EvidenceId, f32)>, IndexError> {
        if self.items.is_empty() {
            return Err(IndexError::EmptyIndex);
        }
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(EvidenceId, f32)> = self
            .items
            .iter()
            .map(|item| (item.id.clone(), cosine_similarity(query, &item.vector)))
            .collect();

        scored.sort_by(|(id_a, sim_a), (id_b, sim_b)| {
            sim_b
                .partial_cmp(sim_a)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| id_a.cmp(id_b))
        });
        scored.truncate(k);

        Ok(scored)
    }
}

/// Cosine similarity between two equal-length vectors.
///
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have same length");

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: nearest() output is sorted by descending similarity,
        /// with ties in ascending id order.
        #[test]
        fn test_nearest_ordering_property(
            vectors in proptest::collection::vec(
                proptest::collection::vec(-1.0f32..1.0, 4), 1..16
            ),
            query in proptest::collection::vec(-1.0f32..1.0, 4),
        ) {
            let mut index = EvidenceIndex::new(4);
            for (i, v) in vectors.iter().enumerate() {
                index
                    .index(EvidenceItem::new(
                        EvidenceId::new(format!("DS-{:03}", i)),
                        "cite",
                        "stmt",
                        None,
                        v.clone(),
                    ))
                    .unwrap();
            }

            let hits = index.nearest(&query, vectors.len()).unwrap();
            for pair in hits.windows(2) {
                let (ref id_a, sim_a) = pair[0];
                let (ref id_b, sim_b) = pair[1];
                prop_assert!(
                    sim_a > sim_b || (sim_a == sim_b && id_a < id_b),
                    "out of order: ({}, {}) before ({}, {})", id_a, sim_a, id_b, sim_b
                );
            }
        }
    }
}
