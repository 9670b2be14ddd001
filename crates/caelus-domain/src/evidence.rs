//! Evidence module - factual statements extracted from design documents

use std::fmt;

/// Stable identifier for an evidence item.
///
/// Like requirement ids these are caller-supplied citations (for example
/// `"DS-2.4"`). Lexicographic ordering is used to break retrieval ties
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EvidenceId(String);

impl EvidenceId {
    /// Create an evidence id from a source citation string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying citation string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EvidenceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A structured numeric value extracted from an evidence statement.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericValue {
    /// The extracted magnitude.
    pub value: f64,
    /// Unit symbol as written in the source, e.g. `"mm"` or `"hours"`.
    pub unit: String,
}

impl NumericValue {
    /// Create a numeric value with its source unit.
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// A single factual statement extracted from a design specification.
///
/// Evidence items are owned exclusively by the Evidence Index and immutable
/// once indexed. The semantic vector is computed at ingestion time by the
/// external embedding capability; the index never computes embeddings.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceItem {
    /// Stable unique identifier.
    pub id: EvidenceId,

    /// Citation into the source design document.
    pub citation: String,

    /// Normalized statement text.
    pub statement: String,

    /// Extracted structured value, when the statement is numeric.
    pub numeric: Option<NumericValue>,

    /// Precomputed semantic vector for the statement text.
    pub vector: Vec<f32>,
}

impl EvidenceItem {
    /// Create a new evidence item.
    pub fn new(
        id: EvidenceId,
        citation: impl Into<String>,
        statement: impl Into<String>,
        numeric: Option<NumericValue>,
        vector: Vec<f32>,
    ) -> Self {
        Self {
            id,
            citation: citation.into(),
            statement: statement.into(),
            numeric,
            vector,
        }
    }
}
