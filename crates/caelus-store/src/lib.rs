//! CAELUS Storage Layer
//!
//! In-memory stores for the compliance reasoning engine:
//!
//! - [`RequirementGraph`] owns requirement records and their typed
//!   relationship edges, and enforces the structural invariants the
//!   aggregation pass depends on (acyclic dependencies, one supersessor
//!   per requirement).
//! - [`EvidenceIndex`] owns evidence records with their precomputed
//!   semantic vectors and answers exact nearest-neighbor queries.
//! - [`embedding`] defines the text-to-vector boundary and a
//!   deterministic mock model for test fixtures.
//!
//! Both stores are write-only during ingestion and read-only during
//! assessment, so concurrent readers need no locking once ingestion
//! completes.

#![warn(missing_docs)]

pub mod embedding;
pub mod graph;
pub mod index;

pub use graph::{GraphError, RequirementGraph};
pub use index::{EvidenceIndex, IndexError};
