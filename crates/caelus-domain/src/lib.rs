//! CAELUS Domain Layer
//!
//! This crate contains the core data model for the CAELUS compliance
//! reasoning engine. It has near-zero external dependencies and defines the
//! fundamental concepts, value objects, and trait interfaces that all other
//! layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Requirement**: a single regulatory obligation, with a typed clause
//!   (quantitative / qualitative / structural)
//! - **Evidence Item**: a factual statement extracted from a design
//!   specification, optionally carrying a numeric value and unit
//! - **Relationship Edge**: typed link between requirements
//!   (supersedes, depends_on, cross_references, conflicts_with)
//! - **Verdict**: the engine's determination for one requirement in one run
//! - **Compliance Assessment**: the full verdict set plus derived scores
//!
//! ## Architecture
//!
//! - Pure business types only, no infrastructure
//! - Infrastructure implementations (stores, indexes, model clients) live
//!   in other crates
//! - Trait definitions for all external capabilities

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assessment;
pub mod evidence;
pub mod relationship;
pub mod requirement;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use assessment::{AssessmentSummary, ComplianceAssessment, ConflictWarning, RunId};
pub use evidence::{EvidenceId, EvidenceItem, NumericValue};
pub use relationship::{Edge, EdgeKind};
pub use requirement::{ClauseKind, Comparator, Requirement, RequirementId, Status};
pub use verdict::{Method, Outcome, Verdict};
