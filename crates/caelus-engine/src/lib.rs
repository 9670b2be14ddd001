//! CAELUS Compliance Aggregator
//!
//! Orchestrates a full assessment run: dispatches every active requirement
//! to the deterministic rule path or the semantic path, applies
//! graph-aware adjustments (dependency downgrades, conflict warnings), and
//! derives per-category and overall scores.
//!
//! # Guarantees
//!
//! - One verdict per active requirement, always, in requirement-id order
//! - A failing per-requirement decision becomes an indeterminate verdict;
//!   it never aborts the run
//! - Indeterminate verdicts never count toward scores
//! - Judgment calls are bounded by `max_concurrency` and retried with
//!   exponential backoff

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;

pub use config::EngineConfig;
pub use engine::ComplianceEngine;
pub use error::EngineError;
pub use metrics::AssessmentMetrics;
