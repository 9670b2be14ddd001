//! CAELUS Rule Evaluator
//!
//! Deterministic evaluation of quantitative requirement clauses against
//! numeric design evidence.
//!
//! # Overview
//!
//! The evaluator extracts numeric values and units from candidate evidence,
//! converts units into the requirement's unit family, and applies the
//! requirement's comparator against its threshold. It is a pure function:
//! it never calls external services, and identical inputs always yield
//! identical outcomes. That purity is why its test suite can be exhaustive
//! rather than sampled.
//!
//! # Outcomes
//!
//! "No usable numeric evidence" is a first-class [`RuleOutcome::Indeterminate`],
//! not an error. Errors are reserved for genuinely exceptional conditions:
//! a non-quantitative clause reaching the evaluator, or evidence whose
//! units cannot be related to the requirement's at all.

#![warn(missing_docs)]

mod evaluator;
mod extract;
pub mod unit;

pub use evaluator::{evaluate, RuleError, RuleMatch, RuleOutcome};
pub use extract::extract_numerics;
pub use unit::UnitFamily;
