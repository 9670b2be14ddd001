//! CAELUS Semantic Matcher
//!
//! Decides requirements that deterministic rules cannot: qualitative and
//! structural clauses, and quantitative clauses whose evidence carries no
//! usable number.
//!
//! # Pipeline
//!
//! 1. Embed the requirement statement
//! 2. Retrieve the top-K nearest evidence items by cosine similarity
//! 3. Gate on a similarity floor (no candidate above it means an
//!    indeterminate verdict with confidence 0, and no judgment call)
//! 4. Ask the external judgment capability and parse its JSON response
//! 5. Cap the reported confidence by `best_similarity * trust_factor`
//!
//! The capability's outcome and rationale are carried into the verdict
//! verbatim; only its confidence is adjusted.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod prompt;

pub use config::MatcherConfig;
pub use error::MatcherError;
pub use matcher::SemanticMatcher;
pub use parser::{parse_judgment, JudgmentResponse};
pub use prompt::PromptBuilder;
