//! Trait definitions for external capabilities
//!
//! These traits define the boundaries between the reasoning engine and the
//! external services it consumes. Infrastructure implementations live in
//! other crates.

/// Trait for the external judgment capability.
///
/// Given a requirement statement and candidate evidence statements, the
/// capability returns raw model text containing its verdict and rationale.
/// The Semantic Matcher owns parsing that text; providers only transport it.
///
/// Providers may be non-deterministic across calls. The engine tolerates
/// and logs variance rather than assuming stability.
pub trait JudgmentProvider {
    /// Error type for judgment operations
    type Error;

    /// Ask the capability to judge a requirement against evidence.
    ///
    /// Returns the raw model output. Implementations must not interpret
    /// or rewrite it.
    fn judge(&self, requirement_text: &str, evidence_texts: &[String])
        -> Result<String, Self::Error>;
}
