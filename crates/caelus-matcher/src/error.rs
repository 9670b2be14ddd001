//! Error types for the Semantic Matcher

use thiserror::Error;

/// Errors that can occur during semantic matching
#[derive(Error, Debug)]
pub enum MatcherError {
    /// Embedding the requirement text failed
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Retrieval against the evidence index failed
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// The judgment capability failed after retries
    #[error("Judgment error: {0}")]
    Judgment(String),

    /// The judgment call exceeded its timeout
    #[error("Judgment timeout")]
    Timeout,

    /// The judgment response was not in the expected format
    #[error("Invalid judgment format: {0}")]
    InvalidFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for MatcherError {
    fn from(e: serde_json::Error) -> Self {
        MatcherError::InvalidFormat(e.to_string())
    }
}
