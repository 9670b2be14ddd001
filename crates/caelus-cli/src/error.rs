//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Graph construction failed; assessment does not proceed on a
    /// malformed graph
    #[error("Graph construction error: {0}")]
    Graph(String),

    /// Evidence indexing failed
    #[error("Evidence indexing error: {0}")]
    Index(String),

    /// Embedding the evidence failed
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Engine error
    #[error("Assessment error: {0}")]
    Engine(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
