//! Error types for the Compliance Aggregator

use thiserror::Error;

/// Errors that can occur during an assessment run
///
/// Per-requirement failures never surface here; they become indeterminate
/// verdicts so one flaky judgment call or evidence gap cannot sink a whole
/// run. Once ingestion has succeeded, an assessment always completes.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A worker task panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Worker(String),
}
