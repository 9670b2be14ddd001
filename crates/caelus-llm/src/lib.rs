//! CAELUS Judgment Provider Layer
//!
//! Pluggable backends for the external judgment capability.
//!
//! # Architecture
//!
//! This crate provides implementations of the `JudgmentProvider` trait from
//! `caelus-domain`. Providers transport raw model text; interpreting that
//! text is the Semantic Matcher's job.
//!
//! # Providers
//!
//! - `MockJudge`: Deterministic mock for testing
//! - `OllamaJudge`: Local Ollama API integration
//!
//! An Ollama-backed embedding model, `OllamaEmbedder`, lives here too so all
//! network-facing model clients share one crate.
//!
//! # Examples
//!
//! ```
//! use caelus_llm::MockJudge;
//! use caelus_domain::traits::JudgmentProvider;
//!
//! let judge = MockJudge::new(r#"{"outcome": "compliant", "rationale": "ok"}"#);
//! let result = judge.judge("Walls must be thick", &[]).unwrap();
//! assert!(result.contains("compliant"));
//! ```

#![warn(missing_docs)]

pub mod ollama;

use caelus_domain::traits::JudgmentProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::{OllamaEmbedder, OllamaJudge};

/// Errors that can occur while calling a judgment backend
#[derive(Error, Debug)]
pub enum JudgeError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the backend
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available at the endpoint
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Judgment error: {0}")]
    Other(String),
}

/// Mock judgment provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Responses are keyed by requirement text, matched by substring, so tests
/// can script a verdict per requirement statement regardless of prompt
/// scaffolding or which evidence accompanies it.
///
/// # Examples
///
/// ```
/// use caelus_llm::MockJudge;
/// use caelus_domain::traits::JudgmentProvider;
///
/// let mut judge = MockJudge::default();
/// judge.add_response("Operators shall be trained", r#"{"outcome": "compliant", "rationale": "training program documented"}"#);
/// let out = judge.judge("Operators shall be trained", &[]).unwrap();
/// assert!(out.contains("training program"));
/// ```
#[derive(Debug, Clone)]
pub struct MockJudge {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockJudge {
    /// Create a new MockJudge with a fixed response for all requirements
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a specific response for a given requirement text
    pub fn add_response(&mut self, requirement_text: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(requirement_text.into(), response.into());
    }

    /// Configure to return an error for a specific requirement text
    pub fn add_error(&mut self, requirement_text: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(requirement_text.into(), "ERROR".to_string());
    }

    /// Get the number of times judge was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockJudge {
    fn default() -> Self {
        Self::new(r#"{"outcome": "indeterminate", "rationale": "no scripted response"}"#)
    }
}

impl JudgmentProvider for MockJudge {
    type Error = JudgeError;

    fn judge(
        &self,
        requirement_text: &str,
        _evidence_texts: &[String],
    ) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        let responses = self.responses.lock().unwrap();
        let mut matches: Vec<(&String, &String)> = responses
            .iter()
            .filter(|(key, _)| requirement_text.contains(key.as_str()))
            .collect();
        // Longest key wins when several match
        matches.sort_by_key(|(key, _)| std::cmp::Reverse(key.len()));

        if let Some((_, response)) = matches.first() {
            if *response == "ERROR" {
                return Err(JudgeError::Other("Mock error".to_string()));
            }
            return Ok((*response).clone());
        }

        Ok(self.default_response.clone())
    }
}
