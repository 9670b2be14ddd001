//! Ollama Backend Implementation
//!
//! Integrates with Ollama's local API for both judgment calls and
//! evidence embeddings, so assessments run fully on-premises.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama API
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use caelus_llm::OllamaJudge;
//!
//! let judge = OllamaJudge::new("http://localhost:11434", "llama2");
//!
//! // The async path is `judge_async`; the `JudgmentProvider` impl wraps it
//! // in a blocking call for callers outside an async context.
//! ```

use crate::JudgeError;
use caelus_domain::traits::JudgmentProvider;
use caelus_store::embedding::{EmbeddingError, EmbeddingModel};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for judgment requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama-backed judgment provider
///
/// Sends the requirement and its candidate evidence to a local Ollama
/// instance and returns the raw model text unmodified.
pub struct OllamaJudge {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaJudge {
    /// Create a new Ollama judge
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama2", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a judge against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Send a prompt to the Ollama generate API
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Ollama is not running
    /// - the model is not available
    /// - network communication fails
    /// - the response body is not the expected shape
    pub async fn judge_async(&self, prompt: &str) -> Result<String, JudgeError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        // Retry with exponential backoff: 1s, 2s, 4s, ...
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        match response.json::<GenerateResponse>().await {
                            Ok(body) => return Ok(body.response),
                            Err(e) => {
                                return Err(JudgeError::InvalidResponse(format!(
                                    "Failed to parse response: {}",
                                    e
                                )));
                            }
                        }
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(JudgeError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(JudgeError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(JudgeError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| JudgeError::Communication("Max retries exceeded".to_string())))
    }

    fn build_prompt(requirement_text: &str, evidence_texts: &[String]) -> String {
        let mut prompt = String::new();
        prompt.push_str("Requirement:\n");
        prompt.push_str(requirement_text);
        prompt.push_str("\n\nEvidence:\n");
        for (i, text) in evidence_texts.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, text));
        }
        prompt
    }
}

impl JudgmentProvider for OllamaJudge {
    type Error = JudgeError;

    fn judge(
        &self,
        requirement_text: &str,
        evidence_texts: &[String],
    ) -> Result<String, Self::Error> {
        let prompt = Self::build_prompt(requirement_text, evidence_texts);
        // Blocking wrapper for the async call
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async { self.judge_async(&prompt).await })
    }
}

/// Ollama-backed embedding model
///
/// Calls the `/api/embeddings` endpoint. The vector dimension must be
/// declared up front so the Evidence Index can reject mismatched vectors
/// before they reach storage.
pub struct OllamaEmbedder {
    endpoint: String,
    model: String,
    dimension: usize,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    /// Create a new embedder
    ///
    /// `dimension` must match what the named model actually produces, e.g.
    /// 768 for `nomic-embed-text`.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            dimension,
            client,
        }
    }

    async fn embed_async(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/api/embeddings", self.endpoint);

        let request_body = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmbeddingError::ServiceFailed(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(EmbeddingError::ServiceFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::ServiceFailed(format!("Failed to parse response: {}", e)))?;

        if body.embedding.len() != self.dimension {
            return Err(EmbeddingError::ServiceFailed(format!(
                "Model returned {}-dimensional vector, expected {}",
                body.embedding.len(),
                self.dimension
            )));
        }

        Ok(body.embedding)
    }
}

impl EmbeddingModel for OllamaEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Empty text cannot be embedded".to_string(),
            ));
        }
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async { self.embed_async(text).await })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
