//! The Answer capability — transcript text in, assistant answer out.
//!
//! The production implementation posts JSON to `{base_url}/rag`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;

use super::error::BackendError;

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// Request body for `/rag`.
#[derive(Debug, Serialize)]
struct RagRequest<'a> {
    text: &'a str,
    user: &'a str,
}

/// Response body from `/rag`.
#[derive(Debug, Deserialize)]
struct RagResponse {
    answer: String,
}

// ---------------------------------------------------------------------------
// AnswerService trait
// ---------------------------------------------------------------------------

/// Async interface for the remote answer capability.
///
/// # Arguments
/// * `text` – the transcript produced by the transcribe stage.
/// * `user` – ambient customer identifier; empty when no customer is
///            selected.
#[async_trait]
pub trait AnswerService: Send + Sync {
    async fn answer(&self, text: &str, user: &str) -> Result<String, BackendError>;
}

// ---------------------------------------------------------------------------
// HttpAnswerService
// ---------------------------------------------------------------------------

/// Posts transcripts to the backend's `/rag` endpoint.
pub struct HttpAnswerService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnswerService {
    /// Build the service from application config (per-request timeout from
    /// `config.timeout_secs`).
    pub fn from_config(config: &BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn answer(&self, text: &str, user: &str) -> Result<String, BackendError> {
        let url = format!("{}/rag", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&RagRequest { text, user })
            .send()
            .await?
            .error_for_status()?;

        let body: RagResponse = response.json().await?;
        Ok(body.answer)
    }
}

// ---------------------------------------------------------------------------
// MockAnswerService  (test-only)
// ---------------------------------------------------------------------------

/// A test double that resolves without any network, optionally after a
/// delay.
#[cfg(test)]
pub struct MockAnswerService {
    outcome: Result<String, ()>,
    delay: Option<std::time::Duration>,
}

#[cfg(test)]
impl MockAnswerService {
    /// Always succeeds with `answer`.
    pub fn ok(answer: impl Into<String>) -> Self {
        Self {
            outcome: Ok(answer.into()),
            delay: None,
        }
    }

    /// Always fails.
    pub fn err() -> Self {
        Self {
            outcome: Err(()),
            delay: None,
        }
    }

    /// Delay the response by `delay` before resolving.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[cfg(test)]
#[async_trait]
impl AnswerService for MockAnswerService {
    async fn answer(&self, _text: &str, _user: &str) -> Result<String, BackendError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Ok(answer) => Ok(answer.clone()),
            Err(()) => Err(BackendError::Status(500)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
