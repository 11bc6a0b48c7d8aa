//! The Transcribe capability — audio artifact in, transcript out.
//!
//! The production implementation posts the artifact as a multipart form to
//! `{base_url}/incomingAudio` together with the ambient language code and
//! user identifier.  All connection details come from
//! [`BackendConfig`](crate::config::BackendConfig); nothing is hardcoded.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::BackendConfig;
use crate::recorder::FinalizedAudio;

use super::error::BackendError;

// ---------------------------------------------------------------------------
// Transcription
// ---------------------------------------------------------------------------

/// A successful transcribe response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    /// The transcript text shown as the user's message.
    pub transcript: String,
    /// Opaque recognition result returned alongside the transcript.
    pub result: String,
}

/// Wire shape of the `/incomingAudio` response body.
#[derive(Debug, Deserialize)]
struct AudioResponse {
    result: String,
    transcript: String,
}

// ---------------------------------------------------------------------------
// TranscribeService trait
// ---------------------------------------------------------------------------

/// Async interface for the remote transcribe capability.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn TranscribeService>` across pipeline tasks.
///
/// # Arguments
/// * `audio`         – the finalized artifact from one recording session.
/// * `language_code` – ambient BCP-47 code supplied by the UI layer.
/// * `user`          – ambient customer identifier; empty when no customer
///                     is selected.
#[async_trait]
pub trait TranscribeService: Send + Sync {
    async fn transcribe(
        &self,
        audio: &FinalizedAudio,
        language_code: &str,
        user: &str,
    ) -> Result<Transcription, BackendError>;
}

// ---------------------------------------------------------------------------
// HttpTranscribeService
// ---------------------------------------------------------------------------

/// Posts recordings to the backend's `/incomingAudio` endpoint.
pub struct HttpTranscribeService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranscribeService {
    /// Build the service from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.  A default client is the last-resort fallback
    /// if the builder fails (should never happen in practice).
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

    /// Filename attached to the uploaded artifact, `recording_<millis>.wav`.
    fn upload_filename() -> String {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        format!("recording_{millis}.wav")
    }
}

#[async_trait]
impl TranscribeService for HttpTranscribeService {
    async fn transcribe(
        &self,
        audio: &FinalizedAudio,
        language_code: &str,
        user: &str,
    ) -> Result<Transcription, BackendError> {
        let url = format!("{}/incomingAudio", self.base_url);

        let file = reqwest::multipart::Part::bytes(audio.bytes().to_vec())
            .file_name(Self::upload_filename())
            .mime_str(audio.content_type())
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("language_code", language_code.to_string())
            .text("user", user.to_string());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: AudioResponse = response.json().await?;

        Ok(Transcription {
            transcript: body.transcript,
            result: body.result,
        })
    }
}

// ---------------------------------------------------------------------------
// MockTranscribeService  (test-only)
// ---------------------------------------------------------------------------

/// A test double that resolves without any network, optionally after a
/// delay so tests can interleave pipelines deterministically.
#[cfg(test)]
pub struct MockTranscribeService {
    outcome: Result<Transcription, ()>,
    delay: Option<std::time::Duration>,
}

#[cfg(test)]
impl MockTranscribeService {
    /// Always succeeds with `transcript` (opaque result mirrors it).
    pub fn ok(transcript: impl Into<String>) -> Self {
        let transcript = transcript.into();
        Self {
            outcome: Ok(Transcription {
                result: transcript.clone(),
                transcript,
            }),
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
impl TranscribeService for MockTranscribeService {
    async fn transcribe(
        &self,
        _audio: &FinalizedAudio,
        _language_code: &str,
        _user: &str,
    ) -> Result<Transcription, BackendError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Ok(t) => Ok(t.clone()),
            Err(()) => Err(BackendError::Request("connection refused".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
