//! Error taxonomy shared by the transcribe and answer capabilities.

use thiserror::Error;

// ---------------------------------------------------------------------------
// BackendError
// ---------------------------------------------------------------------------

/// Errors that can occur while calling the remote backend.
///
/// The pipeline never propagates these past its own boundary — every variant
/// is converted into a terminal transcript message at the call site.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("backend request timed out")]
    Timeout,

    /// The backend answered with a non-success status code.
    #[error("backend returned HTTP {0}")]
    Status(u16),

    /// The response body could not be parsed as the expected JSON.
    #[error("failed to parse backend response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout
        } else if let Some(status) = e.status() {
            BackendError::Status(status.as_u16())
        } else if e.is_decode() {
            BackendError::Parse(e.to_string())
        } else {
            BackendError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_status_code() {
        let e = BackendError::Status(503);
        assert!(e.to_string().contains("503"));
    }

    #[test]
    fn display_timeout() {
        assert!(BackendError::Timeout.to_string().contains("timed out"));
    }
}
