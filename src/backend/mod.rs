//! Remote backend capabilities.
//!
//! This module provides:
//! * [`TranscribeService`] — async trait for the audio → transcript call.
//! * [`AnswerService`]     — async trait for the transcript → answer call.
//! * [`HttpTranscribeService`] / [`HttpAnswerService`] — reqwest-backed
//!   implementations of the two wire contracts (`/incomingAudio`, `/rag`).
//! * [`BackendError`]      — shared error taxonomy.
//!
//! Failures never cross the pipeline boundary: the orchestrator converts
//! every error into a terminal transcript message.

pub mod answer;
pub mod error;
pub mod transcribe;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use answer::{AnswerService, HttpAnswerService};
pub use error::BackendError;
pub use transcribe::{HttpTranscribeService, TranscribeService, Transcription};

// test-only re-exports so the orchestrator test module can import the mocks
// without spelling out the submodule paths.
#[cfg(test)]
pub use answer::MockAnswerService;
#[cfg(test)]
pub use transcribe::MockTranscribeService;
