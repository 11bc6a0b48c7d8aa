//! Recorder controller module — one microphone capture session at a time.
//!
//! [`RecorderController`] drives the session state machine; the cpal
//! callback feeds chunks into the [`SharedSession`]; stopping produces a
//! [`FinalizedAudio`] artifact that is handed to the conversation pipeline.

pub mod controller;
pub mod session;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::{AudioSource, RecorderController, RecorderError};
pub use session::{
    new_shared_session, FinalizedAudio, RecordingSession, SessionState, SharedSession,
};
