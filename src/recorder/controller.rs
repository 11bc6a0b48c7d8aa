//! The recorder controller — start / stop / cancel over one capture session.
//!
//! [`RecorderController`] owns the [`SharedSession`] and translates UI-level
//! commands into session transitions.  Device access goes through the
//! [`AudioSource`] seam so the controller can be unit-tested without any
//! hardware: the production implementation is
//! [`MicSource`](crate::audio::MicSource).
//!
//! Finalization is asynchronous: [`stop`](RecorderController::stop) moves
//! the packaging work onto `tokio::task::spawn_blocking` and resolves to the
//! [`FinalizedAudio`] artifact.

use std::sync::Arc;

use thiserror::Error;

use super::session::{FinalizedAudio, SessionState, SharedSession};

// ---------------------------------------------------------------------------
// RecorderError
// ---------------------------------------------------------------------------

/// Errors surfaced by the recorder controller.
#[derive(Debug, Clone, Error)]
pub enum RecorderError {
    /// Microphone permission or hardware failure.  Surfaced to the user as a
    /// conversation message, never a crash.
    #[error("audio input unavailable: {0}")]
    DeviceUnavailable(String),

    /// Caller misuse of `start`/`stop`/`cancel` — a programming error.
    /// Logged and ignored by the UI loop rather than shown to the user.
    #[error("{op} is not valid while the session is {state:?}")]
    InvalidState {
        op: &'static str,
        state: SessionState,
    },
}

// ---------------------------------------------------------------------------
// AudioSource trait
// ---------------------------------------------------------------------------

/// Seam between the controller and the capture device.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn AudioSource>` and called from the orchestrator task.
pub trait AudioSource: Send + Sync {
    /// Acquire the input device for a new capture session.
    ///
    /// Returns [`RecorderError::DeviceUnavailable`] when the microphone is
    /// missing or was refused; the controller then stays `Idle`.
    fn acquire(&self) -> Result<(), RecorderError>;

    /// Release the device after stop or cancel.  Default: nothing to do
    /// (the cpal stream stays open; the session gate drops its chunks).
    fn release(&self) {}

    /// Wrap the concatenated raw chunk bytes in the source's container
    /// format.  Default: identity (already-packaged or opaque bytes).
    fn package(&self, raw: Vec<u8>) -> Vec<u8> {
        raw
    }

    /// MIME content type of packaged artifacts.
    fn content_type(&self) -> &'static str {
        "audio/wav"
    }
}

// Compile-time assertion: Box<dyn AudioSource> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn AudioSource>) {}
};

// ---------------------------------------------------------------------------
// RecorderController
// ---------------------------------------------------------------------------

/// Manages exactly one capture session at a time.
///
/// ```text
/// Idle ──start()──▶ Capturing ──stop()───▶ Idle   (emits FinalizedAudio)
///                   Capturing ──cancel()─▶ Idle   (emits nothing)
/// ```
///
/// `start()` while `Capturing`, or `stop()`/`cancel()` while `Idle`, fails
/// with [`RecorderError::InvalidState`].
pub struct RecorderController {
    source: Arc<dyn AudioSource>,
    session: SharedSession,
}

impl RecorderController {
    /// Create a controller over `session`, capturing through `source`.
    pub fn new(source: Arc<dyn AudioSource>, session: SharedSession) -> Self {
        Self { source, session }
    }

    /// Handle to the shared session (wired into the audio callback and read
    /// by the UI for the recording indicator).
    pub fn session(&self) -> SharedSession {
        Arc::clone(&self.session)
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.session.lock().unwrap().state()
    }

    /// Begin a new capture session: `Idle → Capturing`.
    ///
    /// Acquires the device first; on failure the session never leaves
    /// `Idle`.  The chunk sequence is reset to empty.
    pub fn start(&self) -> Result<(), RecorderError> {
        {
            let session = self.session.lock().unwrap();
            let state = session.state();
            if state != SessionState::Idle {
                return Err(RecorderError::InvalidState { op: "start", state });
            }
        }

        // Acquire outside the lock — the device layer may log or probe.
        self.source.acquire()?;

        self.session.lock().unwrap().begin();
        log::debug!("recorder: session started");
        Ok(())
    }

    /// Finalize the current capture: `Capturing → Finalizing → Idle`.
    ///
    /// Concatenates the accumulated chunks in order (empty chunks were never
    /// stored), packages them through the source, and returns the artifact.
    /// Zero captured chunks still produce a valid empty-payload artifact.
    pub async fn stop(&self) -> Result<FinalizedAudio, RecorderError> {
        let chunks = {
            let mut session = self.session.lock().unwrap();
            let state = session.state();
            if state != SessionState::Capturing {
                return Err(RecorderError::InvalidState { op: "stop", state });
            }
            session.take_chunks()
        };

        self.source.release();

        let chunk_count = chunks.len();
        let source = Arc::clone(&self.source);
        let content_type = source.content_type();

        // Packaging (e.g. WAV framing) is CPU-bound; keep it off the
        // async workers.
        let packaged = match tokio::task::spawn_blocking(move || {
            let raw: Vec<u8> = chunks.concat();
            source.package(raw)
        })
        .await
        {
            Ok(packaged) => packaged,
            Err(e) => {
                // The session must not stay stranded in Finalizing.
                self.session.lock().unwrap().discard();
                return Err(RecorderError::DeviceUnavailable(format!(
                    "finalize task failed: {e}"
                )));
            }
        };

        self.session.lock().unwrap().settle();

        log::debug!(
            "recorder: finalized {} chunk(s) into {} byte artifact",
            chunk_count,
            packaged.len()
        );
        Ok(FinalizedAudio::new(packaged, content_type))
    }

    /// Abort the current capture: `Capturing → Idle`, discarding all chunks.
    ///
    /// No artifact is ever produced for a cancelled session.
    pub fn cancel(&self) -> Result<(), RecorderError> {
        {
            let mut session = self.session.lock().unwrap();
            let state = session.state();
            if state != SessionState::Capturing {
                return Err(RecorderError::InvalidState { op: "cancel", state });
            }
            session.discard();
        }

        self.source.release();
        log::debug!("recorder: session cancelled");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockAudioSource  (test-only)
// ---------------------------------------------------------------------------

/// A test double for [`AudioSource`] with identity packaging.
#[cfg(test)]
pub struct MockAudioSource {
    acquire_result: Result<(), RecorderError>,
}

#[cfg(test)]
impl MockAudioSource {
    /// A source whose `acquire` always succeeds.
    pub fn available() -> Self {
        Self {
            acquire_result: Ok(()),
        }
    }

    /// A source whose `acquire` always fails with `DeviceUnavailable`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            acquire_result: Err(RecorderError::DeviceUnavailable(reason.into())),
        }
    }
}

#[cfg(test)]
impl AudioSource for MockAudioSource {
    fn acquire(&self) -> Result<(), RecorderError> {
        self.acquire_result.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::session::new_shared_session;

    fn make_controller(source: MockAudioSource) -> RecorderController {
        RecorderController::new(Arc::new(source), new_shared_session())
    }

    // ---- start ----

    #[test]
    fn start_transitions_to_capturing() {
        let controller = make_controller(MockAudioSource::available());
        controller.start().unwrap();
        assert_eq!(controller.state(), SessionState::Capturing);
    }

    #[test]
    fn start_while_capturing_is_invalid_state() {
        let controller = make_controller(MockAudioSource::available());
        controller.start().unwrap();

        let err = controller.start().unwrap_err();
        assert!(matches!(
            err,
            RecorderError::InvalidState { op: "start", .. }
        ));
        // Still capturing — the misuse must not corrupt the session.
        assert_eq!(controller.state(), SessionState::Capturing);
    }

    #[test]
    fn device_failure_keeps_session_idle() {
        let controller = make_controller(MockAudioSource::unavailable("no mic"));

        let err = controller.start().unwrap_err();
        assert!(matches!(err, RecorderError::DeviceUnavailable(_)));
        assert_eq!(controller.state(), SessionState::Idle);
    }

    // ---- stop ----

    #[tokio::test]
    async fn stop_concatenates_chunks_in_order() {
        let controller = make_controller(MockAudioSource::available());
        controller.start().unwrap();
        {
            let session = controller.session();
            let mut s = session.lock().unwrap();
            s.push_chunk(b"a");
            s.push_chunk(b"b");
        }

        let audio = controller.stop().await.unwrap();
        assert_eq!(audio.bytes(), b"ab");
        assert_eq!(audio.content_type(), "audio/wav");
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn stop_with_zero_chunks_yields_empty_artifact() {
        let controller = make_controller(MockAudioSource::available());
        controller.start().unwrap();

        let audio = controller.stop().await.unwrap();
        assert!(audio.is_empty());
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn stop_while_idle_is_invalid_state() {
        let controller = make_controller(MockAudioSource::available());
        let err = controller.stop().await.unwrap_err();
        assert!(matches!(
            err,
            RecorderError::InvalidState { op: "stop", .. }
        ));
    }

    // ---- cancel ----

    #[test]
    fn cancel_discards_chunks() {
        let controller = make_controller(MockAudioSource::available());
        controller.start().unwrap();
        {
            let session = controller.session();
            let mut s = session.lock().unwrap();
            s.push_chunk(b"doomed");
        }

        controller.cancel().unwrap();
        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(controller.session().lock().unwrap().chunk_count(), 0);
    }

    #[test]
    fn cancel_while_idle_is_invalid_state() {
        let controller = make_controller(MockAudioSource::available());
        let err = controller.cancel().unwrap_err();
        assert!(matches!(
            err,
            RecorderError::InvalidState { op: "cancel", .. }
        ));
    }

    #[tokio::test]
    async fn restart_after_cancel_starts_clean() {
        let controller = make_controller(MockAudioSource::available());
        controller.start().unwrap();
        {
            let session = controller.session();
            session.lock().unwrap().push_chunk(b"old");
        }
        controller.cancel().unwrap();

        controller.start().unwrap();
        let audio = controller.stop().await.unwrap();
        // Nothing from the cancelled session may leak into the new artifact.
        assert!(audio.is_empty());
    }

    // ---- packaging hook ----

    struct FramingSource;

    impl AudioSource for FramingSource {
        fn acquire(&self) -> Result<(), RecorderError> {
            Ok(())
        }
        fn package(&self, raw: Vec<u8>) -> Vec<u8> {
            let mut framed = b"HDR".to_vec();
            framed.extend_from_slice(&raw);
            framed
        }
    }

    struct ExplodingSource;

    impl AudioSource for ExplodingSource {
        fn acquire(&self) -> Result<(), RecorderError> {
            Ok(())
        }
        fn package(&self, _raw: Vec<u8>) -> Vec<u8> {
            panic!("packaging blew up");
        }
    }

    #[tokio::test]
    async fn failed_finalize_returns_session_to_idle() {
        let controller =
            RecorderController::new(Arc::new(ExplodingSource), new_shared_session());
        controller.start().unwrap();
        controller.session().lock().unwrap().push_chunk(b"pcm");

        let err = controller.stop().await.unwrap_err();
        assert!(matches!(err, RecorderError::DeviceUnavailable(_)));
        assert_eq!(controller.state(), SessionState::Idle);
        // A new capture must be possible after the failure.
        controller.start().unwrap();
    }

    #[tokio::test]
    async fn stop_routes_bytes_through_package_hook() {
        let controller =
            RecorderController::new(Arc::new(FramingSource), new_shared_session());
        controller.start().unwrap();
        {
            let session = controller.session();
            session.lock().unwrap().push_chunk(b"pcm");
        }

        let audio = controller.stop().await.unwrap();
        assert_eq!(audio.bytes(), b"HDRpcm");
    }
}
