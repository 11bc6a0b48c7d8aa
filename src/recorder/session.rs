//! Recording session state and the finalized audio artifact.
//!
//! [`RecordingSession`] is the explicit per-capture state object: a state
//! enum plus an append-only chunk sequence.  The cpal callback feeds chunks
//! through [`SharedSession`]; the session itself gates accumulation on
//! [`SessionState::Capturing`], so a callback that fires after stop or
//! cancel is harmless.
//!
//! [`FinalizedAudio`] is the immutable artifact produced once per completed
//! (non-cancelled) session.  Ownership moves into exactly one pipeline run.

use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// States of one microphone capture session.
///
/// ```text
/// Idle ──start──▶ Capturing ──stop──▶ Finalizing ──▶ Idle (emits artifact)
///                 Capturing ──cancel──────────────▶ Idle (emits nothing)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No capture in progress.
    Idle,
    /// Microphone is active; chunks are accumulating.
    Capturing,
    /// Capture has stopped; chunks are being packaged into the artifact.
    Finalizing,
}

impl SessionState {
    /// Returns `true` while audio chunks are being accepted.
    pub fn is_capturing(&self) -> bool {
        matches!(self, SessionState::Capturing)
    }

    /// A short human-readable label for the UI status line.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Capturing => "Recording",
            SessionState::Finalizing => "Finalizing",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

// ---------------------------------------------------------------------------
// FinalizedAudio
// ---------------------------------------------------------------------------

/// Immutable audio artifact produced by one completed recording session.
///
/// The payload is opaque to everything downstream — the pipeline forwards it
/// to the transcribe backend without inspecting it.  An empty payload is a
/// valid artifact (the user stopped before any audio arrived).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedAudio {
    bytes: Vec<u8>,
    content_type: &'static str,
}

impl FinalizedAudio {
    /// Wrap packaged audio bytes with their container content type.
    pub fn new(bytes: Vec<u8>, content_type: &'static str) -> Self {
        Self {
            bytes,
            content_type,
        }
    }

    /// The packaged audio payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the artifact, yielding the payload.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// MIME content type tag (e.g. `"audio/wav"`).
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for the zero-chunk edge case.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RecordingSession
// ---------------------------------------------------------------------------

/// One microphone capture session: state enum + accumulated chunk sequence.
///
/// Chunks accumulate **only** while the state is [`SessionState::Capturing`];
/// [`push_chunk`](Self::push_chunk) silently drops data in any other state
/// and ignores empty buffers, so the chunk sequence only ever holds non-empty
/// buffers in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSession {
    state: SessionState,
    chunks: Vec<Vec<u8>>,
}

impl RecordingSession {
    /// Create a fresh idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Transition `Idle → Capturing` and reset the chunk sequence.
    ///
    /// The controller validates the precondition; this method just applies
    /// the transition.
    pub(crate) fn begin(&mut self) {
        self.state = SessionState::Capturing;
        self.chunks.clear();
    }

    /// Append one raw chunk.
    ///
    /// Dropped (returns `false`) when the session is not capturing or the
    /// chunk is empty.
    pub fn push_chunk(&mut self, data: &[u8]) -> bool {
        if !self.state.is_capturing() || data.is_empty() {
            return false;
        }
        self.chunks.push(data.to_vec());
        true
    }

    /// Transition `Capturing → Finalizing` and take the accumulated chunks.
    pub(crate) fn take_chunks(&mut self) -> Vec<Vec<u8>> {
        self.state = SessionState::Finalizing;
        std::mem::take(&mut self.chunks)
    }

    /// Discard all chunks and return to `Idle` without emitting anything.
    pub(crate) fn discard(&mut self) {
        self.state = SessionState::Idle;
        self.chunks.clear();
    }

    /// Return to `Idle` after finalization.
    pub(crate) fn settle(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Number of accumulated chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

// ---------------------------------------------------------------------------
// SharedSession
// ---------------------------------------------------------------------------

/// Thread-safe handle to the [`RecordingSession`], shared between the audio
/// callback and the [`RecorderController`](crate::recorder::RecorderController).
///
/// Lock only for short critical sections; never across an `.await`.
pub type SharedSession = Arc<Mutex<RecordingSession>>;

/// Construct a new idle [`SharedSession`].
pub fn new_shared_session() -> SharedSession {
    Arc::new(Mutex::new(RecordingSession::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- SessionState ----

    #[test]
    fn default_state_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }

    #[test]
    fn only_capturing_is_capturing() {
        assert!(!SessionState::Idle.is_capturing());
        assert!(SessionState::Capturing.is_capturing());
        assert!(!SessionState::Finalizing.is_capturing());
    }

    #[test]
    fn labels() {
        assert_eq!(SessionState::Idle.label(), "Idle");
        assert_eq!(SessionState::Capturing.label(), "Recording");
        assert_eq!(SessionState::Finalizing.label(), "Finalizing");
    }

    // ---- Chunk accumulation gating ----

    #[test]
    fn chunks_rejected_while_idle() {
        let mut session = RecordingSession::new();
        assert!(!session.push_chunk(b"data"));
        assert_eq!(session.chunk_count(), 0);
    }

    #[test]
    fn chunks_accepted_while_capturing() {
        let mut session = RecordingSession::new();
        session.begin();
        assert!(session.push_chunk(b"a"));
        assert!(session.push_chunk(b"b"));
        assert_eq!(session.chunk_count(), 2);
    }

    #[test]
    fn empty_chunks_are_ignored() {
        let mut session = RecordingSession::new();
        session.begin();
        assert!(!session.push_chunk(b""));
        assert!(session.push_chunk(b"x"));
        assert_eq!(session.chunk_count(), 1);
    }

    #[test]
    fn chunks_rejected_while_finalizing() {
        let mut session = RecordingSession::new();
        session.begin();
        session.push_chunk(b"a");
        let _ = session.take_chunks();
        assert!(!session.push_chunk(b"late"));
        assert_eq!(session.chunk_count(), 0);
    }

    #[test]
    fn begin_resets_leftover_chunks() {
        let mut session = RecordingSession::new();
        session.begin();
        session.push_chunk(b"old");
        session.discard();
        session.begin();
        assert_eq!(session.chunk_count(), 0);
    }

    // ---- take / discard / settle ----

    #[test]
    fn take_chunks_preserves_order() {
        let mut session = RecordingSession::new();
        session.begin();
        session.push_chunk(b"a");
        session.push_chunk(b"b");
        session.push_chunk(b"c");

        let chunks = session.take_chunks();
        assert_eq!(chunks, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert_eq!(session.state(), SessionState::Finalizing);

        session.settle();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn discard_drops_everything() {
        let mut session = RecordingSession::new();
        session.begin();
        session.push_chunk(b"a");
        session.discard();

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.chunk_count(), 0);
    }

    // ---- FinalizedAudio ----

    #[test]
    fn finalized_audio_accessors() {
        let audio = FinalizedAudio::new(vec![1, 2, 3], "audio/wav");
        assert_eq!(audio.bytes(), &[1, 2, 3]);
        assert_eq!(audio.content_type(), "audio/wav");
        assert_eq!(audio.len(), 3);
        assert!(!audio.is_empty());
    }

    #[test]
    fn empty_artifact_is_valid() {
        let audio = FinalizedAudio::new(Vec::new(), "audio/wav");
        assert!(audio.is_empty());
        assert_eq!(audio.len(), 0);
    }

    #[test]
    fn shared_session_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedSession>();
    }
}
