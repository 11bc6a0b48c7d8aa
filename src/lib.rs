//! Voice Assistant — desktop voice-chat client.
//!
//! Captures microphone audio, ships it to a remote transcription/answer
//! backend, and maintains a running conversation transcript with optimistic
//! placeholder messages.
//!
//! # Architecture
//!
//! ```text
//! UiCommand (mpsc)
//!        │
//!        ▼
//! ChatOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ StartRecording  → RecorderController::start (acquire mic)
//!        ├─ StopRecording   → RecorderController::stop  → FinalizedAudio
//!        │                     └─▶ tokio::spawn(run_pipeline)
//!        │                           ├─ append "transcribing" placeholder
//!        │                           ├─ TranscribeService  → User message
//!        │                           ├─ append "thinking" placeholder
//!        │                           └─ AnswerService      → Assistant message
//!        ├─ CancelRecording → discard chunks, no pipeline
//!        └─ SelectUser      → reset conversation, new ambient identity
//!
//! SharedConversation (Arc<Mutex<Conversation>>) ← read by egui each frame
//! ```

pub mod app;
pub mod audio;
pub mod backend;
pub mod config;
pub mod conversation;
pub mod directory;
pub mod i18n;
pub mod recorder;
