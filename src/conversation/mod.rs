//! Conversation module — the shared transcript and the orchestrator that
//! fills it.
//!
//! * [`Conversation`] / [`ConversationMessage`] — ordered append/replace
//!   transcript shared between the UI and the pipeline tasks.
//! * [`ChatOrchestrator`] — consumes [`UiCommand`]s, drives the recorder and
//!   spawns one independent pipeline task per finished recording.
//! * [`run_pipeline`] — the two-stage transcribe → answer pipeline itself.

pub mod message;
pub mod orchestrator;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use message::{
    new_shared_conversation, Conversation, ConversationMessage, Role, SharedConversation, Slot,
};
pub use orchestrator::{run_pipeline, ChatOrchestrator, PipelineContext, UiCommand};
