//! Chat orchestrator — drives recording commands and the two-stage
//! transcribe → answer pipeline.
//!
//! [`ChatOrchestrator`] owns the [`RecorderController`] and responds to
//! [`UiCommand`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Pipeline flow
//!
//! ```text
//! UiCommand::StopRecording
//!   └─▶ RecorderController::stop → FinalizedAudio
//!         └─▶ tokio::spawn(run_pipeline)
//!               ├─ append "transcribing" placeholder  (index i)
//!               ├─ TranscribeService::transcribe
//!               │    ├─ Ok  → replace i with User(transcript)
//!               │    └─ Err → replace i with Assistant(failure), STOP
//!               ├─ append "thinking" placeholder      (index j, fresh)
//!               └─ AnswerService::answer
//!                    ├─ Ok  → replace j with Assistant(answer)
//!                    └─ Err → replace j with Assistant(failure)
//! ```
//!
//! Placeholder slots come from [`Conversation::push`], captured under the
//! same lock as the append — two interleaved pipelines can never overwrite
//! each other's slots, and a slot from before a conversation reset is
//! rejected by its generation.  Each pipeline runs as an independent task,
//! so a new recording may start while a previous pipeline is still in
//! flight.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::backend::{AnswerService, TranscribeService};
use crate::directory::Customer;
use crate::i18n::{self, Language};
use crate::recorder::{FinalizedAudio, RecorderController, RecorderError};

use super::message::{ConversationMessage, SharedConversation};

// ---------------------------------------------------------------------------
// UiCommand
// ---------------------------------------------------------------------------

/// Commands sent from the UI thread to the orchestrator task.
#[derive(Debug, Clone)]
pub enum UiCommand {
    /// Begin a new microphone capture session.
    StartRecording,
    /// Finalize the capture and run the pipeline for the artifact.
    StopRecording,
    /// Discard the capture; no pipeline runs.
    CancelRecording,
    /// The active customer identity changed — the conversation resets.
    SelectUser(Option<Customer>),
    /// Switch the interface language for subsequent pipelines.
    SetLanguage(Language),
}

// ---------------------------------------------------------------------------
// PipelineContext
// ---------------------------------------------------------------------------

/// Ambient values captured at stop time and carried through one pipeline
/// run.  Supplied by the surrounding collaborators, not owned or validated
/// here.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Active interface language (selects placeholder/failure texts and the
    /// wire language code).
    pub language: Language,
    /// Active customer identifier; empty when no customer is selected.
    pub user: String,
}

// ---------------------------------------------------------------------------
// run_pipeline
// ---------------------------------------------------------------------------

/// Run the two-stage pipeline for one finalized audio artifact.
///
/// Every placeholder this function appends is replaced at the same index by
/// exactly one terminal message, even on failure.  A transcribe failure
/// short-circuits: the answer stage never starts and no second placeholder
/// is appended.  No retries happen at this layer.
pub async fn run_pipeline(
    conversation: SharedConversation,
    transcribe: Arc<dyn TranscribeService>,
    answer: Arc<dyn AnswerService>,
    audio: FinalizedAudio,
    ctx: PipelineContext,
) {
    let strings = i18n::strings(ctx.language);

    // ── Stage 1: transcribe ─────────────────────────────────────────────
    let i = conversation
        .lock()
        .unwrap()
        .push(ConversationMessage::placeholder(
            strings.transcribing_placeholder,
        ));

    let transcript = match transcribe
        .transcribe(&audio, ctx.language.code(), &ctx.user)
        .await
    {
        Ok(out) => {
            log::debug!("pipeline: transcript = {:?}", out.transcript);
            let applied = conversation
                .lock()
                .unwrap()
                .replace(i, ConversationMessage::user(out.transcript.clone()));
            if !applied {
                // The conversation was reset while transcribing (identity
                // switch); the result belongs to the old transcript.
                log::debug!("pipeline: conversation reset mid-flight, dropping result");
                return;
            }
            out.transcript
        }
        Err(e) => {
            log::warn!("pipeline: transcribe failed: {e}");
            let _ = conversation
                .lock()
                .unwrap()
                .replace(i, ConversationMessage::assistant(strings.transcribe_failed));
            return;
        }
    };

    // ── Stage 2: answer ─────────────────────────────────────────────────
    // The index is computed fresh at append time: another pipeline may have
    // appended messages while stage 1 was awaiting.
    let j = conversation
        .lock()
        .unwrap()
        .push(ConversationMessage::placeholder(
            strings.thinking_placeholder,
        ));

    match answer.answer(&transcript, &ctx.user).await {
        Ok(text) => {
            log::debug!("pipeline: answer = {:?}", text);
            let _ = conversation
                .lock()
                .unwrap()
                .replace(j, ConversationMessage::assistant(text));
        }
        Err(e) => {
            log::warn!("pipeline: answer failed: {e}");
            let _ = conversation
                .lock()
                .unwrap()
                .replace(j, ConversationMessage::assistant(strings.answer_failed));
        }
    }
}

// ---------------------------------------------------------------------------
// ChatOrchestrator
// ---------------------------------------------------------------------------

/// Drives the complete voice-chat session.
///
/// Create with [`ChatOrchestrator::new`], then call [`run`](Self::run)
/// inside a tokio task.  `run` returns once the command channel closes and
/// all in-flight pipelines have settled.
pub struct ChatOrchestrator {
    conversation: SharedConversation,
    recorder: RecorderController,
    transcribe: Arc<dyn TranscribeService>,
    answer: Arc<dyn AnswerService>,
    language: Language,
    user: String,
    pipelines: Vec<JoinHandle<()>>,
}

impl ChatOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `conversation` — shared transcript (also read by the UI).
    /// * `recorder`     — the capture-session controller.
    /// * `transcribe`   — remote transcribe capability.
    /// * `answer`       — remote answer capability.
    /// * `language`     — initial interface language.
    pub fn new(
        conversation: SharedConversation,
        recorder: RecorderController,
        transcribe: Arc<dyn TranscribeService>,
        answer: Arc<dyn AnswerService>,
        language: Language,
    ) -> Self {
        Self {
            conversation,
            recorder,
            transcribe,
            answer,
            language,
            user: String::new(),
            pipelines: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the orchestrator until `command_rx` is closed, then wait for any
    /// in-flight pipelines to settle.
    pub async fn run(mut self, mut command_rx: mpsc::Receiver<UiCommand>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                UiCommand::StartRecording => self.handle_start(),
                UiCommand::StopRecording => self.handle_stop().await,
                UiCommand::CancelRecording => self.handle_cancel(),
                UiCommand::SelectUser(customer) => self.handle_select_user(customer),
                UiCommand::SetLanguage(language) => {
                    log::debug!("orchestrator: language → {language}");
                    self.language = language;
                }
            }
        }

        log::info!("orchestrator: command channel closed, draining pipelines");
        for handle in self.pipelines.drain(..) {
            let _ = handle.await;
        }
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    /// Begin capturing.  A device failure is surfaced in the transcript; a
    /// state-machine misuse is only logged.
    fn handle_start(&mut self) {
        match self.recorder.start() {
            Ok(()) => {}
            Err(RecorderError::DeviceUnavailable(reason)) => {
                log::warn!("orchestrator: microphone unavailable: {reason}");
                let strings = i18n::strings(self.language);
                self.conversation
                    .lock()
                    .unwrap()
                    .push(ConversationMessage::assistant(strings.microphone_failed));
            }
            Err(e @ RecorderError::InvalidState { .. }) => {
                log::error!("orchestrator: {e}");
            }
        }
    }

    /// Finalize the capture and spawn an independent pipeline task for the
    /// artifact.
    async fn handle_stop(&mut self) {
        match self.recorder.stop().await {
            Ok(audio) => {
                log::debug!("orchestrator: artifact ready ({} bytes)", audio.len());
                let ctx = PipelineContext {
                    language: self.language,
                    user: self.user.clone(),
                };
                let handle = tokio::spawn(run_pipeline(
                    Arc::clone(&self.conversation),
                    Arc::clone(&self.transcribe),
                    Arc::clone(&self.answer),
                    audio,
                    ctx,
                ));
                self.pipelines.push(handle);
            }
            Err(e) => {
                log::error!("orchestrator: {e}");
            }
        }
    }

    /// Discard the capture.  The pipeline is never invoked for a cancelled
    /// session.
    fn handle_cancel(&mut self) {
        if let Err(e) = self.recorder.cancel() {
            log::error!("orchestrator: {e}");
        }
    }

    /// Apply a new customer identity and reset the transcript.
    fn handle_select_user(&mut self, customer: Option<Customer>) {
        self.user = customer.map(|c| c.customer_id).unwrap_or_default();
        log::debug!("orchestrator: user → {:?}", self.user);
        self.conversation.lock().unwrap().clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
