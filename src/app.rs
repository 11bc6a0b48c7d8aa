//! Voice-chat window — egui/eframe application.
//!
//! # Architecture
//!
//! [`VoiceChatApp`] is the top-level [`eframe::App`].  It owns no pipeline
//! logic: every frame it renders a snapshot of the [`SharedConversation`],
//! reads the recording indicator from the [`SharedSession`], and forwards
//! button presses as [`UiCommand`]s to the
//! [`ChatOrchestrator`](crate::conversation::ChatOrchestrator) running on
//! the tokio runtime.
//!
//! # Layout
//!
//! ```text
//! ┌────────────────────────────┐
//! │ title     [language] [user]│
//! │ welcome line               │
//! ├────────────────────────────┤
//! │ transcript (scrollable)    │
//! │   user      → right, blue  │
//! │   assistant → left, green  │
//! │   placeholder → gray italic│
//! ├────────────────────────────┤
//! │ [Start] / [Stop & Send] [✕]│
//! │ footer                     │
//! └────────────────────────────┘
//! ```

use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::conversation::{Role, SharedConversation, UiCommand};
use crate::directory::CustomerDirectory;
use crate::i18n::{self, Language, Strings};
use crate::recorder::{SessionState, SharedSession};

// ---------------------------------------------------------------------------
// VoiceChatApp
// ---------------------------------------------------------------------------

/// eframe application — the voice-chat window.
pub struct VoiceChatApp {
    // ── Shared state (written by the orchestrator / audio callback) ──────
    /// Transcript rendered every frame.
    conversation: SharedConversation,
    /// Recording session; read for the capture indicator.
    session: SharedSession,

    // ── Channels ─────────────────────────────────────────────────────────
    /// Send commands to the background orchestrator.
    command_tx: mpsc::Sender<UiCommand>,

    // ── UI state ─────────────────────────────────────────────────────────
    /// Customers shown in the user picker.
    directory: CustomerDirectory,
    /// Index into `directory.entries()`; `None` = anonymous.
    selected_customer: Option<usize>,
    /// Active interface language.
    language: Language,

    // ── Configuration ────────────────────────────────────────────────────
    /// Loaded application configuration; written back on exit so the
    /// language selection survives restarts.
    config: AppConfig,
}

impl VoiceChatApp {
    /// Create a new [`VoiceChatApp`].
    ///
    /// * `conversation` — shared transcript, written by pipeline tasks.
    /// * `session`      — shared recording session, fed by the cpal callback.
    /// * `command_tx`   — sender end of the orchestrator command channel.
    /// * `directory`    — customers for the user picker.
    /// * `config`       — loaded application configuration.
    pub fn new(
        conversation: SharedConversation,
        session: SharedSession,
        command_tx: mpsc::Sender<UiCommand>,
        directory: CustomerDirectory,
        config: AppConfig,
    ) -> Self {
        Self {
            conversation,
            session,
            command_tx,
            directory,
            selected_customer: None,
            language: config.language,
            config,
        }
    }

    /// Config snapshot carrying the current UI selections, for persistence.
    fn updated_config(&self) -> AppConfig {
        let mut config = self.config.clone();
        config.language = self.language;
        config
    }

    fn strings(&self) -> &'static Strings {
        i18n::strings(self.language)
    }

    /// Current recording state, read under a brief lock.
    fn session_state(&self) -> SessionState {
        self.session
            .lock()
            .map(|s| s.state())
            .unwrap_or(SessionState::Idle)
    }

    fn send(&self, command: UiCommand) {
        // try_send: the UI must never block on the orchestrator.
        if let Err(e) = self.command_tx.try_send(command) {
            log::error!("ui: failed to send command: {e}");
        }
    }

    // ── Header ───────────────────────────────────────────────────────────

    /// Title row with the language selector and the user picker.
    fn draw_header(&mut self, ui: &mut egui::Ui) {
        let strings = self.strings();

        ui.horizontal(|ui| {
            ui.heading(strings.title);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Language selector
                let mut language = self.language;
                egui::ComboBox::from_id_salt("language-picker")
                    .selected_text(language.code())
                    .width(80.0)
                    .show_ui(ui, |ui| {
                        for &candidate in Language::all() {
                            ui.selectable_value(&mut language, candidate, candidate.code());
                        }
                    });
                if language != self.language {
                    self.language = language;
                    self.send(UiCommand::SetLanguage(language));
                }

                self.draw_user_picker(ui);
            });
        });

        // Welcome line, personalized when a customer is selected.
        let welcome = match self
            .selected_customer
            .and_then(|i| self.directory.entries().get(i))
        {
            Some(customer) => self.strings().welcome_back(&customer.name),
            None => self.strings().welcome.to_string(),
        };
        ui.label(
            egui::RichText::new(welcome)
                .color(egui::Color32::from_rgb(170, 170, 170))
                .size(12.0),
        );
    }

    /// Customer picker; a change resets the conversation on the orchestrator
    /// side.
    fn draw_user_picker(&mut self, ui: &mut egui::Ui) {
        let strings = self.strings();
        let selected_text = self
            .selected_customer
            .and_then(|i| self.directory.entries().get(i))
            .map(|c| c.name.as_str())
            .unwrap_or(strings.select_user);

        let mut selection = self.selected_customer;
        egui::ComboBox::from_id_salt("user-picker")
            .selected_text(selected_text)
            .width(180.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selection, None, strings.select_user);
                for (i, customer) in self.directory.entries().iter().enumerate() {
                    ui.selectable_value(&mut selection, Some(i), customer.name.as_str());
                }
            });

        if selection != self.selected_customer {
            self.selected_customer = selection;
            let customer = selection.and_then(|i| self.directory.entries().get(i).cloned());
            self.send(UiCommand::SelectUser(customer));
        }
    }

    // ── Transcript ───────────────────────────────────────────────────────

    /// Scrollable conversation view rendered from a snapshot so the lock is
    /// released before any layout work happens.
    fn draw_transcript(&self, ui: &mut egui::Ui) {
        let messages = match self.conversation.lock() {
            Ok(conv) => conv.snapshot(),
            Err(_) => Vec::new(),
        };

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in &messages {
                    let (layout, text) = match message.role {
                        Role::User => (
                            egui::Layout::right_to_left(egui::Align::Min),
                            egui::RichText::new(&message.text)
                                .color(egui::Color32::from_rgb(120, 180, 255))
                                .size(13.0),
                        ),
                        Role::Assistant => (
                            egui::Layout::left_to_right(egui::Align::Min),
                            egui::RichText::new(&message.text)
                                .color(egui::Color32::from_rgb(80, 200, 120))
                                .size(13.0),
                        ),
                        Role::Placeholder => (
                            egui::Layout::left_to_right(egui::Align::Min),
                            egui::RichText::new(&message.text)
                                .color(egui::Color32::from_rgb(140, 140, 140))
                                .italics()
                                .size(12.0),
                        ),
                    };
                    ui.with_layout(layout, |ui| {
                        ui.add(egui::Label::new(text).wrap());
                    });
                    ui.add_space(4.0);
                }
            });
    }

    // ── Controls ─────────────────────────────────────────────────────────

    /// Record / stop / cancel buttons, gated on the session state.
    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        let strings = self.strings();
        let state = self.session_state();

        ui.horizontal(|ui| {
            match state {
                SessionState::Idle => {
                    if ui.button(strings.start_button).clicked() {
                        self.send(UiCommand::StartRecording);
                    }
                }
                SessionState::Capturing => {
                    ui.label(
                        egui::RichText::new(strings.listening)
                            .color(egui::Color32::from_rgb(255, 80, 80))
                            .size(12.0),
                    );
                    if ui.button(strings.stop_button).clicked() {
                        self.send(UiCommand::StopRecording);
                    }
                    if ui.button("✕").clicked() {
                        self.send(UiCommand::CancelRecording);
                    }
                }
                SessionState::Finalizing => {
                    ui.add_enabled(false, egui::Button::new(strings.stop_button));
                }
            }
        });
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for VoiceChatApp {
    /// Called every frame by eframe.  Renders shared state; never blocks.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep repainting while something is moving: the capture indicator
        // or an unresolved pipeline placeholder.
        let animated = self.session_state().is_capturing()
            || self
                .conversation
                .lock()
                .map(|c| c.has_pending())
                .unwrap_or(false);
        if animated {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_header(ui);
            ui.separator();

            // Reserve room for the controls + footer below the transcript.
            let bottom = 64.0;
            let transcript_height = (ui.available_height() - bottom).max(0.0);
            ui.allocate_ui(egui::vec2(ui.available_width(), transcript_height), |ui| {
                self.draw_transcript(ui);
            });

            ui.separator();
            self.draw_controls(ui);

            ui.label(
                egui::RichText::new(self.strings().footer)
                    .color(egui::Color32::from_rgb(110, 110, 110))
                    .size(10.0),
            );
        });
    }

    /// Persist the current settings on exit (best-effort).
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.updated_config().save() {
            log::warn!("Failed to persist settings: {e}");
        }
        log::info!("voice assistant window closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
