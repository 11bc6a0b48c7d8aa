//! Application entry point — Voice Assistant.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the HTTP transcribe/answer services from config.
//! 5. Create the shared conversation and recording session.
//! 6. Start the cpal capture stream (degrade gracefully without a mic).
//! 7. Spawn the chat orchestrator on the tokio runtime.
//! 8. Load the customer directory.
//! 9. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use tokio::sync::mpsc;
use voice_assistant::{
    app::VoiceChatApp,
    audio::{MicCapture, MicSource, StreamHandle},
    backend::{AnswerService, HttpAnswerService, HttpTranscribeService, TranscribeService},
    config::AppConfig,
    conversation::{new_shared_conversation, ChatOrchestrator, UiCommand},
    directory::CustomerDirectory,
    recorder::{new_shared_session, RecorderController},
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([width, height])
        .with_min_inner_size([360.0, 480.0]);

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Voice Assistant starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 worker threads — orchestrator + pipeline tasks)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Backend services
    let transcribe: Arc<dyn TranscribeService> =
        Arc::new(HttpTranscribeService::from_config(&config.backend));
    let answer: Arc<dyn AnswerService> = Arc::new(HttpAnswerService::from_config(&config.backend));
    log::info!("Backend: {}", config.backend.base_url);

    // 5. Shared state + command channel
    let conversation = new_shared_conversation();
    let session = new_shared_session();
    let (command_tx, command_rx) = mpsc::channel::<UiCommand>(16);

    // 6. cpal capture — the stream runs for the whole app lifetime and the
    //    session gate decides which chunks are kept.  Without a microphone
    //    the app still launches; every start attempt then surfaces the
    //    failure in the transcript.
    let mut stream_handle: Option<StreamHandle> = None;
    let mic_source = match MicCapture::new() {
        Ok(capture) => match capture.start(Arc::clone(&session)) {
            Ok(handle) => {
                log::info!(
                    "Audio capture started ({} Hz, {} ch)",
                    capture.sample_rate(),
                    capture.channels()
                );
                stream_handle = Some(handle);
                MicSource::new(&capture)
            }
            Err(e) => {
                log::warn!("Failed to start audio stream: {e}");
                MicSource::unavailable(e.to_string())
            }
        },
        Err(e) => {
            log::warn!("Audio capture unavailable: {e}");
            MicSource::unavailable(e.to_string())
        }
    };
    let _stream_handle = stream_handle;

    // 7. Orchestrator on the tokio runtime
    let recorder = RecorderController::new(Arc::new(mic_source), Arc::clone(&session));
    let orchestrator = ChatOrchestrator::new(
        Arc::clone(&conversation),
        recorder,
        transcribe,
        answer,
        config.language,
    );
    rt.spawn(orchestrator.run(command_rx));

    // 8. Customer directory
    let directory = CustomerDirectory::load_or_default();

    // 9. Build the egui app and run it (blocks until the window is closed)
    let options = native_options(&config);
    let app = VoiceChatApp::new(conversation, session, command_tx, directory, config);

    eframe::run_native("Voice Assistant", options, Box::new(move |_cc| Ok(Box::new(app))))
}
