//! Microphone capture via `cpal`.
//!
//! [`MicCapture`] wraps the cpal host/device/stream lifecycle.  Call
//! [`MicCapture::start`] to begin streaming into a [`SharedSession`]; the
//! returned [`StreamHandle`] is a RAII guard — dropping it stops the
//! underlying cpal stream.
//!
//! The stream runs for the whole app lifetime.  Gating happens inside the
//! session: `push_chunk` stores bytes only while the session is capturing,
//! so the callback never needs to know about start/stop/cancel.
//!
//! [`MicSource`] is the production [`AudioSource`] implementation handed to
//! the [`RecorderController`](crate::recorder::RecorderController): it
//! reports device availability at `start()` time and frames the finalized
//! PCM as WAV.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use crate::recorder::{AudioSource, RecorderError, SharedSession};

use super::wav;

// ---------------------------------------------------------------------------
// StreamHandle
// ---------------------------------------------------------------------------

/// RAII guard that keeps the cpal stream alive.
///
/// Dropping this value calls `cpal::Stream::drop` which pauses/stops the
/// underlying hardware stream.
pub struct StreamHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up or running the audio capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// MicCapture
// ---------------------------------------------------------------------------

/// Microphone capture device wrapper built on top of `cpal`.
///
/// # Example
///
/// ```rust,no_run
/// use voice_assistant::audio::MicCapture;
/// use voice_assistant::recorder::new_shared_session;
///
/// let session = new_shared_session();
/// let capture = MicCapture::new().unwrap();
/// let _handle = capture.start(session).unwrap();
/// // `_handle` keeps the stream alive; drop it to stop capturing.
/// ```
pub struct MicCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    /// Native sample rate reported by the device (Hz).
    sample_rate: u32,
    /// Number of interleaved channels reported by the device.
    channels: u16,
}

impl MicCapture {
    /// Create a new [`MicCapture`] using the system default input device.
    ///
    /// Queries the device's preferred stream configuration (sample rate,
    /// channels, buffer size) so no manual configuration is required.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::NoDevice`] when no input device is available,
    /// or [`CaptureError::DefaultConfig`] when the device cannot report a
    /// default stream configuration.
    pub fn new() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;

        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        Ok(Self {
            device,
            config,
            sample_rate,
            channels,
        })
    }

    /// Start streaming into `session`.
    ///
    /// The cpal callback runs on a dedicated audio thread; each time the
    /// hardware delivers a buffer the `f32` samples are converted to s16le
    /// bytes and offered to the session, which stores them only while a
    /// capture is active.  Lock failures are silently ignored so the audio
    /// thread never panics.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::BuildStream`] or [`CaptureError::PlayStream`]
    /// if the platform rejects the stream configuration.
    pub fn start(&self, session: SharedSession) -> Result<StreamHandle, CaptureError> {
        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let bytes = wav::f32_to_s16le(data);
                if let Ok(mut session) = session.lock() {
                    session.push_chunk(&bytes);
                }
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None, // no timeout
        )?;

        stream.play()?;
        Ok(StreamHandle { _stream: stream })
    }

    /// Native sample rate of the capture stream in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels delivered by the callback.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}

// ---------------------------------------------------------------------------
// MicSource
// ---------------------------------------------------------------------------

/// Production [`AudioSource`]: availability probe plus WAV framing.
///
/// The cpal stream itself is owned by the main thread (it is not `Send` on
/// all platforms), so `acquire` only answers "can we record?" — the result
/// of the startup probe.  When the probe failed the app still runs and
/// every `start` surfaces the failure as a conversation message.
pub struct MicSource {
    availability: Result<(), String>,
    sample_rate: u32,
    channels: u16,
}

impl MicSource {
    /// A source backed by a successfully opened capture stream.
    pub fn new(capture: &MicCapture) -> Self {
        Self {
            availability: Ok(()),
            sample_rate: capture.sample_rate(),
            channels: capture.channels(),
        }
    }

    /// A source for the degraded no-microphone mode.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            availability: Err(reason.into()),
            sample_rate: 16_000,
            channels: 1,
        }
    }
}

impl AudioSource for MicSource {
    fn acquire(&self) -> Result<(), RecorderError> {
        self.availability
            .clone()
            .map_err(RecorderError::DeviceUnavailable)
    }

    fn package(&self, raw: Vec<u8>) -> Vec<u8> {
        // A zero-chunk session finalizes to an empty payload, not a
        // header-only container.
        if raw.is_empty() {
            return raw;
        }
        match wav::encode_wav(&raw, self.sample_rate, self.channels) {
            Ok(framed) => framed,
            Err(e) => {
                log::error!("audio: WAV framing failed: {e}");
                Vec::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
