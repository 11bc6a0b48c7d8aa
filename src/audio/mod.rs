//! Audio capture and packaging.
//!
//! * [`MicCapture`] / [`StreamHandle`] — cpal device lifecycle; the stream
//!   feeds the shared recording session for the whole app lifetime.
//! * [`MicSource`] — production `AudioSource` (availability + WAV framing).
//! * [`wav`] — sample conversion and WAV container encoding via `hound`.

pub mod mic;
pub mod wav;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use mic::{CaptureError, MicCapture, MicSource, StreamHandle};
pub use wav::{encode_wav, f32_to_s16le};
