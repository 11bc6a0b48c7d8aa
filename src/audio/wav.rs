//! WAV framing via `hound`.
//!
//! The capture callback delivers interleaved `f32` samples; the session
//! stores them as raw signed 16-bit little-endian PCM.  At finalization the
//! concatenated PCM is wrapped in a WAV container so the backend receives a
//! self-describing `audio/wav` upload.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

// ---------------------------------------------------------------------------
// Sample conversion
// ---------------------------------------------------------------------------

/// Convert interleaved `f32` samples in `[-1.0, 1.0]` to raw s16le bytes.
///
/// Out-of-range samples are clamped, never wrapped.
pub fn f32_to_s16le(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let value = (clamped * i16::MAX as f32) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

// ---------------------------------------------------------------------------
// WAV encoding
// ---------------------------------------------------------------------------

/// Wrap raw s16le PCM bytes in a WAV container.
///
/// A trailing odd byte (truncated sample) is dropped.
pub fn encode_wav(pcm: &[u8], sample_rate: u32, channels: u16) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for pair in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
