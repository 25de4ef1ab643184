//! Wave serialization: pack a [`Wave`] into a minimal RIFF/WAVE/PCM buffer.
//!
//! The output never carries a `JUNK` or any vendor chunk, just `fmt ` (16
//! bytes, PCM) followed by `data`.

use super::error::WaveError;
use super::header::{DATA_TAG, FMT_TAG, RIFF_TAG, WAVE_FORMAT_PCM, WAVE_TAG};
use super::wav::Wave;

/// Size of the canonical PCM `fmt ` chunk body.
const PCM_FMT_CHUNK_SIZE: u32 = 16;

/// The only sample width the writer supports.
const SUPPORTED_SAMPLE_WIDTH: u16 = 2;

/// Serialize `wave` into a complete RIFF/WAVE byte buffer.
///
/// # Errors
///
/// - [`WaveError::EmptyAudioData`]: no channels, or channels with no samples.
///   A zero-length data chunk would not survive re-parsing.
/// - [`WaveError::UnsupportedSampleWidth`]: width other than 2 bytes.
/// - [`WaveError::InvalidFormat`]: a frame or the whole file too large for
///   the header fields.
pub fn encode(wave: &Wave) -> Result<Vec<u8>, WaveError> {
    if wave.is_empty() {
        return Err(WaveError::EmptyAudioData);
    }
    if wave.sample_width() != SUPPORTED_SAMPLE_WIDTH {
        return Err(WaveError::UnsupportedSampleWidth(wave.sample_width()));
    }

    let data = raw_samples(wave);
    let data_len = u32::try_from(data.len())
        .map_err(|_| WaveError::InvalidFormat("sample data exceeds 4 GiB".into()))?;

    let block_align = wave
        .channels()
        .checked_mul(wave.sample_width())
        .ok_or_else(|| {
            WaveError::InvalidFormat(format!("{} channels do not fit one frame", wave.channels()))
        })?;
    let bits_per_sample = wave.sample_width() * 8;

    let mut body = Vec::with_capacity(36 + data.len());
    body.extend_from_slice(&WAVE_TAG);
    body.extend_from_slice(&FMT_TAG);
    body.extend_from_slice(&PCM_FMT_CHUNK_SIZE.to_le_bytes());
    body.extend_from_slice(&WAVE_FORMAT_PCM.to_le_bytes());
    body.extend_from_slice(&wave.channels().to_le_bytes());
    body.extend_from_slice(&wave.frame_rate().to_le_bytes());
    body.extend_from_slice(&wave.bytes_per_sec().to_le_bytes());
    body.extend_from_slice(&block_align.to_le_bytes());
    body.extend_from_slice(&bits_per_sample.to_le_bytes());
    body.extend_from_slice(&DATA_TAG);
    body.extend_from_slice(&data_len.to_le_bytes());
    body.extend_from_slice(&data);

    let riff_len = u32::try_from(body.len())
        .map_err(|_| WaveError::InvalidFormat("file exceeds 4 GiB".into()))?;
    let mut out = Vec::with_capacity(body.len() + 8);
    out.extend_from_slice(&RIFF_TAG);
    out.extend_from_slice(&riff_len.to_le_bytes());
    out.extend_from_slice(&body);

    log::debug!(
        "wave: encoded {} frames x {} channels into {} bytes",
        wave.frame_count(),
        wave.channels(),
        out.len()
    );
    Ok(out)
}

/// Interleave all channels into little-endian 16-bit samples, frame by frame,
/// without any RIFF wrapping.
///
/// This is the payload the recognition API expects.  A wave with no channels
/// yields an empty buffer.
pub fn raw_samples(wave: &Wave) -> Vec<u8> {
    let samples = wave.samples();
    let frames = wave.frame_count();
    let mut out = Vec::with_capacity(frames * samples.len() * 2);
    for frame in 0..frames {
        for channel in samples {
            out.extend_from_slice(&channel[frame].to_le_bytes());
        }
    }
    out
}
