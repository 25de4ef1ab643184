//! Error type shared by the RIFF/WAVE parser, serializer and editing operations.

use thiserror::Error;

/// All errors raised by the wave codec.
///
/// Every variant is terminal for the operation that produced it: nothing is
/// retried and no partially decoded [`Wave`](super::Wave) is ever returned.
#[derive(Debug, Error)]
pub enum WaveError {
    // ---- header parsing ----------------------------------------------------
    /// Bytes 0..4 are not the ASCII tag `RIFF`.
    #[error("not a RIFF file")]
    NotRiffFormat,

    /// The RIFF chunk size does not equal the buffer length minus 8.
    #[error("RIFF length mismatch: header declares {declared} bytes but {actual} follow")]
    LengthMismatch { declared: u32, actual: usize },

    /// Bytes 8..12 are not the ASCII tag `WAVE`.
    #[error("not a WAVE file")]
    NotWaveFile,

    /// Neither a `JUNK` nor a `fmt ` chunk follows the `WAVE` tag.
    #[error("no `JUNK` or `fmt ` chunk after the WAVE tag")]
    NoFmtOrJunkFlag,

    /// The format chunk declares something other than linear PCM (code 1).
    #[error("unsupported audio format code {0} (only linear PCM is supported)")]
    UnsupportedAudioFormat(u16),

    /// No `data` chunk could be located after the format chunk.
    #[error("no `data` chunk found")]
    DataFlagNotFound,

    /// A read ran past the end of the buffer.
    #[error("truncated input: need {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// The format chunk declares a zero block align or sample width.
    #[error("invalid format chunk: {0}")]
    InvalidFormat(String),

    // ---- editing -----------------------------------------------------------
    #[error("channel count mismatch: this wave has {this}, appended wave has {other}")]
    ChannelMismatch { this: u16, other: u16 },

    #[error("frame rate mismatch: this wave is {this} Hz, appended wave is {other} Hz")]
    FrameRateMismatch { this: u32, other: u32 },

    #[error("sample width mismatch: this wave is {this} bytes, appended wave is {other} bytes")]
    SampleWidthMismatch { this: u16, other: u16 },

    /// The two waves hold a different number of channel sequences.
    #[error("sample shape mismatch: {this} channel sequences vs {other}")]
    ShapeMismatch { this: usize, other: usize },

    /// One of the waves has no channel sequences at all.
    #[error("wave has zero channels")]
    EmptyChannelData,

    /// Channel sequences passed to a constructor differ in length.
    #[error("channel sequences differ in length")]
    RaggedChannels,

    // ---- serialization -----------------------------------------------------
    #[error("wave holds no audio samples")]
    EmptyAudioData,

    /// Only 16-bit samples can be written.
    #[error("cannot serialize {0}-byte samples (only 2-byte samples are supported)")]
    UnsupportedSampleWidth(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_reports_both_lengths() {
        let e = WaveError::LengthMismatch {
            declared: 100,
            actual: 36,
        };
        let msg = e.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("36"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: WaveError = io.into();
        assert!(matches!(e, WaveError::Io(_)));
    }
}
