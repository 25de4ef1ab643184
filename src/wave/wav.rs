//! In-memory multi-channel PCM audio and the editing operations over it.
//!
//! # Invariant
//!
//! Every channel sequence in a [`Wave`] has the same length.  The fields are
//! private so only the constructors and editing operations below can touch
//! the samples, and each of them either preserves the invariant or fails
//! without mutating anything.
//!
//! # Example
//!
//! ```rust
//! use asrt_sdk::wave::Wave;
//!
//! let speech = Wave::from_channels(16_000, 2, vec![vec![100, -100, 50]]).unwrap();
//! let mut joined = Wave::new_blank(16_000, 1, 2);
//!
//! joined.append_wave(&speech).unwrap();
//! joined.append_blank(250); // 250 ms of silence
//! joined.append_wave(&speech).unwrap();
//!
//! assert_eq!(joined.frame_count(), 3 + 4_000 + 3);
//! ```

use std::path::Path;

use super::body::decode_body;
use super::encode;
use super::error::WaveError;
use super::header::parse_header;

// ---------------------------------------------------------------------------
// Wave
// ---------------------------------------------------------------------------

/// Multi-channel 16-bit PCM audio plus its format metadata.
///
/// A `Wave` exclusively owns its samples.  It is `Send`, so a finished wave
/// can be moved into another task (e.g. queued for streaming recognition),
/// but it is never shared mutably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wave {
    /// One sequence per channel, all of equal length.
    samples: Vec<Vec<i16>>,
    /// Sample rate in Hz.
    frame_rate: u32,
    channels: u16,
    /// Bytes per sample per channel.
    sample_width: u16,
    /// Byte rate as stored in the file (or derived for blank waves).
    bytes_per_sec: u32,
}

// Compile-time assertion: a Wave can be handed across task boundaries.
const _: fn() = || {
    fn _assert_send<T: Send + 'static>() {}
    _assert_send::<Wave>();
};

impl Wave {
    /// A wave with `channels` empty sequences.
    ///
    /// `bytes_per_sec` is derived as `frame_rate * channels * sample_width`,
    /// saturating at `u32::MAX`.
    pub fn new_blank(frame_rate: u32, channels: u16, sample_width: u16) -> Self {
        Self {
            samples: vec![Vec::new(); channels as usize],
            frame_rate,
            channels,
            sample_width,
            bytes_per_sec: frame_rate
                .saturating_mul(u32::from(channels))
                .saturating_mul(u32::from(sample_width)),
        }
    }

    /// Build a wave from per-channel samples.
    ///
    /// # Errors
    ///
    /// [`WaveError::RaggedChannels`] when the sequences differ in length, and
    /// [`WaveError::InvalidFormat`] for more than `u16::MAX` channels.
    pub fn from_channels(
        frame_rate: u32,
        sample_width: u16,
        samples: Vec<Vec<i16>>,
    ) -> Result<Self, WaveError> {
        let channels = u16::try_from(samples.len())
            .map_err(|_| WaveError::InvalidFormat(format!("{} channels", samples.len())))?;
        if let Some(first) = samples.first() {
            if samples.iter().any(|c| c.len() != first.len()) {
                return Err(WaveError::RaggedChannels);
            }
        }

        let mut wave = Self::new_blank(frame_rate, channels, sample_width);
        wave.samples = samples;
        Ok(wave)
    }

    /// Decode a complete RIFF/WAVE byte buffer.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, WaveError> {
        let header = parse_header(bytes)?;
        let samples = decode_body(bytes, &header)?;
        let fmt = header.format;

        log::debug!(
            "wave: decoded {} Hz, {} ch, {}-byte samples ({:?})",
            fmt.sample_rate,
            fmt.channels,
            fmt.sample_width(),
            header.data_location
        );

        Ok(Self {
            samples,
            frame_rate: fmt.sample_rate,
            channels: fmt.channels,
            sample_width: fmt.sample_width(),
            bytes_per_sec: fmt.byte_rate,
        })
    }

    /// Encode as a minimal RIFF/WAVE file.  See [`encode::encode`].
    pub fn serialize(&self) -> Result<Vec<u8>, WaveError> {
        encode::encode(self)
    }

    /// Interleaved little-endian samples without the RIFF wrapper.
    pub fn raw_samples(&self) -> Vec<u8> {
        encode::raw_samples(self)
    }

    /// Read and decode a WAV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WaveError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::deserialize(&bytes)
    }

    /// Serialize and write to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WaveError> {
        let bytes = self.serialize()?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_width(&self) -> u16 {
        self.sample_width
    }

    pub fn bytes_per_sec(&self) -> u32 {
        self.bytes_per_sec
    }

    /// All channel sequences.
    pub fn samples(&self) -> &[Vec<i16>] {
        &self.samples
    }

    /// Samples of one channel, if it exists.
    pub fn channel(&self, index: usize) -> Option<&[i16]> {
        self.samples.get(index).map(Vec::as_slice)
    }

    /// Samples per channel.
    pub fn frame_count(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    /// Returns `true` when there is no channel or no sample to play.
    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Length in whole milliseconds (0 when the frame rate is 0).
    pub fn duration_ms(&self) -> u64 {
        if self.frame_rate == 0 {
            return 0;
        }
        self.frame_count() as u64 * 1000 / u64::from(self.frame_rate)
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Append `other`'s samples channel by channel.
    ///
    /// # Errors
    ///
    /// Checked in this order; `self` is untouched on failure:
    /// [`WaveError::FrameRateMismatch`], [`WaveError::ChannelMismatch`],
    /// [`WaveError::SampleWidthMismatch`], [`WaveError::ShapeMismatch`],
    /// [`WaveError::EmptyChannelData`].
    pub fn append_wave(&mut self, other: &Wave) -> Result<(), WaveError> {
        if self.frame_rate != other.frame_rate {
            return Err(WaveError::FrameRateMismatch {
                this: self.frame_rate,
                other: other.frame_rate,
            });
        }
        if self.channels != other.channels {
            return Err(WaveError::ChannelMismatch {
                this: self.channels,
                other: other.channels,
            });
        }
        if self.sample_width != other.sample_width {
            return Err(WaveError::SampleWidthMismatch {
                this: self.sample_width,
                other: other.sample_width,
            });
        }
        if self.samples.len() != other.samples.len() {
            return Err(WaveError::ShapeMismatch {
                this: self.samples.len(),
                other: other.samples.len(),
            });
        }
        if self.samples.is_empty() {
            return Err(WaveError::EmptyChannelData);
        }

        for (dst, src) in self.samples.iter_mut().zip(&other.samples) {
            dst.extend_from_slice(src);
        }
        Ok(())
    }

    /// Append `millis` milliseconds of silence to every channel.
    ///
    /// The sample count is `millis * (frame_rate / 1000)` in integer
    /// arithmetic, so rates that are not a multiple of 1 kHz lose the
    /// fractional part per millisecond.
    pub fn append_blank(&mut self, millis: u32) {
        let count = millis as usize * (self.frame_rate / 1000) as usize;
        for channel in &mut self.samples {
            channel.resize(channel.len() + count, 0);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
