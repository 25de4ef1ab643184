//! RIFF/WAVE PCM codec and audio editing.
//!
//! # Pipeline
//!
//! ```text
//! bytes ─▶ parse_header ─▶ decode_body ─▶ Wave ─▶ append_wave / append_blank
//!                                           │
//!                                           ├─▶ encode      ─▶ RIFF/WAVE bytes
//!                                           └─▶ raw_samples ─▶ interleaved PCM
//! ```
//!
//! Everything here is synchronous and in-memory: no suspension points and no
//! shared state.  Only linear PCM is accepted; only 16-bit samples are
//! written.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use asrt_sdk::wave::{decode_wav, encode_wav, Wave};
//!
//! let bytes = std::fs::read("speech.wav").unwrap();
//! let mut wave = decode_wav(&bytes).unwrap();
//!
//! wave.append_blank(500);
//! wave.append_wave(&Wave::load("more.wav").unwrap()).unwrap();
//!
//! std::fs::write("joined.wav", encode_wav(&wave).unwrap()).unwrap();
//! ```

pub mod body;
pub mod cursor;
pub mod encode;
pub mod error;
pub mod header;
pub mod wav;

#[cfg(test)]
pub(crate) mod fixtures;

use std::path::Path;

pub use body::decode_body;
pub use cursor::ByteCursor;
pub use encode::{encode, raw_samples};
pub use error::WaveError;
pub use header::{parse_header, DataLocation, FormatChunk, WaveHeader};
pub use wav::Wave;

/// Decode a RIFF/WAVE buffer into a [`Wave`].
pub fn decode_wav(bytes: &[u8]) -> Result<Wave, WaveError> {
    Wave::deserialize(bytes)
}

/// Encode a [`Wave`] as a RIFF/WAVE buffer.
pub fn encode_wav(wave: &Wave) -> Result<Vec<u8>, WaveError> {
    encode(wave)
}

/// Read a whole file into memory.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<u8>, WaveError> {
    Ok(std::fs::read(path.as_ref())?)
}
