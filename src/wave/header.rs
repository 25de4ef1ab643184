//! RIFF/WAVE header parsing.
//!
//! Validates the outer container, reads the canonical 16-byte PCM format
//! fields and locates the `data` region.
//!
//! # Locating `data`
//!
//! Two strategies are tried in order:
//!
//! 1. **Chunk walk**: starting at the end of the `fmt ` chunk, read each
//!    sub-chunk's tag and length and skip unknown chunks by their declared
//!    (word-aligned) length.  Chunk payloads that happen to contain the bytes
//!    `da` are never mistaken for the data tag.
//! 2. **Scan**: when the walk runs off the buffer (a lying `fmt ` size, a
//!    truncated vendor chunk), fall back to scanning two bytes at a time for
//!    `da`, immediately followed by `ta`, right after the PCM format fields.
//!    This keeps files with unreliable chunk lengths decodable.
//!
//! ```text
//! offset  field
//!      0  "RIFF"
//!      4  u32 LE  file size - 8
//!      8  "WAVE"
//!     12  "JUNK" (optional: u32 LE length + payload) | "fmt "
//!   fmt+0 u32 LE  fmt chunk size
//!   fmt+4 u16 LE  audio format (1 = PCM)
//!   fmt+6 u16 LE  channels
//!   fmt+8 u32 LE  sample rate
//!  fmt+12 u32 LE  byte rate
//!  fmt+16 u16 LE  block align
//!  fmt+18 u16 LE  bits per sample
//!     ... "data"  u32 LE length, then interleaved samples
//! ```

use super::cursor::ByteCursor;
use super::error::WaveError;

pub const RIFF_TAG: [u8; 4] = *b"RIFF";
pub const WAVE_TAG: [u8; 4] = *b"WAVE";
pub const JUNK_TAG: [u8; 4] = *b"JUNK";
pub const FMT_TAG: [u8; 4] = *b"fmt ";
pub const DATA_TAG: [u8; 4] = *b"data";

/// Linear PCM format code.
pub const WAVE_FORMAT_PCM: u16 = 1;

/// `"da"` and `"ta"` read as big-endian 16-bit values.
const DATA_HEAD: u16 = 0x6461;
const DATA_TAIL: u16 = 0x7461;

/// Declared data lengths below this are replaced by the remaining buffer.
const MIN_DECLARED_DATA_LEN: u32 = 2;

// ---------------------------------------------------------------------------
// FormatChunk
// ---------------------------------------------------------------------------

/// Fields of the `fmt ` chunk.  Only needed while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChunk {
    /// Declared size of the `fmt ` chunk body.  Kept as metadata only.
    pub chunk_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    /// Stored byte rate; not reconciled with the other fields.
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FormatChunk {
    /// Bytes per sample per channel.
    pub fn sample_width(&self) -> u16 {
        self.bits_per_sample / 8
    }
}

// ---------------------------------------------------------------------------
// WaveHeader
// ---------------------------------------------------------------------------

/// How the `data` chunk was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataLocation {
    ChunkWalk,
    Scan,
}

/// Result of [`parse_header`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveHeader {
    pub format: FormatChunk,
    /// Byte offset of the first sample.
    pub data_offset: usize,
    /// Length of the sample region in bytes.
    pub data_len: usize,
    pub data_location: DataLocation,
}

/// Validate the container and locate the sample region.
///
/// # Errors
///
/// In check order: [`WaveError::NotRiffFormat`], [`WaveError::LengthMismatch`],
/// [`WaveError::NotWaveFile`], [`WaveError::NoFmtOrJunkFlag`],
/// [`WaveError::UnsupportedAudioFormat`], [`WaveError::DataFlagNotFound`].
/// A buffer that ends inside the format fields yields [`WaveError::Truncated`].
pub fn parse_header(buf: &[u8]) -> Result<WaveHeader, WaveError> {
    let mut cur = ByteCursor::new(buf);

    match cur.read_tag() {
        Ok(tag) if tag == RIFF_TAG => {}
        _ => return Err(WaveError::NotRiffFormat),
    }

    let declared = cur.read_u32_le().map_err(|_| WaveError::LengthMismatch {
        declared: 0,
        actual: cur.remaining(),
    })?;
    let actual = buf.len() - cur.position();
    if declared as usize != actual {
        return Err(WaveError::LengthMismatch { declared, actual });
    }

    match cur.read_tag() {
        Ok(tag) if tag == WAVE_TAG => {}
        _ => return Err(WaveError::NotWaveFile),
    }

    match cur.read_tag() {
        Ok(tag) if tag == FMT_TAG => {}
        Ok(tag) if tag == JUNK_TAG => {
            let junk_len = cur.read_u32_le()?;
            cur.skip(junk_len as usize)?;
            log::trace!("wave: skipped {junk_len}-byte JUNK chunk");
            match cur.read_tag() {
                Ok(tag) if tag == FMT_TAG => {}
                _ => return Err(WaveError::NoFmtOrJunkFlag),
            }
        }
        _ => return Err(WaveError::NoFmtOrJunkFlag),
    }

    let chunk_size = cur.read_u32_le()?;
    let fmt_body_start = cur.position();

    let audio_format = cur.read_u16_le()?;
    if audio_format != WAVE_FORMAT_PCM {
        return Err(WaveError::UnsupportedAudioFormat(audio_format));
    }

    let format = FormatChunk {
        chunk_size,
        audio_format,
        channels: cur.read_u16_le()?,
        sample_rate: cur.read_u32_le()?,
        byte_rate: cur.read_u32_le()?,
        block_align: cur.read_u16_le()?,
        bits_per_sample: cur.read_u16_le()?,
    };
    let fmt_fields_end = cur.position();

    let walk_start = fmt_body_start.checked_add(chunk_size as usize);
    let (len_pos, data_location) = match walk_start.and_then(|start| walk_to_data(buf, start)) {
        Some(pos) => (pos, DataLocation::ChunkWalk),
        None => {
            log::debug!("wave: chunk walk failed, scanning for `data` from offset {fmt_fields_end}");
            (scan_for_data(buf, fmt_fields_end)?, DataLocation::Scan)
        }
    };

    let mut cur = ByteCursor::at(buf, len_pos);
    let declared_len = cur.read_u32_le()?;
    let data_offset = cur.position();
    let data_len = if declared_len < MIN_DECLARED_DATA_LEN {
        log::debug!("wave: declared data length {declared_len} too small, using rest of buffer");
        cur.remaining()
    } else {
        declared_len as usize
    };

    Ok(WaveHeader {
        format,
        data_offset,
        data_len,
        data_location,
    })
}

/// Walk sub-chunks from `start`; return the offset of the `data` length field.
fn walk_to_data(buf: &[u8], start: usize) -> Option<usize> {
    if start > buf.len() {
        return None;
    }
    let mut cur = ByteCursor::at(buf, start);
    loop {
        let tag = cur.read_tag().ok()?;
        if tag == DATA_TAG {
            return Some(cur.position());
        }
        let len = cur.read_u32_le().ok()? as usize;
        log::trace!(
            "wave: skipping `{}` chunk ({len} bytes)",
            String::from_utf8_lossy(&tag)
        );
        // RIFF chunks are word aligned.
        cur.skip(len + (len & 1)).ok()?;
    }
}

/// Scan two bytes at a time for `da` then require `ta`; return the offset of
/// the `data` length field.
fn scan_for_data(buf: &[u8], start: usize) -> Result<usize, WaveError> {
    let mut cur = ByteCursor::at(buf, start);
    loop {
        match cur.read_u16_be() {
            Ok(DATA_HEAD) => break,
            Ok(_) => {}
            Err(_) => return Err(WaveError::DataFlagNotFound),
        }
    }
    match cur.read_u16_be() {
        Ok(DATA_TAIL) => Ok(cur.position()),
        _ => Err(WaveError::DataFlagNotFound),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
