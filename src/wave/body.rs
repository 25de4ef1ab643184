//! PCM body decoding: deinterleave the `data` region into per-channel
//! sample sequences.

use super::cursor::ByteCursor;
use super::error::WaveError;
use super::header::WaveHeader;

/// Deinterleave the sample region described by `header`.
///
/// Frame count is `data_len / block_align`; a trailing partial frame is
/// dropped.  Each sample is `bits_per_sample / 8` bytes and the cursor
/// advances by exactly that much per channel, so interleaved frames are
/// consumed contiguously.
pub fn decode_body(buf: &[u8], header: &WaveHeader) -> Result<Vec<Vec<i16>>, WaveError> {
    let fmt = &header.format;
    if fmt.block_align == 0 {
        return Err(WaveError::InvalidFormat("block align is zero".into()));
    }
    let width = fmt.sample_width() as usize;
    if width == 0 {
        return Err(WaveError::InvalidFormat(format!(
            "{} bits per sample is less than one byte",
            fmt.bits_per_sample
        )));
    }

    let channels = fmt.channels as usize;
    let frames = header.data_len / fmt.block_align as usize;
    log::debug!(
        "wave: decoding {frames} frames x {channels} channels ({width} bytes/sample)"
    );

    let mut samples: Vec<Vec<i16>> = (0..channels).map(|_| Vec::with_capacity(frames)).collect();
    let mut cur = ByteCursor::at(buf, header.data_offset);
    for _ in 0..frames {
        for channel in samples.iter_mut() {
            channel.push(cur.read_sample(width)?);
        }
    }

    Ok(samples)
}
