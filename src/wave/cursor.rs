//! Forward-only byte cursor used by the header parser and body decoder.
//!
//! Nothing in a RIFF/WAVE buffer is random-accessed: every field is read in
//! order and the cursor position only ever moves forward.  Out-of-range reads
//! surface as [`WaveError::Truncated`] instead of panicking.

use super::error::WaveError;

/// Sequential reader over a borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Start reading at `pos` (clamped to the buffer length).
    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self {
            buf,
            pos: pos.min(buf.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], WaveError> {
        if n > self.remaining() {
            return Err(WaveError::Truncated {
                offset: self.pos,
                needed: n,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Advance by `n` bytes without reading them.
    pub fn skip(&mut self, n: usize) -> Result<(), WaveError> {
        self.read_bytes(n).map(|_| ())
    }

    /// Read a four-character chunk tag such as `b"RIFF"`.
    pub fn read_tag(&mut self) -> Result<[u8; 4], WaveError> {
        let b = self.read_bytes(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, WaveError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Big-endian 16-bit read, used when scanning for half of an ASCII tag.
    pub fn read_u16_be(&mut self) -> Result<u16, WaveError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, WaveError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a little-endian signed sample `width` bytes wide, narrowed to
    /// 16 bits.
    ///
    /// 8-bit samples are widened.  Samples wider than 16 bits keep their two
    /// most significant bytes, i.e. they are scaled down to 16 bits.  This
    /// deliberately differs from a plain truncation to the first two bytes,
    /// which would keep only the low-order noise of a 24- or 32-bit sample.
    pub fn read_sample(&mut self, width: usize) -> Result<i16, WaveError> {
        let b = self.read_bytes(width)?;
        let sample = match width {
            1 => i16::from(b[0] as i8),
            _ => i16::from_le_bytes([b[width - 2], b[width - 1]]),
        };
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_position() {
        let data = [b'R', b'I', b'F', b'F', 0x10, 0x00, 0x00, 0x00, 0x01, 0x00];
        let mut c = ByteCursor::new(&data);

        assert_eq!(&c.read_tag().unwrap(), b"RIFF");
        assert_eq!(c.position(), 4);
        assert_eq!(c.read_u32_le().unwrap(), 16);
        assert_eq!(c.read_u16_le().unwrap(), 1);
        assert!(c.is_at_end());
    }

    #[test]
    fn big_endian_read_matches_ascii_pair() {
        let mut c = ByteCursor::new(b"data");
        assert_eq!(c.read_u16_be().unwrap(), 0x6461);
        assert_eq!(c.read_u16_be().unwrap(), 0x7461);
    }

    #[test]
    fn read_past_end_is_truncated() {
        let mut c = ByteCursor::new(&[0u8; 3]);
        let err = c.read_u32_le().unwrap_err();
        assert!(matches!(
            err,
            WaveError::Truncated {
                offset: 0,
                needed: 4
            }
        ));
        // A failed read must not move the cursor.
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn skip_checks_bounds() {
        let mut c = ByteCursor::new(&[0u8; 8]);
        c.skip(6).unwrap();
        assert_eq!(c.remaining(), 2);
        assert!(c.skip(3).is_err());
    }

    #[test]
    fn at_clamps_to_buffer_length() {
        let data = [0u8; 4];
        let c = ByteCursor::at(&data, 10);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn read_sample_handles_widths() {
        let mut c = ByteCursor::new(&[0x34, 0x12]);
        assert_eq!(c.read_sample(2).unwrap(), 0x1234);

        let mut c = ByteCursor::new(&[0xFF]);
        assert_eq!(c.read_sample(1).unwrap(), -1);

        // 24-bit: keep the top two bytes.
        let mut c = ByteCursor::new(&[0xAA, 0x00, 0x80]);
        assert_eq!(c.read_sample(3).unwrap(), i16::MIN);
    }

    #[test]
    fn wide_samples_are_scaled_not_truncated() {
        // 32-bit 0x4000_FFFF: the low half is noise, the high half is signal.
        let mut c = ByteCursor::new(&[0xFF, 0xFF, 0x00, 0x40]);
        assert_eq!(c.read_sample(4).unwrap(), 0x4000);
        assert!(c.is_at_end());

        // 24-bit -2 (0xFF_FFFE) scales to -1, not to the low bytes' -2.
        let mut c = ByteCursor::new(&[0xFE, 0xFF, 0xFF]);
        assert_eq!(c.read_sample(3).unwrap(), -1);
    }
}
