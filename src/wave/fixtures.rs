//! Hand-assembled RIFF/WAVE buffers for unit tests.

/// Builder for test WAV buffers, including deliberately malformed ones.
#[derive(Debug, Clone)]
pub(crate) struct WavBuilder {
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    audio_format: u16,
    fmt_size: Option<u32>,
    junk: Option<Vec<u8>>,
    extra_chunks: Vec<([u8; 4], Vec<u8>)>,
    data: Vec<u8>,
    data_len: Option<u32>,
    riff_len: Option<u32>,
}

impl WavBuilder {
    /// 16-bit PCM with the given shape and no samples.
    pub fn pcm16(channels: u16, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
            bits_per_sample: 16,
            audio_format: 1,
            fmt_size: None,
            junk: None,
            extra_chunks: Vec::new(),
            data: Vec::new(),
            data_len: None,
            riff_len: None,
        }
    }

    /// Append interleaved 16-bit frames.
    pub fn frames(mut self, frames: &[&[i16]]) -> Self {
        for frame in frames {
            for s in frame.iter() {
                self.data.extend_from_slice(&s.to_le_bytes());
            }
        }
        self
    }

    /// Replace the data payload with raw bytes.
    pub fn raw_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub fn bits_per_sample(mut self, bits: u16) -> Self {
        self.bits_per_sample = bits;
        self
    }

    pub fn audio_format(mut self, code: u16) -> Self {
        self.audio_format = code;
        self
    }

    /// Lie about the fmt chunk size.
    pub fn fmt_size(mut self, size: u32) -> Self {
        self.fmt_size = Some(size);
        self
    }

    pub fn junk(mut self, payload: Vec<u8>) -> Self {
        self.junk = Some(payload);
        self
    }

    /// Insert a chunk between `fmt ` and `data`.
    pub fn chunk(mut self, tag: &[u8; 4], payload: Vec<u8>) -> Self {
        self.extra_chunks.push((*tag, payload));
        self
    }

    /// Lie about the data chunk length.
    pub fn data_len(mut self, len: u32) -> Self {
        self.data_len = Some(len);
        self
    }

    /// Lie about the RIFF chunk length.
    pub fn riff_len(mut self, len: u32) -> Self {
        self.riff_len = Some(len);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let width = self.bits_per_sample / 8;
        let block_align = self.channels * width;
        let byte_rate = self.sample_rate * u32::from(block_align);

        let mut body = Vec::new();
        body.extend_from_slice(b"WAVE");
        if let Some(junk) = &self.junk {
            body.extend_from_slice(b"JUNK");
            body.extend_from_slice(&(junk.len() as u32).to_le_bytes());
            body.extend_from_slice(junk);
        }
        body.extend_from_slice(b"fmt ");
        body.extend_from_slice(&self.fmt_size.unwrap_or(16).to_le_bytes());
        body.extend_from_slice(&self.audio_format.to_le_bytes());
        body.extend_from_slice(&self.channels.to_le_bytes());
        body.extend_from_slice(&self.sample_rate.to_le_bytes());
        body.extend_from_slice(&byte_rate.to_le_bytes());
        body.extend_from_slice(&block_align.to_le_bytes());
        body.extend_from_slice(&self.bits_per_sample.to_le_bytes());
        for (tag, payload) in &self.extra_chunks {
            body.extend_from_slice(tag);
            body.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            body.extend_from_slice(payload);
            if payload.len() % 2 == 1 {
                body.push(0);
            }
        }
        body.extend_from_slice(b"data");
        let data_len = self.data_len.unwrap_or(self.data.len() as u32);
        body.extend_from_slice(&data_len.to_le_bytes());
        body.extend_from_slice(&self.data);

        let mut out = Vec::with_capacity(body.len() + 8);
        out.extend_from_slice(b"RIFF");
        let riff_len = self.riff_len.unwrap_or(body.len() as u32);
        out.extend_from_slice(&riff_len.to_le_bytes());
        out.extend_from_slice(&body);
        out
    }
}

/// Mono 16 kHz 16-bit file holding `n` frames of a ramp pattern.
pub(crate) fn mono_ramp(n: usize) -> Vec<u8> {
    let samples: Vec<i16> = (0..n).map(|i| (i as i16).wrapping_mul(7).wrapping_sub(100)).collect();
    let frames: Vec<&[i16]> = samples.chunks(1).collect();
    WavBuilder::pcm16(1, 16_000).frames(&frames).build()
}
