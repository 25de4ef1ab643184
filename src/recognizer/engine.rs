//! Core recognizer trait, its error type and a test double.
//!
//! # Overview
//!
//! [`SpeechRecognizer`] is the public interface of the SDK.  It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn SpeechRecognizer>` or a `Box<dyn SpeechRecognizer>`.
//!
//! Implementors provide the three endpoint calls.  Long-audio, wave and file
//! recognition are provided methods built on top of [`recognize`]: they
//! validate the audio shape, split the samples into fixed-length segments
//! and recognize each in order.
//!
//! [`MockRecognizer`] (available under `#[cfg(test)]`) returns a fixed
//! response and records the payload size of every call.
//!
//! [`recognize`]: SpeechRecognizer::recognize

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::api::ApiResponse;
use crate::config::AudioConfig;
use crate::wave::{Wave, WaveError};

// ---------------------------------------------------------------------------
// RecognizerError
// ---------------------------------------------------------------------------

/// All errors that can arise while talking to the recognition server.
#[derive(Debug, Error)]
pub enum RecognizerError {
    /// Decoding the input audio failed.
    #[error(transparent)]
    Wave(#[from] WaveError),

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("recognition request timed out")]
    Timeout,

    /// The response body was not a valid API envelope.
    #[error("failed to parse API response: {0}")]
    Parse(String),

    /// The raw sample payload exceeds the per-request limit.
    #[error("sample payload too long: {len} bytes (max {max})")]
    SamplesTooLong { len: usize, max: usize },

    #[error("unsupported sample rate {0} Hz")]
    UnsupportedSampleRate(u32),

    #[error("unsupported channel count {0}")]
    UnsupportedChannels(u16),

    #[error("unsupported sample width {0} bytes")]
    UnsupportedByteWidth(u16),

    /// No recognizer exists for the configured protocol.
    #[error("unsupported protocol `{0}`")]
    UnsupportedProtocol(String),

    /// The streaming session failed or was already closed.
    #[error("stream error: {0}")]
    Stream(String),
}

impl From<reqwest::Error> for RecognizerError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RecognizerError::Timeout
        } else {
            RecognizerError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Reject payloads larger than `limits.max_sample_bytes`.
pub fn check_payload_len(len: usize, limits: &AudioConfig) -> Result<(), RecognizerError> {
    if len > limits.max_sample_bytes {
        return Err(RecognizerError::SamplesTooLong {
            len,
            max: limits.max_sample_bytes,
        });
    }
    Ok(())
}

/// Reject audio whose shape differs from what long-audio recognition needs.
pub fn check_audio_shape(
    frame_rate: u32,
    channels: u16,
    byte_width: u16,
    limits: &AudioConfig,
) -> Result<(), RecognizerError> {
    if frame_rate != limits.frame_rate {
        return Err(RecognizerError::UnsupportedSampleRate(frame_rate));
    }
    if channels != limits.channels {
        return Err(RecognizerError::UnsupportedChannels(channels));
    }
    if byte_width != limits.byte_width {
        return Err(RecognizerError::UnsupportedByteWidth(byte_width));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// SpeechRecognizer trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to an ASRT recognition server.
///
/// `samples` arguments are interleaved little-endian PCM as produced by
/// [`Wave::raw_samples`].
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Full recognition: audio in, transcript out.
    async fn recognize(
        &self,
        samples: &[u8],
        frame_rate: u32,
        channels: u16,
        byte_width: u16,
    ) -> Result<ApiResponse, RecognizerError>;

    /// Acoustic model only: audio in, pinyin sequence out.
    async fn recognize_speech(
        &self,
        samples: &[u8],
        frame_rate: u32,
        channels: u16,
        byte_width: u16,
    ) -> Result<ApiResponse, RecognizerError>;

    /// Language model only: pinyin sequence in, transcript out.
    async fn recognize_language(
        &self,
        sequence_pinyin: &[String],
    ) -> Result<ApiResponse, RecognizerError>;

    /// Audio limits used by the provided long-audio methods.
    fn audio_limits(&self) -> &AudioConfig;

    /// Recognize audio of any length by splitting it into segments of
    /// `audio_limits().segment_secs` and recognizing each in order.
    ///
    /// Empty input yields no responses.  The first failing segment aborts
    /// the whole call.
    async fn recognize_long(
        &self,
        samples: &[u8],
        frame_rate: u32,
        channels: u16,
        byte_width: u16,
    ) -> Result<Vec<ApiResponse>, RecognizerError> {
        let limits = self.audio_limits();
        check_audio_shape(frame_rate, channels, byte_width, limits)?;

        let segment = limits.segment_bytes();
        let total = samples.len().div_ceil(segment);
        let mut responses = Vec::with_capacity(total);
        for (index, chunk) in samples.chunks(segment).enumerate() {
            log::debug!("recognizer: segment {}/{total} ({} bytes)", index + 1, chunk.len());
            responses.push(self.recognize(chunk, frame_rate, channels, byte_width).await?);
        }
        Ok(responses)
    }

    /// Recognize a decoded wave of any length.
    async fn recognize_wave(&self, wave: &Wave) -> Result<Vec<ApiResponse>, RecognizerError> {
        let samples = wave.raw_samples();
        self.recognize_long(
            &samples,
            wave.frame_rate(),
            wave.channels(),
            wave.sample_width(),
        )
        .await
    }

    /// Load, decode and recognize a WAV file.
    async fn recognize_file(&self, path: &Path) -> Result<Vec<ApiResponse>, RecognizerError> {
        log::info!("recognizer: recognizing file {}", path.display());
        let wave = Wave::load(path)?;
        self.recognize_wave(&wave).await
    }
}

// Compile-time assertion: Box<dyn SpeechRecognizer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechRecognizer>) {}
};

// ---------------------------------------------------------------------------
// MockRecognizer (test only)
// ---------------------------------------------------------------------------

/// A recognizer that answers every call with a pre-configured result.
#[cfg(test)]
pub struct MockRecognizer {
    reply: Result<String, String>,
    limits: AudioConfig,
    /// Payload length of every `recognize` / `recognize_speech` call.
    pub calls: std::sync::Mutex<Vec<usize>>,
}

#[cfg(test)]
impl MockRecognizer {
    /// Always answer with status 200000 and `text`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            limits: AudioConfig::default(),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Always fail with [`RecognizerError::Request`].
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            ..Self::ok("")
        }
    }

    pub fn with_limits(mut self, limits: AudioConfig) -> Self {
        self.limits = limits;
        self
    }

    fn answer(&self, len: usize) -> Result<ApiResponse, RecognizerError> {
        self.calls.lock().unwrap().push(len);
        match &self.reply {
            Ok(text) => Ok(ApiResponse::new(
                crate::api::ApiStatus::OK,
                "",
                crate::api::RecognitionResult::Text(text.clone()),
            )),
            Err(msg) => Err(RecognizerError::Request(msg.clone())),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn recognize(
        &self,
        samples: &[u8],
        _frame_rate: u32,
        _channels: u16,
        _byte_width: u16,
    ) -> Result<ApiResponse, RecognizerError> {
        check_payload_len(samples.len(), &self.limits)?;
        self.answer(samples.len())
    }

    async fn recognize_speech(
        &self,
        samples: &[u8],
        _frame_rate: u32,
        _channels: u16,
        _byte_width: u16,
    ) -> Result<ApiResponse, RecognizerError> {
        check_payload_len(samples.len(), &self.limits)?;
        self.answer(samples.len())
    }

    async fn recognize_language(
        &self,
        sequence_pinyin: &[String],
    ) -> Result<ApiResponse, RecognizerError> {
        self.answer(sequence_pinyin.len())
    }

    fn audio_limits(&self) -> &AudioConfig {
        &self.limits
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
