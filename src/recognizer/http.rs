//! `HttpSpeechRecognizer`: the JSON-over-HTTP client for an ASRT server.
//!
//! Endpoints, relative to [`ServerConfig::base_url`]:
//!
//! | method                 | path        | body                |
//! |------------------------|-------------|---------------------|
//! | `recognize`            | `/all`      | [`SpeechRequest`]   |
//! | `recognize_speech`     | `/speech`   | [`SpeechRequest`]   |
//! | `recognize_language`   | `/language` | [`LanguageRequest`] |

use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiResponse, LanguageRequest, SpeechRequest};
use crate::config::{AudioConfig, ServerConfig};
use crate::recognizer::engine::{check_payload_len, RecognizerError, SpeechRecognizer};

const USER_AGENT: &str = concat!("asrt-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// Recognizer that posts JSON requests to an ASRT HTTP(S) server.
pub struct HttpSpeechRecognizer {
    client: reqwest::Client,
    base_url: String,
    limits: AudioConfig,
}

impl HttpSpeechRecognizer {
    /// Build a recognizer from the server and audio config.
    ///
    /// Only `http` and `https` are accepted.  The HTTP client carries the
    /// per-request timeout from `server.timeout_secs`; a default client is
    /// used if the builder fails.
    pub fn from_config(server: &ServerConfig, audio: &AudioConfig) -> Result<Self, RecognizerError> {
        if !server.protocol.is_http() {
            return Err(RecognizerError::UnsupportedProtocol(
                server.protocol.to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(server.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            client,
            base_url: server.base_url(),
            limits: audio.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        name: &str,
        body: &B,
    ) -> Result<ApiResponse, RecognizerError> {
        let url = self.endpoint(name);
        log::debug!("recognizer: POST {url}");

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("recognizer: {url} answered HTTP {status}");
        }

        let text = response.text().await?;
        let parsed: ApiResponse =
            serde_json::from_str(&text).map_err(|e| RecognizerError::Parse(e.to_string()))?;

        if !parsed.status().is_success() {
            log::warn!(
                "recognizer: server status {} ({})",
                parsed.status_code,
                parsed.status_message
            );
        }
        Ok(parsed)
    }

    async fn post_samples(
        &self,
        name: &str,
        samples: &[u8],
        frame_rate: u32,
        channels: u16,
        byte_width: u16,
    ) -> Result<ApiResponse, RecognizerError> {
        check_payload_len(samples.len(), &self.limits)?;
        let body = SpeechRequest::new(samples, frame_rate, channels, byte_width);
        self.post(name, &body).await
    }
}

#[async_trait]
impl SpeechRecognizer for HttpSpeechRecognizer {
    async fn recognize(
        &self,
        samples: &[u8],
        frame_rate: u32,
        channels: u16,
        byte_width: u16,
    ) -> Result<ApiResponse, RecognizerError> {
        self.post_samples("all", samples, frame_rate, channels, byte_width)
            .await
    }

    async fn recognize_speech(
        &self,
        samples: &[u8],
        frame_rate: u32,
        channels: u16,
        byte_width: u16,
    ) -> Result<ApiResponse, RecognizerError> {
        self.post_samples("speech", samples, frame_rate, channels, byte_width)
            .await
    }

    async fn recognize_language(
        &self,
        sequence_pinyin: &[String],
    ) -> Result<ApiResponse, RecognizerError> {
        self.post("language", &LanguageRequest::new(sequence_pinyin))
            .await
    }

    fn audio_limits(&self) -> &AudioConfig {
        &self.limits
    }
}

// ---------------------------------------------------------------------------
// Tests (no network)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Protocol;

    fn server(protocol: Protocol) -> ServerConfig {
        ServerConfig {
            protocol,
            ..ServerConfig::default()
        }
    }

    #[test]
    fn grpc_is_rejected() {
        for protocol in [Protocol::Grpc, Protocol::Grpcs] {
            let result = HttpSpeechRecognizer::from_config(&server(protocol), &AudioConfig::default());
            assert!(matches!(
                result,
                Err(RecognizerError::UnsupportedProtocol(ref p)) if p.starts_with("grpc")
            ));
        }
    }

    #[test]
    fn endpoints_follow_base_url() {
        let mut cfg = server(Protocol::Https);
        cfg.host = "asr.example.com".into();
        cfg.port = 443;
        cfg.sub_path = "/v1/".into();

        let r = HttpSpeechRecognizer::from_config(&cfg, &AudioConfig::default()).unwrap();
        assert_eq!(r.base_url(), "https://asr.example.com:443/v1");
        assert_eq!(r.endpoint("all"), "https://asr.example.com:443/v1/all");
        assert_eq!(r.endpoint("language"), "https://asr.example.com:443/v1/language");
    }

    #[tokio::test]
    async fn oversized_payload_fails_before_any_request() {
        // Port 9 (discard) on localhost: if a request were attempted the
        // error would be Request or Timeout, not SamplesTooLong.
        let mut cfg = server(Protocol::Http);
        cfg.port = 9;
        let limits = AudioConfig {
            max_sample_bytes: 8,
            ..AudioConfig::default()
        };
        let r = HttpSpeechRecognizer::from_config(&cfg, &limits).unwrap();

        let err = r.recognize(&[0u8; 9], 16_000, 1, 2).await.unwrap_err();
        assert!(matches!(err, RecognizerError::SamplesTooLong { len: 9, max: 8 }));

        let err = r.recognize_speech(&[0u8; 9], 16_000, 1, 2).await.unwrap_err();
        assert!(matches!(err, RecognizerError::SamplesTooLong { .. }));
    }

    #[test]
    fn limits_are_exposed() {
        let r = HttpSpeechRecognizer::from_config(&server(Protocol::Http), &AudioConfig::default())
            .unwrap();
        assert_eq!(r.audio_limits().segment_secs, 10);
    }
}
