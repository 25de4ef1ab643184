//! Speech recognizer clients.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              SpeechRecognizer (trait)                   │
//! │   recognize / recognize_speech / recognize_language     │
//! │   recognize_long ─▶ recognize_wave ─▶ recognize_file    │
//! │                                                         │
//! │   ┌──────────────────────┐    ┌──────────────────────┐  │
//! │   │ HttpSpeechRecognizer │    │  StreamRecognition   │  │
//! │   │  POST /all /speech   │    │  send task ─▶ sink   │  │
//! │   │       /language      │    │  recv task ◀─ source │  │
//! │   └──────────────────────┘    └──────────────────────┘  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use asrt_sdk::config::SdkConfig;
//! use asrt_sdk::recognizer::connect;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let recognizer = connect(&SdkConfig::default())?;
//! for response in recognizer.recognize_file(std::path::Path::new("speech.wav")).await? {
//!     println!("{}", response.result);
//! }
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod http;
pub mod stream;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{check_audio_shape, check_payload_len, RecognizerError, SpeechRecognizer};
pub use http::HttpSpeechRecognizer;
pub use stream::{StreamRecognition, StreamSink, StreamSource, Transcript};

#[cfg(test)]
pub use engine::MockRecognizer;

use crate::config::SdkConfig;

/// Build the recognizer matching `config.server.protocol`.
///
/// # Errors
///
/// [`RecognizerError::UnsupportedProtocol`] for `grpc` and `grpcs`; this
/// crate only ships the HTTP transport.
pub fn connect(config: &SdkConfig) -> Result<Box<dyn SpeechRecognizer>, RecognizerError> {
    if !config.server.protocol.is_http() {
        log::error!(
            "recognizer: protocol `{}` has no client in this build",
            config.server.protocol
        );
        return Err(RecognizerError::UnsupportedProtocol(
            config.server.protocol.to_string(),
        ));
    }
    let recognizer = HttpSpeechRecognizer::from_config(&config.server, &config.audio)?;
    log::info!("recognizer: using {}", recognizer.base_url());
    Ok(Box::new(recognizer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Protocol;

    #[test]
    fn connect_builds_http_client() {
        let mut config = SdkConfig::default();
        config.server.protocol = Protocol::Https;
        let recognizer = connect(&config).unwrap();
        assert_eq!(recognizer.audio_limits().frame_rate, 16_000);
    }

    #[test]
    fn connect_rejects_grpc() {
        let mut config = SdkConfig::default();
        config.server.protocol = Protocol::Grpcs;
        assert!(matches!(
            connect(&config),
            Err(RecognizerError::UnsupportedProtocol(p)) if p == "grpcs"
        ));
    }
}
