//! SDK settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// Transport used to reach the recognition server.
///
/// | Variant | Interface          |
/// |---------|--------------------|
/// | Http    | HTTP + JSON        |
/// | Https   | HTTP + JSON on TLS |
/// | Grpc    | gRPC + protobuf    |
/// | Grpcs   | gRPC on TLS        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
    Grpc,
    Grpcs,
}

impl Protocol {
    /// `true` for the HTTP+JSON variants.
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http | Self::Https)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::Grpc => "grpc",
            Self::Grpcs => "grpcs",
        }
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Self::Http
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    /// Case-insensitive: `"HTTP"`, `"Https"` and `"grpc"` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            "grpc" => Ok(Self::Grpc),
            "grpcs" => Ok(Self::Grpcs),
            other => Err(format!("unknown protocol `{other}`")),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Where the ASRT server lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host name or IP address.
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    /// Path prefix in front of the endpoint names, e.g. `"/asr"`.  Empty by
    /// default.
    pub sub_path: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 20001,
            protocol: Protocol::default(),
            sub_path: String::new(),
            timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// `{protocol}://{host}:{port}{sub_path}` without a trailing slash.
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.protocol,
            self.host,
            self.port,
            self.sub_path.trim_end_matches('/')
        )
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Limits the server puts on audio sent for recognition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Largest raw sample payload accepted in one request, in bytes
    /// (16 s of 16 kHz mono 16-bit audio by default).
    pub max_sample_bytes: usize,
    /// Length of each segment when long audio is split, in seconds.
    pub segment_secs: u32,
    /// Sample rate required for long-audio and file recognition.
    pub frame_rate: u32,
    /// Channel count required for long-audio and file recognition.
    pub channels: u16,
    /// Sample width (bytes) required for long-audio and file recognition.
    pub byte_width: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            max_sample_bytes: 16_000 * 2 * 16,
            segment_secs: 10,
            frame_rate: 16_000,
            channels: 1,
            byte_width: 2,
        }
    }
}

impl AudioConfig {
    /// Bytes of raw samples in one long-audio segment (never zero).
    pub fn segment_bytes(&self) -> usize {
        let bytes = self.segment_secs as usize
            * self.frame_rate as usize
            * self.channels as usize
            * self.byte_width as usize;
        bytes.max(1)
    }
}

// ---------------------------------------------------------------------------
// StreamConfig
// ---------------------------------------------------------------------------

/// Settings for streaming recognition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Capacity of the bounded wave queue and of the result queue.
    pub queue_capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { queue_capacity: 5 }
    }
}

// ---------------------------------------------------------------------------
// SdkConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level SDK configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use asrt_sdk::config::SdkConfig;
///
/// // Load (returns Default when file is missing)
/// let config = SdkConfig::load().unwrap();
/// println!("{}", config.server.base_url());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    pub server: ServerConfig,
    pub audio: AudioConfig,
    pub stream: StreamConfig,
}

impl SdkConfig {
    /// `<platform config dir>/asrt-sdk/settings.toml`, e.g.
    /// `~/.config/asrt-sdk/settings.toml` on Linux.  Relative to the current
    /// directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("asrt-sdk")
            .join("settings.toml")
    }

    /// Load configuration from [`default_path`](Self::default_path).
    ///
    /// Returns `Ok(SdkConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to [`default_path`](Self::default_path),
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_path_is_settings_toml_under_sdk_dir() {
        let path = SdkConfig::default_path();
        assert!(path.ends_with("asrt-sdk/settings.toml"));
    }

    #[test]
    fn default_values() {
        let cfg = SdkConfig::default();

        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 20001);
        assert_eq!(cfg.server.protocol, Protocol::Http);
        assert!(cfg.server.sub_path.is_empty());
        assert_eq!(cfg.server.timeout_secs, 30);
        assert_eq!(cfg.audio.max_sample_bytes, 512_000);
        assert_eq!(cfg.audio.segment_bytes(), 320_000);
        assert_eq!(cfg.stream.queue_capacity, 5);
    }

    #[test]
    fn base_url_formatting() {
        let mut server = ServerConfig::default();
        assert_eq!(server.base_url(), "http://127.0.0.1:20001");

        server.protocol = Protocol::Https;
        server.host = "asr.example.com".into();
        server.port = 443;
        server.sub_path = "/v1/".into();
        assert_eq!(server.base_url(), "https://asr.example.com:443/v1");
    }

    #[test]
    fn protocol_parsing_is_case_insensitive() {
        assert_eq!("HTTP".parse::<Protocol>(), Ok(Protocol::Http));
        assert_eq!("GrpcS".parse::<Protocol>(), Ok(Protocol::Grpcs));
        assert!("ftp".parse::<Protocol>().is_err());
        assert!(Protocol::Https.is_http());
        assert!(!Protocol::Grpc.is_http());
    }

    #[test]
    fn segment_bytes_never_zero() {
        let audio = AudioConfig {
            segment_secs: 0,
            ..AudioConfig::default()
        };
        assert_eq!(audio.segment_bytes(), 1);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = SdkConfig::load_from(&path).expect("should not error");
        assert_eq!(config.server.port, 20001);
        assert_eq!(config.audio.frame_rate, 16_000);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.toml");

        let mut cfg = SdkConfig::default();
        cfg.server.host = "10.0.0.5".into();
        cfg.server.port = 20002;
        cfg.server.protocol = Protocol::Grpc;
        cfg.server.sub_path = "/asrt".into();
        cfg.audio.segment_secs = 5;
        cfg.stream.queue_capacity = 16;

        cfg.save_to(&path).expect("save");
        let loaded = SdkConfig::load_from(&path).expect("load");

        assert_eq!(loaded.server.host, "10.0.0.5");
        assert_eq!(loaded.server.port, 20002);
        assert_eq!(loaded.server.protocol, Protocol::Grpc);
        assert_eq!(loaded.server.sub_path, "/asrt");
        assert_eq!(loaded.audio.segment_secs, 5);
        assert_eq!(loaded.stream.queue_capacity, 16);
    }

    #[test]
    fn protocol_is_lowercase_in_toml() {
        let text = toml::to_string_pretty(&SdkConfig::default()).unwrap();
        assert!(text.contains("protocol = \"http\""));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[server]\nhost = \"asr.local\"\n").unwrap();

        let loaded = SdkConfig::load_from(&path).expect("load");
        assert_eq!(loaded.server.host, "asr.local");
        assert_eq!(loaded.server.port, 20001);
        assert_eq!(loaded.audio.max_sample_bytes, 512_000);
        assert_eq!(loaded.stream.queue_capacity, 5);
    }
}
