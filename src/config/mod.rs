//! SDK configuration.
//!
//! Provides `SdkConfig` (top-level settings), sub-configs for the server
//! connection, audio limits and streaming, and TOML persistence under the
//! platform config directory via `SdkConfig::load` / `SdkConfig::save`.

pub mod settings;

pub use settings::{AudioConfig, Protocol, SdkConfig, ServerConfig, StreamConfig};
