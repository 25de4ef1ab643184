//! Client SDK for the ASRT speech recognition server.
//!
//! * [`wave`]: RIFF/WAVE PCM codec and editing (concatenate, pad silence).
//! * [`api`]: request bodies and the typed response envelope.
//! * [`recognizer`]: the [`SpeechRecognizer`](recognizer::SpeechRecognizer)
//!   trait, its HTTP client and streaming sessions.
//! * [`config`]: TOML settings persisted under the platform config dir.

pub mod api;
pub mod config;
pub mod recognizer;
pub mod wave;
