//! Wire types exchanged with the ASRT recognition server.
//!
//! * [`SpeechRequest`] / [`LanguageRequest`]: request bodies.
//! * [`ApiResponse`]: response envelope: status code, message and a typed
//!   [`RecognitionResult`].
//! * [`ApiStatus`]: the server's six-digit status codes.

pub mod model;

pub use model::{ApiResponse, ApiStatus, LanguageRequest, RecognitionResult, SpeechRequest};
