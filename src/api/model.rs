//! Request and response envelopes of the ASRT HTTP+JSON API.
//!
//! The `result` field of a response changes shape with the endpoint: a list
//! of pinyin syllables from the acoustic model, a transcript from the full
//! pipeline or the language model, or an in-progress fragment while
//! streaming.  [`RecognitionResult`] makes each of those an explicit case
//! instead of an untyped JSON value.

use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::wave::Wave;

// ---------------------------------------------------------------------------
// ApiStatus
// ---------------------------------------------------------------------------

/// Status codes returned in [`ApiResponse::status_code`].
///
/// | Code   | Variant              |
/// |--------|----------------------|
/// | 200000 | `Ok`                 |
/// | 206000 | `PartialOk`          |
/// | 400000 | `ClientError`        |
/// | 400001 | `ClientErrorFormat`  |
/// | 400002 | `ClientErrorConfig`  |
/// | 500000 | `ServerError`        |
/// | 500001 | `ServerErrorRunning` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    /// Final result.
    Ok,
    /// Partial (streaming) result; more will follow.
    PartialOk,
    ClientError,
    /// The request body was malformed.
    ClientErrorFormat,
    /// The request asked for an unsupported configuration.
    ClientErrorConfig,
    ServerError,
    /// The server failed while running recognition.
    ServerErrorRunning,
    Unknown(i64),
}

impl ApiStatus {
    pub const OK: i64 = 200_000;
    pub const PART_OK: i64 = 206_000;
    pub const CLIENT_ERROR: i64 = 400_000;
    pub const CLIENT_ERROR_FORMAT: i64 = 400_001;
    pub const CLIENT_ERROR_CONFIG: i64 = 400_002;
    pub const SERVER_ERROR: i64 = 500_000;
    pub const SERVER_ERROR_RUNNING: i64 = 500_001;

    pub fn from_code(code: i64) -> Self {
        match code {
            Self::OK => Self::Ok,
            Self::PART_OK => Self::PartialOk,
            Self::CLIENT_ERROR => Self::ClientError,
            Self::CLIENT_ERROR_FORMAT => Self::ClientErrorFormat,
            Self::CLIENT_ERROR_CONFIG => Self::ClientErrorConfig,
            Self::SERVER_ERROR => Self::ServerError,
            Self::SERVER_ERROR_RUNNING => Self::ServerErrorRunning,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Ok => Self::OK,
            Self::PartialOk => Self::PART_OK,
            Self::ClientError => Self::CLIENT_ERROR,
            Self::ClientErrorFormat => Self::CLIENT_ERROR_FORMAT,
            Self::ClientErrorConfig => Self::CLIENT_ERROR_CONFIG,
            Self::ServerError => Self::SERVER_ERROR,
            Self::ServerErrorRunning => Self::SERVER_ERROR_RUNNING,
            Self::Unknown(code) => *code,
        }
    }

    /// `true` for [`ApiStatus::Ok`] and [`ApiStatus::PartialOk`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok | Self::PartialOk)
    }
}

// ---------------------------------------------------------------------------
// RecognitionResult
// ---------------------------------------------------------------------------

/// The `result` payload of an [`ApiResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionResult {
    /// Acoustic-model output, e.g. `["ni3", "hao3"]`.
    Pinyin(Vec<String>),
    /// Final transcript (full pipeline or language model).
    Text(String),
    /// In-progress transcript fragment (status 206000).
    Partial(String),
    /// No payload (`null` or absent), typical of error responses.
    Empty,
}

impl RecognitionResult {
    /// Transcript text of a [`Text`](Self::Text) or [`Partial`](Self::Partial) result.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(t) | Self::Partial(t) => Some(t),
            _ => None,
        }
    }

    pub fn pinyin(&self) -> Option<&[String]> {
        match self {
            Self::Pinyin(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial(_))
    }
}

impl fmt::Display for RecognitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pinyin(p) => write!(f, "{}", p.join(" ")),
            Self::Text(t) => write!(f, "{t}"),
            Self::Partial(t) => write!(f, "{t}…"),
            Self::Empty => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// ApiResponse
// ---------------------------------------------------------------------------

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawApiResponse")]
pub struct ApiResponse {
    pub status_code: i64,
    pub status_message: String,
    pub result: RecognitionResult,
}

impl ApiResponse {
    pub fn new(status_code: i64, status_message: impl Into<String>, result: RecognitionResult) -> Self {
        Self {
            status_code,
            status_message: status_message.into(),
            result,
        }
    }

    pub fn status(&self) -> ApiStatus {
        ApiStatus::from_code(self.status_code)
    }
}

/// The envelope as it appears on the wire, before `result` is classified.
#[derive(Deserialize)]
struct RawApiResponse {
    status_code: i64,
    #[serde(default)]
    status_message: String,
    #[serde(default)]
    result: serde_json::Value,
}

impl TryFrom<RawApiResponse> for ApiResponse {
    type Error = String;

    fn try_from(raw: RawApiResponse) -> Result<Self, Self::Error> {
        use serde_json::Value;

        let result = match raw.result {
            Value::Null => RecognitionResult::Empty,
            Value::String(s) if raw.status_code == ApiStatus::PART_OK => {
                RecognitionResult::Partial(s)
            }
            Value::String(s) => RecognitionResult::Text(s),
            Value::Array(items) => RecognitionResult::Pinyin(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s),
                        other => Err(format!("pinyin entry is not a string: {other}")),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            other => return Err(format!("unexpected `result` payload: {other}")),
        };

        Ok(Self {
            status_code: raw.status_code,
            status_message: raw.status_message,
            result,
        })
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of the `/all` and `/speech` endpoints.
///
/// `samples` is the base64 (standard alphabet) encoding of interleaved
/// little-endian PCM, as produced by [`Wave::raw_samples`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub samples: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub byte_width: u16,
}

impl SpeechRequest {
    pub fn new(raw_samples: &[u8], sample_rate: u32, channels: u16, byte_width: u16) -> Self {
        Self {
            samples: general_purpose::STANDARD.encode(raw_samples),
            sample_rate,
            channels,
            byte_width,
        }
    }

    pub fn from_wave(wave: &Wave) -> Self {
        Self::new(
            &wave.raw_samples(),
            wave.frame_rate(),
            wave.channels(),
            wave.sample_width(),
        )
    }

    /// Decode the base64 payload back into raw PCM bytes.
    pub fn decode_samples(&self) -> Result<Vec<u8>, base64::DecodeError> {
        general_purpose::STANDARD.decode(&self.samples)
    }
}

/// Body of the `/language` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRequest {
    pub sequence_pinyin: Vec<String>,
}

impl LanguageRequest {
    pub fn new(sequence_pinyin: &[String]) -> Self {
        Self {
            sequence_pinyin: sequence_pinyin.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ApiResponse, serde_json::Error> {
        serde_json::from_str(json)
    }

    // ---- ApiStatus ---------------------------------------------------------

    #[test]
    fn status_codes_round_trip() {
        for code in [200_000, 206_000, 400_000, 400_001, 400_002, 500_000, 500_001, 123] {
            assert_eq!(ApiStatus::from_code(code).code(), code);
        }
        assert_eq!(ApiStatus::from_code(123), ApiStatus::Unknown(123));
        assert!(ApiStatus::PartialOk.is_success());
        assert!(!ApiStatus::ServerErrorRunning.is_success());
    }

    // ---- response classification ------------------------------------------

    #[test]
    fn text_result() {
        let r = parse(r#"{"status_code":200000,"status_message":"ok","result":"你好"}"#).unwrap();
        assert_eq!(r.status(), ApiStatus::Ok);
        assert_eq!(r.result, RecognitionResult::Text("你好".into()));
        assert_eq!(r.result.text(), Some("你好"));
    }

    #[test]
    fn pinyin_result() {
        let r = parse(r#"{"status_code":200000,"status_message":"","result":["ni3","hao3"]}"#)
            .unwrap();
        assert_eq!(
            r.result.pinyin(),
            Some(&["ni3".to_string(), "hao3".to_string()][..])
        );
        assert_eq!(r.result.to_string(), "ni3 hao3");
    }

    #[test]
    fn partial_result_from_status() {
        let r = parse(r#"{"status_code":206000,"status_message":"part","result":"你"}"#).unwrap();
        assert!(r.result.is_partial());
        assert_eq!(r.result.text(), Some("你"));
    }

    #[test]
    fn null_or_missing_result_is_empty() {
        let r = parse(r#"{"status_code":400001,"status_message":"bad","result":null}"#).unwrap();
        assert_eq!(r.result, RecognitionResult::Empty);
        assert_eq!(r.status(), ApiStatus::ClientErrorFormat);

        let r = parse(r#"{"status_code":500001}"#).unwrap();
        assert_eq!(r.result, RecognitionResult::Empty);
        assert!(r.status_message.is_empty());
    }

    #[test]
    fn unexpected_payload_is_rejected() {
        assert!(parse(r#"{"status_code":200000,"status_message":"","result":42}"#).is_err());
        assert!(parse(r#"{"status_code":200000,"status_message":"","result":["a",1]}"#).is_err());
    }

    // ---- requests ----------------------------------------------------------

    #[test]
    fn speech_request_json_shape() {
        let req = SpeechRequest::new(&[1, 2, 3], 16_000, 1, 2);
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["samples"], "AQID");
        assert_eq!(json["sample_rate"], 16_000);
        assert_eq!(json["channels"], 1);
        assert_eq!(json["byte_width"], 2);
        assert_eq!(req.decode_samples().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn speech_request_from_wave() {
        let wave = Wave::from_channels(8_000, 2, vec![vec![1, 2]]).unwrap();
        let req = SpeechRequest::from_wave(&wave);
        assert_eq!(req.sample_rate, 8_000);
        assert_eq!(req.channels, 1);
        assert_eq!(req.byte_width, 2);
        assert_eq!(req.decode_samples().unwrap(), wave.raw_samples());
    }

    #[test]
    fn language_request_json_shape() {
        let req = LanguageRequest::new(&["ni3".into(), "hao3".into()]);
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"sequence_pinyin":["ni3","hao3"]}"#
        );
    }
}
