//! Error types for the signal pipeline.
//!
//! Every failure is produced as a value by the component that detects it.
//! Nothing in this taxonomy is fatal to the polling loop.

use thiserror::Error;

/// Top-level pipeline error.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Instrument error: {0}")]
    Instrument(#[from] InstrumentError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Invalid instrument identifiers or mode combinations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstrumentError {
    #[error("Empty instrument identifier")]
    Empty,

    #[error("Invalid forex pair '{0}': expected six letters such as USDJPY")]
    InvalidForexPair(String),

    #[error("Invalid crypto symbol '{0}'")]
    InvalidCryptoSymbol(String),

    #[error("Trade mode {mode} is not available for {symbol}")]
    UnsupportedMode { symbol: String, mode: String },

    #[error("Unknown trade mode: {0}")]
    UnknownMode(String),
}

/// Market data fetch failures.
///
/// Carries a human-readable cause for logging; a fetch failure never
/// yields a partially populated series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("Unexpected response shape: {0}")]
    Schema(String),

    #[error("Provider did not return a {0} rate")]
    MissingRate(String),

    #[error("Provider returned no data")]
    Empty,

    #[error("{mode} data is not available for {symbol}")]
    UnsupportedMode { symbol: String, mode: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FetchError {
    /// Build a status error, keeping at most a short prefix of the body.
    pub fn status(status: u16, body: &str) -> Self {
        FetchError::Status {
            status,
            body: truncate(body, 200),
        }
    }
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Inference service failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response envelope: {0}")]
    Envelope(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl InferenceError {
    /// Build a status error, keeping at most a short prefix of the body.
    pub fn status(status: u16, body: &str) -> Self {
        InferenceError::Status {
            status,
            body: truncate(body, 200),
        }
    }
}

/// The inference service answered, but not with a usable recommendation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed signal: {reason}")]
pub struct MalformedSignal {
    pub reason: String,
}

impl MalformedSignal {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
