//! Error types for pronunciation-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while loading engine data.
///
/// Grading and scheduling never fail; only data loading does.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid feature table JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid base64 feature data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("feature table is empty")]
    EmptyTable,

    #[error("phoneme {symbol} has {found} features, expected {expected}")]
    LengthMismatch {
        symbol: String,
        expected: usize,
        found: usize,
    },

    #[error("phoneme {symbol} has invalid feature value {value}")]
    InvalidFeatureValue { symbol: String, value: String },

    #[error("feature data has {found} values, expected {expected}")]
    FeatureCountMismatch { expected: usize, found: usize },

    #[error("unknown language tag: {0}")]
    UnknownLanguage(String),
}
