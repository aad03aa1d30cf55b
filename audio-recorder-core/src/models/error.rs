use thiserror::Error;

use super::ack::StatusCode;

/// Errors that can end or prevent a recording session.
///
/// Every variant is terminal for the session that produced it; nothing in
/// the recorder retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("audio input not available")]
    DeviceNotAvailable,

    #[error("audio input access denied")]
    PermissionDenied,

    #[error("audio input failed: {0}")]
    DeviceFailure(String),

    #[error("output stream failed with status {code}: {message}")]
    StreamError { code: StatusCode, message: String },

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),
}
