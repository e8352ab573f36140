//! Error types for the native messaging host.
//!
//! The taxonomy follows the protocol contract: protocol-level errors
//! are fatal to the session (the stream contract is broken and
//! recovery is impossible), while everything a route handler can
//! produce is contained by the router and surfaced to the caller as
//! an empty result.

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors raised by the native messaging host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Frame-level errors: truncated length prefix or payload, invalid
    /// UTF-8 or JSON on the stream, oversized messages. Fatal to the
    /// session.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Request parameter validation errors. Contained by the router.
    #[error("validation error in field '{field}': {message}")]
    Validation {
        /// Field name that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Subprocess failures from the picker or a utility. Contained by
    /// the router.
    #[error("subprocess error: {0}")]
    Picker(#[from] rofi_picker::PickerError),

    /// The window activation call failed. Contained by the router.
    #[error("activation error: {0}")]
    Activation(#[source] anyhow::Error),

    /// JSON serialization of an outgoing response failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HostError {
    /// Create a protocol error.
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Self::Protocol(message.into())
    }

    /// Create a validation error.
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
