//! Error types for the eSMS client.

use thiserror::Error;

/// Result type for eSMS client operations.
pub type Result<T> = std::result::Result<T, EsmsError>;

/// eSMS client errors.
///
/// A non-2xx status from the gateway is not an error: it is returned to the
/// caller as part of [`crate::OtpDispatch`].
#[derive(Debug, Error)]
pub enum EsmsError {
    /// Request never produced a response (connection refused, DNS, timeout).
    /// The underlying error is kept as the source.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response body was not valid JSON
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration error (missing credential, invalid setting)
    #[error("configuration error: {0}")]
    Config(String),

    /// Value is not a 6-digit OTP code
    #[error("invalid OTP code: {0:?}")]
    InvalidOtpCode(String),
}

impl EsmsError {
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(err))
    }
}
