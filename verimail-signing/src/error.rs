//! Error types for the signing module.

use thiserror::Error;

/// Errors from URL-safe transcoding of link segments.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// Input is not valid URL-safe base64.
    #[error("invalid url-safe base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Decoded bytes are not valid UTF-8.
    #[error("decoded payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Errors from verifying a signed token.
#[derive(Debug, Error)]
pub enum SignError {
    /// The authentication code does not match the payload. Either the token
    /// was altered in transit or it was produced with a different key/salt.
    /// Nothing in the token may be trusted, including the payload.
    #[error("token signature does not match")]
    BadSignature,

    /// The authentication code matched but the token is older than the
    /// allowed age. The payload is authentic, so it is carried here for
    /// callers that need to identify the account behind a stale link.
    #[error("token expired ({age_secs}s old)")]
    Expired {
        /// The authenticated (signature-checked) payload.
        payload: String,
        /// Seconds elapsed since the token was signed.
        age_secs: i64,
    },
}

/// Result type for transcoding operations.
pub type TranscodeResult<T> = Result<T, TranscodeError>;

/// Result type for signing operations.
pub type SignResult<T> = Result<T, SignError>;
