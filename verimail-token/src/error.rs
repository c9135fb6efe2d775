//! The verification failure taxonomy.
//!
//! Every variant is recoverable by the caller; none is process-fatal. The
//! host's response layer is expected to map them deliberately: tampering
//! and plain invalidity get the same generic page (end users must not be
//! able to tell them apart) while logs keep the distinction.

use thiserror::Error;
use verimail_store::StoreError;

/// Reasons a verification attempt or resend request fails.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// A link segment was not decodable base64/UTF-8. The link is
    /// unusable; generic failure page.
    #[error("failed to decode email or token from the link")]
    DecodingFailed,

    /// No user matches the decoded email. 404-style response.
    #[error("user with email {0} not found")]
    UserNotFound(String),

    /// The base token matches no candidate user for this email. Generic
    /// failure page.
    #[error("token is invalid")]
    InvalidToken,

    /// Authentication code matched but the link is older than the
    /// configured maximum age. "Request a new link" page.
    #[error("verification link has expired")]
    Expired,

    /// Authentication code mismatch: the link was altered. Generic
    /// failure page outward, high-severity log inward.
    #[error("link signature was altered")]
    BadSignature,

    /// The replacement-link ceiling has been reached. "Contact admin"
    /// page.
    #[error("maximum link retries exceeded for email {0}")]
    MaxRetriesExceeded(String),

    /// The token verified but the account is already active. "Already
    /// verified" page; the account is never re-activated.
    #[error("user with email {0} is already active")]
    UserAlreadyActive(String),

    /// Malformed `max_age` value. Startup-time configuration error, never
    /// raised per-request.
    #[error("invalid time interval: {0}")]
    WrongTimeInterval(String),

    /// Other invalid configuration, caught at startup.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The host storage layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for verification operations.
pub type VerifyResult<T> = Result<T, VerifyError>;
