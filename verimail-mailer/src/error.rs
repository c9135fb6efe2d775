//! Error types for the mail boundary.

use thiserror::Error;
use verimail_store::StoreError;
use verimail_token::VerifyError;

/// Failures while composing or delivering verification mail.
#[derive(Debug, Error)]
pub enum MailError {
    /// The email body template failed to load or render.
    #[error("failed to render email template: {0}")]
    Template(#[from] tera::Error),

    /// The transport refused the message (bad header, connection
    /// failure, refused recipient).
    #[error("failed to send email: {0}")]
    Transport(String),

    /// A resend request arrived without a usable email or token.
    #[error("either token or email is invalid: {0}")]
    InvalidTokenOrEmail(String),

    /// A token lifecycle failure, propagated unchanged.
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// A storage failure outside the token lifecycle (rollback path).
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for mail operations.
pub type MailResult<T> = Result<T, MailError>;
