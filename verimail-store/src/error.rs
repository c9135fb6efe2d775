//! Error types for the storage contracts.

use thiserror::Error;
use uuid::Uuid;

/// Storage-layer errors surfaced to the token lifecycle.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No user record with this id.
    #[error("user {0} not found in store")]
    UserMissing(Uuid),

    /// A user exists without its one-to-one link counter. Counters are
    /// created with the user, so this is an internal inconsistency.
    #[error("link counter missing for user {0}")]
    CounterMissing(Uuid),

    /// The host's storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
