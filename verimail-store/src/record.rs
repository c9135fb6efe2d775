//! User and link-counter records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Initial value of a link counter: the original verification email is
/// the first send.
pub const INITIAL_SENT_COUNT: u32 = 1;

/// The slice of a host user record that verimail reads and writes.
///
/// Hosts map their own user model into this shape when implementing
/// [`UserStore`](crate::UserStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable user id.
    pub id: Uuid,
    /// Email address the verification link is bound to. Uniqueness is not
    /// assumed; lookups may return several candidates.
    pub email: String,
    /// Whether the account has been activated.
    pub is_active: bool,
    /// Stamped on successful activation.
    pub last_login: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Creates a fresh inactive record with a random id.
    #[must_use]
    pub fn new_inactive(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            is_active: false,
            last_login: None,
        }
    }
}

/// Count of verification emails sent to one user.
///
/// Created with the user at [`INITIAL_SENT_COUNT`], incremented by exactly
/// one per issued replacement link, never decremented, deleted with the
/// user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCounter {
    /// The user this counter belongs to (one-to-one).
    pub requester: Uuid,
    /// Total verification emails sent, original included.
    pub sent_count: u32,
}

impl LinkCounter {
    /// Creates the counter that accompanies a fresh user record.
    #[must_use]
    pub fn for_user(requester: Uuid) -> Self {
        Self {
            requester,
            sent_count: INITIAL_SENT_COUNT,
        }
    }
}
