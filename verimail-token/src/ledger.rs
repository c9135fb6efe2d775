//! The replacement-link ceiling.

use std::sync::Arc;
use tracing::debug;

use crate::error::VerifyResult;
use verimail_store::{CounterStore, UserRecord};

/// Per-user bookkeeping of how many verification emails have gone out,
/// and whether another replacement may be issued.
///
/// The counter starts at 1 when the user is created (the original send),
/// so with a ceiling of `max_retries` the counter may grow to
/// `max_retries + 1` and no further.
pub struct RetryLedger {
    counters: Arc<dyn CounterStore>,
    max_retries: Option<u32>,
}

impl RetryLedger {
    /// Creates a ledger over the host's counter storage.
    pub fn new(counters: Arc<dyn CounterStore>, max_retries: Option<u32>) -> Self {
        Self {
            counters,
            max_retries,
        }
    }

    /// Number of verification emails sent to this user so far, original
    /// included.
    pub fn sent_count(&self, user: &UserRecord) -> VerifyResult<u32> {
        Ok(self.counters.sent_count(user.id)?)
    }

    /// Whether the user may still be issued a replacement link. Always
    /// true when no ceiling is configured.
    pub fn can_issue_replacement(&self, user: &UserRecord) -> VerifyResult<bool> {
        let Some(max_retries) = self.max_retries else {
            return Ok(true);
        };
        let sent = self.sent_count(user)?;
        Ok(sent < max_retries + 1)
    }

    /// Records one successfully issued replacement link. Callers invoke
    /// this exactly once per link, after the link has been built.
    pub fn record_issued(&self, user: &UserRecord) -> VerifyResult<u32> {
        let count = self.counters.increment_sent_count(user.id)?;
        debug!(user_id = %user.id, sent_count = count, "replacement link recorded");
        Ok(count)
    }
}
