//! Storage contracts between verimail and its host application.
//!
//! verimail never owns user persistence: the host brings its own database
//! and implements the two traits below on top of it. The crate also ships
//! [`MemoryStore`], a mutex-guarded in-memory implementation of both
//! traits used by the test suites and as a reference for host authors.
//!
//! # Concurrency contract
//!
//! The verification flow is invoked concurrently by the host's request
//! layer, possibly from multiple processes. Two methods therefore carry
//! atomicity requirements that implementations must honor at the storage
//! layer (update-if-unchanged or row-level locking, not in-process locks):
//!
//! - [`UserStore::activate`] flips `is_active` only if it was false, and
//!   reports whether the flip happened — two racing verification attempts
//!   must not both observe success.
//! - [`CounterStore::increment_sent_count`] is an atomic read-modify-write
//!   so concurrent resend requests cannot lose an increment.

mod error;
mod memory;
mod record;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use record::{LinkCounter, UserRecord, INITIAL_SENT_COUNT};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Lookup and mutation of user records, implemented by the host.
///
/// verimail only reads `email`/`is_active` and writes `is_active` and
/// `last_login`; it never creates user records. [`UserStore::remove`]
/// exists solely for the mail boundary's rollback path (a user whose
/// verification email could not be delivered can never activate).
pub trait UserStore: Send + Sync {
    /// Returns every user whose email matches, in stable storage order.
    /// Duplicate emails are tolerated; callers check each candidate.
    fn find_by_email(&self, email: &str) -> StoreResult<Vec<UserRecord>>;

    /// Marks a user inactive ahead of sending the verification email.
    fn set_inactive(&self, id: Uuid) -> StoreResult<()>;

    /// Atomically activates an inactive user and stamps `last_login`.
    ///
    /// Returns `true` if this call performed the flip, `false` if the user
    /// was already active (a concurrent attempt won the race).
    fn activate(&self, id: Uuid, now: DateTime<Utc>) -> StoreResult<bool>;

    /// Deletes a user record and its link counter. Rollback path only.
    fn remove(&self, id: Uuid) -> StoreResult<()>;
}

/// Persistence for per-user link counters, implemented by the host.
///
/// A counter is created alongside its user with
/// [`INITIAL_SENT_COUNT`] (the original verification email counts as the
/// first send) and cascade-deleted with it.
pub trait CounterStore: Send + Sync {
    /// Current sent count for the user. A user without a counter is an
    /// internal inconsistency ([`StoreError::CounterMissing`]), never a
    /// silent zero.
    fn sent_count(&self, id: Uuid) -> StoreResult<u32>;

    /// Atomically increments the sent count by one and returns the new
    /// value.
    fn increment_sent_count(&self, id: Uuid) -> StoreResult<u32>;
}
