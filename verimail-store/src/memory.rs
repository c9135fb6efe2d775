//! In-memory reference implementation of the storage contracts.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::record::{LinkCounter, UserRecord};
use crate::{CounterStore, UserStore};

#[derive(Default)]
struct Inner {
    // Vec keeps find_by_email results in insertion order.
    users: Vec<UserRecord>,
    counters: HashMap<Uuid, LinkCounter>,
}

/// Mutex-guarded in-memory store implementing both contracts.
///
/// The single mutex makes every operation atomic, which satisfies the
/// concurrency requirements of [`UserStore::activate`] and
/// [`CounterStore::increment_sent_count`] for a one-process host. Used by
/// the test suites; production hosts back the traits with their database.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user and its link counter, mirroring a host's
    /// create-time hook.
    pub fn insert_user(&self, user: UserRecord) {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.counters.insert(user.id, LinkCounter::for_user(user.id));
        inner.users.push(user);
    }

    /// Fetches a user snapshot by id.
    pub fn get(&self, id: Uuid) -> StoreResult<UserRecord> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        inner
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::UserMissing(id))
    }

    /// Fetches the link counter for a user.
    pub fn counter(&self, id: Uuid) -> StoreResult<LinkCounter> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        inner
            .counters
            .get(&id)
            .copied()
            .ok_or(StoreError::CounterMissing(id))
    }

    /// Drops the counter row while keeping the user. Test-only hook for
    /// exercising the missing-counter inconsistency path.
    pub fn drop_counter(&self, id: Uuid) {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.counters.remove(&id);
    }
}

impl UserStore for MemoryStore {
    fn find_by_email(&self, email: &str) -> StoreResult<Vec<UserRecord>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .users
            .iter()
            .filter(|u| u.email == email)
            .cloned()
            .collect())
    }

    fn set_inactive(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::UserMissing(id))?;
        user.is_active = false;
        Ok(())
    }

    fn activate(&self, id: Uuid, now: DateTime<Utc>) -> StoreResult<bool> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::UserMissing(id))?;
        if user.is_active {
            return Ok(false);
        }
        user.is_active = true;
        user.last_login = Some(now);
        Ok(true)
    }

    fn remove(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let position = inner
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::UserMissing(id))?;
        inner.users.remove(position);
        // Counter is cascade-deleted with its user.
        inner.counters.remove(&id);
        Ok(())
    }
}

impl CounterStore for MemoryStore {
    fn sent_count(&self, id: Uuid) -> StoreResult<u32> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        inner
            .counters
            .get(&id)
            .map(|c| c.sent_count)
            .ok_or(StoreError::CounterMissing(id))
    }

    fn increment_sent_count(&self, id: Uuid) -> StoreResult<u32> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let counter = inner
            .counters
            .get_mut(&id)
            .ok_or(StoreError::CounterMissing(id))?;
        counter.sent_count += 1;
        Ok(counter.sent_count)
    }
}
