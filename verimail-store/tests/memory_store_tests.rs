use chrono::Utc;
use pretty_assertions::assert_eq;
use uuid::Uuid;
use verimail_store::{
    CounterStore, MemoryStore, StoreError, UserRecord, UserStore, INITIAL_SENT_COUNT,
};

fn store_with_user(email: &str) -> (MemoryStore, UserRecord) {
    let store = MemoryStore::new();
    let user = UserRecord::new_inactive(email);
    store.insert_user(user.clone());
    (store, user)
}

// ── Counter lifecycle ────────────────────────────────────────────

#[test]
fn counter_starts_at_one() {
    let (store, user) = store_with_user("alice@example.com");
    assert_eq!(store.sent_count(user.id).unwrap(), INITIAL_SENT_COUNT);
}

#[test]
fn increment_returns_new_value() {
    let (store, user) = store_with_user("alice@example.com");
    assert_eq!(store.increment_sent_count(user.id).unwrap(), 2);
    assert_eq!(store.increment_sent_count(user.id).unwrap(), 3);
    assert_eq!(store.sent_count(user.id).unwrap(), 3);
}

#[test]
fn missing_counter_is_an_error_not_zero() {
    let (store, user) = store_with_user("alice@example.com");
    store.drop_counter(user.id);
    assert!(matches!(
        store.sent_count(user.id),
        Err(StoreError::CounterMissing(id)) if id == user.id
    ));
}

#[test]
fn counter_for_unknown_user_is_missing() {
    let store = MemoryStore::new();
    assert!(matches!(
        store.sent_count(Uuid::new_v4()),
        Err(StoreError::CounterMissing(_))
    ));
}

// ── Lookup ───────────────────────────────────────────────────────

#[test]
fn find_by_email_returns_candidates_in_insertion_order() {
    let store = MemoryStore::new();
    let first = UserRecord::new_inactive("shared@example.com");
    let second = UserRecord::new_inactive("shared@example.com");
    store.insert_user(first.clone());
    store.insert_user(UserRecord::new_inactive("other@example.com"));
    store.insert_user(second.clone());

    let found = store.find_by_email("shared@example.com").unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, first.id);
    assert_eq!(found[1].id, second.id);
}

#[test]
fn find_by_email_unknown_is_empty() {
    let store = MemoryStore::new();
    assert!(store.find_by_email("nobody@example.com").unwrap().is_empty());
}

// ── Activation compare-and-set ───────────────────────────────────

#[test]
fn activate_flips_exactly_once() {
    let (store, user) = store_with_user("alice@example.com");
    let now = Utc::now();

    assert!(store.activate(user.id, now).unwrap());
    let activated = store.get(user.id).unwrap();
    assert!(activated.is_active);
    assert_eq!(activated.last_login, Some(now));

    // Second attempt loses the race and must not re-stamp last_login.
    let later = Utc::now();
    assert!(!store.activate(user.id, later).unwrap());
    assert_eq!(store.get(user.id).unwrap().last_login, Some(now));
}

#[test]
fn activate_unknown_user_errors() {
    let store = MemoryStore::new();
    assert!(matches!(
        store.activate(Uuid::new_v4(), Utc::now()),
        Err(StoreError::UserMissing(_))
    ));
}

#[test]
fn set_inactive_clears_active_flag() {
    let store = MemoryStore::new();
    let mut user = UserRecord::new_inactive("alice@example.com");
    user.is_active = true;
    store.insert_user(user.clone());

    store.set_inactive(user.id).unwrap();
    assert!(!store.get(user.id).unwrap().is_active);
}

// ── Removal ──────────────────────────────────────────────────────

#[test]
fn remove_deletes_user_and_counter() {
    let (store, user) = store_with_user("alice@example.com");
    store.remove(user.id).unwrap();

    assert!(matches!(
        store.get(user.id),
        Err(StoreError::UserMissing(_))
    ));
    assert!(matches!(
        store.counter(user.id),
        Err(StoreError::CounterMissing(_))
    ));
    assert!(store.find_by_email("alice@example.com").unwrap().is_empty());
}
