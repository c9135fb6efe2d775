//! Shared fixtures for token lifecycle tests.

#![allow(dead_code)]

use std::sync::Arc;

use verimail_signing::transcode;
use verimail_store::{MemoryStore, UserRecord};
use verimail_token::{TokenManager, VerifyConfig};

pub const TEST_KEY: &str = "a-deployment-secret-for-tests";

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub manager: Arc<TokenManager>,
}

/// Builds a manager over a fresh in-memory store.
pub fn fixture(config: VerifyConfig) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let manager =
        TokenManager::new(config, store.clone(), store.clone()).expect("config is valid");
    Fixture {
        store,
        manager: Arc::new(manager),
    }
}

/// Default config: no expiry, max_retries = 2.
pub fn base_config() -> VerifyConfig {
    VerifyConfig::new(TEST_KEY)
}

/// Config with a 2-second token lifetime.
pub fn expiring_config() -> VerifyConfig {
    base_config().with_max_age("2s").expect("valid interval")
}

/// Inserts a fresh inactive user and returns its record.
pub fn add_inactive_user(store: &MemoryStore, email: &str) -> UserRecord {
    let user = UserRecord::new_inactive(email);
    store.insert_user(user.clone());
    user
}

/// URL-safe-encodes an email the way links carry it.
pub fn encode_email(email: &str) -> String {
    transcode::encode(email)
}

/// Splits a verification link into its (encoded email, token) segments.
pub fn link_segments(link: &str) -> (String, String) {
    let trimmed = link
        .strip_prefix("/verification/user/verify-email/")
        .expect("link carries the fixed prefix")
        .trim_end_matches('/');
    let (email, token) = trimmed.split_once('/').expect("two segments");
    (email.to_string(), token.to_string())
}

/// Decodes, mutates one character of, and re-encodes a minted token.
pub fn tamper_with_token(encoded_token: &str) -> String {
    let decoded = transcode::decode(encoded_token).expect("token decodes");
    let mut chars: Vec<char> = decoded.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    let altered: String = chars.into_iter().collect();
    transcode::encode(&altered)
}
