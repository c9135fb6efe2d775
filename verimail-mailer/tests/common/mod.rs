//! Shared fixtures for mail boundary tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use verimail_mailer::{
    ActivationMailManager, EmailTransport, MailError, MailResult, MessageTemplates, OutgoingEmail,
};
use verimail_store::{MemoryStore, UserRecord};
use verimail_token::{TokenManager, VerifyConfig};

pub const TEST_KEY: &str = "a-deployment-secret-for-tests";

/// Transport that records every message it is asked to deliver and can
/// be switched into a failing mode.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
    failing: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl EmailTransport for RecordingTransport {
    fn send(&self, email: &OutgoingEmail) -> MailResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Transport("relay refused connection".into()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub manager: Arc<TokenManager>,
    pub transport: Arc<RecordingTransport>,
    pub mail: ActivationMailManager,
}

/// Builds the full boundary over an in-memory store and recording
/// transport.
pub fn fixture(config: VerifyConfig) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let manager = Arc::new(
        TokenManager::new(config, store.clone(), store.clone()).expect("config is valid"),
    );
    let transport = Arc::new(RecordingTransport::new());
    let mail = ActivationMailManager::new(
        manager.clone(),
        store.clone(),
        transport.clone(),
        MessageTemplates::with_defaults().expect("built-in template is valid"),
    );
    Fixture {
        store,
        manager,
        transport,
        mail,
    }
}

pub fn base_config() -> VerifyConfig {
    VerifyConfig::new(TEST_KEY)
}

pub fn add_inactive_user(store: &MemoryStore, email: &str) -> UserRecord {
    let user = UserRecord::new_inactive(email);
    store.insert_user(user.clone());
    user
}
