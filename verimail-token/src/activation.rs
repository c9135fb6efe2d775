//! The one-way inactive → active transition.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::error::{VerifyError, VerifyResult};
use crate::manager::TokenManager;
use verimail_store::{UserRecord, UserStore};

/// Flips a user from inactive to active exactly once, given a
/// verification attempt.
///
/// Verification itself is delegated to [`TokenManager`]; this component
/// adds only the state transition and introduces no new error kinds.
/// ACTIVE is terminal: the store-level compare-and-set guarantees that of
/// two racing attempts with the same credentials, exactly one succeeds
/// and the other surfaces [`VerifyError::UserAlreadyActive`].
pub struct ActivationProcess {
    manager: Arc<TokenManager>,
}

impl ActivationProcess {
    /// Creates the process over a shared token manager.
    pub fn new(manager: Arc<TokenManager>) -> Self {
        Self { manager }
    }

    /// The token manager this process verifies through.
    #[must_use]
    pub fn manager(&self) -> &TokenManager {
        &self.manager
    }

    /// Verifies the link segments and activates the matched user,
    /// stamping `last_login`.
    ///
    /// # Errors
    ///
    /// Everything [`TokenManager::decrypt_token_and_get_user`] raises,
    /// propagated unchanged, plus [`VerifyError::UserAlreadyActive`] when
    /// a concurrent attempt performed the flip first.
    pub fn activate_user(
        &self,
        encoded_email: &str,
        encoded_token: &str,
    ) -> VerifyResult<UserRecord> {
        let user = self
            .manager
            .decrypt_token_and_get_user(encoded_email, encoded_token)?;

        let now = Utc::now();
        let flipped = self.manager.users().activate(user.id, now)?;
        if !flipped {
            return Err(VerifyError::UserAlreadyActive(user.email));
        }

        info!(user_id = %user.id, email = %user.email, "user activated");
        Ok(UserRecord {
            is_active: true,
            last_login: Some(now),
            ..user
        })
    }
}
