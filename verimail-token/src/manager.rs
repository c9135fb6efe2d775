//! Token minting, link building, and link verification.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::VerifyConfig;
use crate::error::{VerifyError, VerifyResult};
use crate::ledger::RetryLedger;
use verimail_signing::{transcode, SignError, SignedTokenCodec, TokenHasher};
use verimail_store::{CounterStore, UserRecord, UserStore};

/// Fixed path prefix of every verification link. Hosts mount their
/// verification route here and prepend scheme and host themselves.
pub const VERIFY_PATH_PREFIX: &str = "/verification/user/verify-email";

/// Path prefix of unauthenticated resend requests. The GET form carries
/// the encoded segments of the expired link; hosts may also mount a POST
/// form at the bare prefix.
pub const REQUEST_NEW_LINK_PATH_PREFIX: &str = "/verification/user/verify-email/request-new-link";

/// Orchestrates the full token cycle: mint a token for a user, embed it
/// in a link, verify a clicked link back into a user, and mint
/// replacement links under the retry ceiling.
///
/// Holds the signing codec, the user-bound hasher, and the retry ledger
/// by composition; immutable after construction and safe to share.
pub struct TokenManager {
    config: VerifyConfig,
    codec: SignedTokenCodec,
    hasher: TokenHasher,
    users: Arc<dyn UserStore>,
    ledger: RetryLedger,
}

impl TokenManager {
    /// Builds a manager over the host's storage, validating the config
    /// eagerly.
    pub fn new(
        config: VerifyConfig,
        users: Arc<dyn UserStore>,
        counters: Arc<dyn CounterStore>,
    ) -> VerifyResult<Self> {
        config.validate()?;
        let codec =
            SignedTokenCodec::new(config.key.as_bytes(), config.salt.as_deref(), config.separator);
        let hasher = TokenHasher::new(config.key.as_bytes(), config.salt.as_deref());
        let ledger = RetryLedger::new(counters, config.max_retries);
        Ok(Self {
            config,
            codec,
            hasher,
            users,
            ledger,
        })
    }

    /// The validated configuration this manager was built with.
    #[must_use]
    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// The retry ledger; exposed for the mail boundary.
    #[must_use]
    pub fn ledger(&self) -> &RetryLedger {
        &self.ledger
    }

    pub(crate) fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// Mints the URL-safe token for a user: the user-bound base token,
    /// wrapped in a timestamped signature when `max_age` is configured,
    /// then transcoded for link embedding.
    #[must_use]
    pub fn generate_token_for_user(&self, user: &UserRecord) -> String {
        let mut token = self.base_token(user);
        if self.config.max_age.is_some() {
            token = self.codec.sign(&token);
        }
        transcode::encode(&token)
    }

    /// Like [`generate_token_for_user`](Self::generate_token_for_user)
    /// but with an explicit signing timestamp, for deterministic expiry
    /// tests. Without a configured `max_age` the timestamp is moot and
    /// the plain token is returned.
    #[must_use]
    pub fn generate_token_for_user_at(&self, user: &UserRecord, issued_at: i64) -> String {
        let mut token = self.base_token(user);
        if self.config.max_age.is_some() {
            token = self.codec.sign_at(&token, issued_at);
        }
        transcode::encode(&token)
    }

    /// Builds the relative verification link for a minted token.
    #[must_use]
    pub fn generate_link(&self, token: &str, email: &str) -> String {
        let encoded_email = transcode::encode(email);
        format!("{VERIFY_PATH_PREFIX}/{encoded_email}/{token}/")
    }

    /// Builds the relative resend link the "link expired" page offers,
    /// carrying the original encoded segments unchanged.
    #[must_use]
    pub fn generate_request_new_link(&self, encoded_email: &str, encoded_token: &str) -> String {
        format!("{REQUEST_NEW_LINK_PATH_PREFIX}/{encoded_email}/{encoded_token}/")
    }

    /// The verification entrypoint: decodes both link segments, verifies
    /// signature and age, and resolves the still-inactive user the token
    /// is bound to.
    ///
    /// # Errors
    ///
    /// The full taxonomy of [`VerifyError`]: `DecodingFailed`,
    /// `UserNotFound`, `InvalidToken`, `UserAlreadyActive`, `Expired`,
    /// `BadSignature`, and `MaxRetriesExceeded` (which takes priority
    /// over plain `Expired` once the resend ceiling is reached).
    pub fn decrypt_token_and_get_user(
        &self,
        encoded_email: &str,
        encoded_token: &str,
    ) -> VerifyResult<UserRecord> {
        let decoded_email = transcode::decode(encoded_email).map_err(|err| {
            error!(%err, "verification link email segment failed to decode");
            VerifyError::DecodingFailed
        })?;
        let decoded_token = transcode::decode(encoded_token).map_err(|err| {
            error!(%err, "verification link token segment failed to decode");
            VerifyError::DecodingFailed
        })?;

        let Some(max_age) = self.config.max_age else {
            // No expiry configured: the decoded token is the base token.
            return self.inactive_user_for_token(&decoded_email, &decoded_token);
        };

        match self.codec.unsign(&decoded_token, Some(max_age.as_duration())) {
            Ok(base_token) => self.inactive_user_for_token(&decoded_email, &base_token),
            Err(SignError::Expired { payload, age_secs }) => {
                warn!(email = %decoded_email, age_secs, "verification link expired");
                // The payload is authenticated, so it is safe to use it to
                // identify whose resend budget applies.
                let user = self.inactive_user_for_token(&decoded_email, &payload)?;
                if !self.ledger.can_issue_replacement(&user)? {
                    warn!(email = %decoded_email, "replacement-link ceiling reached");
                    return Err(VerifyError::MaxRetriesExceeded(decoded_email));
                }
                Err(VerifyError::Expired)
            }
            Err(SignError::BadSignature) => {
                // A tampered token is never trusted for anything, not even
                // to identify the user.
                error!(email = %decoded_email, "verification link signature altered");
                Err(VerifyError::BadSignature)
            }
        }
    }

    /// Resolves the still-inactive user bound to an already-decoded
    /// token, ignoring any timestamp. Used by the resend flow, which must
    /// accept expired (but untampered) tokens.
    pub fn get_user_by_token(&self, plain_email: &str, token: &str) -> VerifyResult<UserRecord> {
        // For a signed token the base token sits before the first
        // separator; a bare base token passes through unchanged.
        let base_token = token
            .split(self.config.separator)
            .next()
            .unwrap_or(token);
        self.inactive_user_for_token(plain_email, base_token)
    }

    /// Issues a replacement link under the retry ceiling.
    ///
    /// The ledger is charged only after the link has been built, never on
    /// a failed issuance.
    pub fn request_new_link(
        &self,
        user: &UserRecord,
        token: &str,
        email: &str,
    ) -> VerifyResult<String> {
        if !self.ledger.can_issue_replacement(user)? {
            warn!(email = %email, "refusing replacement link, ceiling reached");
            return Err(VerifyError::MaxRetriesExceeded(email.to_string()));
        }
        let link = self.generate_link(token, email);
        self.ledger.record_issued(user)?;
        info!(user_id = %user.id, "replacement verification link issued");
        Ok(link)
    }

    /// Derives the base token binding a link to this user.
    fn base_token(&self, user: &UserRecord) -> String {
        self.hasher
            .make_token(&[&user.id.to_string(), &user.email])
    }

    /// Steps 3–5 of verification: find candidates by email, check each
    /// against the base token in order, and gate on the active flag.
    fn inactive_user_for_token(
        &self,
        email: &str,
        base_token: &str,
    ) -> VerifyResult<UserRecord> {
        let candidates = self.users.find_by_email(email)?;
        if candidates.is_empty() {
            debug!(email = %email, "no user for decoded email");
            return Err(VerifyError::UserNotFound(email.to_string()));
        }
        for user in candidates {
            let matches = self
                .hasher
                .check_token(&[&user.id.to_string(), &user.email], base_token);
            if matches {
                if user.is_active {
                    return Err(VerifyError::UserAlreadyActive(email.to_string()));
                }
                return Ok(user);
            }
        }
        Err(VerifyError::InvalidToken)
    }
}
