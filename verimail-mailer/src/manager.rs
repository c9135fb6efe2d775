//! "Mark inactive, mint link, render, send" orchestration.

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{MailError, MailResult};
use crate::template::{strip_tags, MessageTemplates};
use crate::transport::{EmailTransport, OutgoingEmail};
use verimail_signing::transcode;
use verimail_store::{UserRecord, UserStore};
use verimail_token::{TokenManager, VerifyError};

/// Sends the initial verification email for a freshly registered user
/// and handles resend requests from expired links.
///
/// The manager never creates user records; the host registers the user
/// first and passes the record in. It does delete one, in exactly one
/// case: when the verification email cannot be delivered, the inactive
/// record is rolled back, because an unreachable mailbox means the
/// account could never activate.
pub struct ActivationMailManager {
    manager: Arc<TokenManager>,
    users: Arc<dyn UserStore>,
    transport: Arc<dyn EmailTransport>,
    templates: MessageTemplates,
}

impl ActivationMailManager {
    /// Wires the boundary together.
    pub fn new(
        manager: Arc<TokenManager>,
        users: Arc<dyn UserStore>,
        transport: Arc<dyn EmailTransport>,
        templates: MessageTemplates,
    ) -> Self {
        Self {
            manager,
            users,
            transport,
            templates,
        }
    }

    /// Marks the user inactive, mints a verification link, and emails
    /// it. Returns the (now inactive) record on success.
    ///
    /// # Errors
    ///
    /// Render and transport failures roll the user record back via
    /// [`UserStore::remove`] before propagating.
    pub fn send_verification_link(&self, user: &UserRecord) -> MailResult<UserRecord> {
        self.users.set_inactive(user.id)?;
        let inactive = UserRecord {
            is_active: false,
            ..user.clone()
        };

        let token = self.manager.generate_token_for_user(&inactive);
        let link = self.manager.generate_link(&token, &inactive.email);

        match self.render_and_send(&link, &inactive.email, Some(&inactive)) {
            Ok(()) => {
                info!(user_id = %inactive.id, "verification link sent");
                Ok(inactive)
            }
            Err(err) => {
                warn!(
                    user_id = %inactive.id,
                    %err,
                    "verification email failed, rolling back user record"
                );
                self.users.remove(inactive.id)?;
                Err(err)
            }
        }
    }

    /// Issues a replacement link from the encoded segments of a previous
    /// (possibly expired, never tampered) link and emails it. Returns
    /// the new relative link.
    ///
    /// # Errors
    ///
    /// Propagates the verification taxonomy unchanged — notably
    /// `UserAlreadyActive` from the lookup and `MaxRetriesExceeded` from
    /// the ledger. The ledger is only charged once the new link exists,
    /// and the email goes out only after that.
    pub fn resend_verification_link(
        &self,
        encoded_email: &str,
        encoded_token: &str,
    ) -> MailResult<String> {
        if encoded_email.is_empty() || encoded_token.is_empty() {
            return Err(MailError::InvalidTokenOrEmail(format!(
                "email: {encoded_email:?}, token: {encoded_token:?}"
            )));
        }

        let email = transcode::decode(encoded_email)
            .map_err(|_| MailError::Verify(VerifyError::DecodingFailed))?;
        let token = transcode::decode(encoded_token)
            .map_err(|_| MailError::Verify(VerifyError::DecodingFailed))?;

        let user = self.manager.get_user_by_token(&email, &token)?;
        let fresh_token = self.manager.generate_token_for_user(&user);
        let link = self.manager.request_new_link(&user, &fresh_token, &email)?;

        self.render_and_send(&link, &email, None)?;
        info!(user_id = %user.id, "replacement verification link sent");
        Ok(link)
    }

    fn render_and_send(
        &self,
        link: &str,
        email: &str,
        inactive_user: Option<&UserRecord>,
    ) -> MailResult<()> {
        let config = self.manager.config();

        let mut context = tera::Context::new();
        context.insert("link", link);
        if let Some(user) = inactive_user {
            context.insert("inactive_user", &user.email);
        }
        let html = self
            .templates
            .render(&config.html_message_template, &context)?;

        self.transport.send(&OutgoingEmail {
            to: email.to_string(),
            from: config.from_alias.clone(),
            subject: config.subject.clone(),
            text_body: strip_tags(&html),
            html_body: Some(html),
        })
    }
}
