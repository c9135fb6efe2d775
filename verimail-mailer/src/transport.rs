//! The outbound email contract and its SMTP implementation.

use lettre::message::{header, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{MailError, MailResult};

/// One fully composed verification email.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    /// Recipient address.
    pub to: String,
    /// From address (the configured `from_alias`).
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// Plaintext body (tag-stripped fallback).
    pub text_body: String,
    /// Rendered HTML body, when the template produced one.
    pub html_body: Option<String>,
}

/// Host-facing send contract. Implementations deliver one message
/// synchronously and report failure as [`MailError::Transport`].
pub trait EmailTransport: Send + Sync {
    /// Delivers the message or fails; partial delivery is a failure.
    fn send(&self, email: &OutgoingEmail) -> MailResult<()>;
}

/// SMTP connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host.
    pub host: String,
    /// Relay port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Relay login.
    pub username: String,
    /// Relay password.
    pub password: String,
    /// Use STARTTLS (plain connection otherwise; local relays only).
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    /// Connection timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    587
}

fn default_use_tls() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

/// Stock [`EmailTransport`] over lettre's blocking SMTP client.
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Creates a mailer; the connection is established per send.
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn build_transport(&self) -> MailResult<SmtpTransport> {
        let credentials = Credentials::new(
            self.config.username.clone(),
            self.config.password.clone(),
        );

        let transport = if self.config.use_tls {
            SmtpTransport::starttls_relay(&self.config.host)
        } else {
            SmtpTransport::relay(&self.config.host)
        }
        .map_err(|e| MailError::Transport(format!("failed to create SMTP transport: {e}")))?
        .port(self.config.port)
        .credentials(credentials)
        .timeout(Some(Duration::from_secs(self.config.timeout_secs)))
        .build();

        Ok(transport)
    }

    fn build_message(&self, email: &OutgoingEmail) -> MailResult<Message> {
        let from = email
            .from
            .parse()
            .map_err(|e| MailError::Transport(format!("invalid from address: {e}")))?;
        let to = email
            .to
            .parse()
            .map_err(|e| MailError::Transport(format!("invalid to address: {e}")))?;

        let builder = Message::builder().from(from).to(to).subject(&email.subject);

        let body = if let Some(html) = &email.html_body {
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_PLAIN)
                        .body(email.text_body.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_HTML)
                        .body(html.clone()),
                )
        } else {
            MultiPart::alternative().singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_PLAIN)
                    .body(email.text_body.clone()),
            )
        };

        builder
            .multipart(body)
            .map_err(|e| MailError::Transport(format!("failed to build message: {e}")))
    }
}

impl EmailTransport for SmtpMailer {
    fn send(&self, email: &OutgoingEmail) -> MailResult<()> {
        debug!(to = %email.to, subject = %email.subject, "sending verification email");

        let message = self.build_message(email)?;
        self.build_transport()?
            .send(&message)
            .map_err(|e| MailError::Transport(format!("failed to send email: {e}")))?;

        info!(to = %email.to, "verification email sent");
        Ok(())
    }
}
