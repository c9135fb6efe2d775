//! Deployment configuration, loaded once at startup.
//!
//! The host materializes a [`VerifyConfig`] from whatever settings source
//! it uses (the struct derives `Deserialize`, so a TOML/JSON section or an
//! env-backed layer both work), then calls [`VerifyConfig::validate`]
//! before wiring it into the managers. Malformed values fail loudly at
//! startup; nothing here is re-read per request.

use serde::Deserialize;
use std::time::Duration;

use crate::error::{VerifyError, VerifyResult};
use verimail_signing::{DEFAULT_SEPARATOR, URL_SAFE_ALPHABET};

/// A token lifetime, parsed from `"15s"`, `"5m"`, `"1h"`, `"2d"`, or a
/// bare number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval(Duration);

impl TimeInterval {
    /// Wraps a duration given directly in seconds.
    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    /// Parses an interval string.
    ///
    /// # Errors
    ///
    /// [`VerifyError::WrongTimeInterval`] for unknown units and values
    /// that are zero, negative, or not a number.
    pub fn parse(raw: &str) -> VerifyResult<Self> {
        let raw = raw.trim();
        let (value_part, multiplier) = match raw.chars().last() {
            Some('s') => (&raw[..raw.len() - 1], 1),
            Some('m') => (&raw[..raw.len() - 1], 60),
            Some('h') => (&raw[..raw.len() - 1], 60 * 60),
            Some('d') => (&raw[..raw.len() - 1], 24 * 60 * 60),
            Some(c) if c.is_ascii_digit() => (raw, 1),
            _ => {
                return Err(VerifyError::WrongTimeInterval(format!(
                    "time unit must be one of s, m, h, d: {raw:?}"
                )))
            }
        };

        let value: i64 = value_part.parse().map_err(|_| {
            VerifyError::WrongTimeInterval(format!("not a number: {value_part:?}"))
        })?;
        if value <= 0 {
            return Err(VerifyError::WrongTimeInterval(
                "time must be greater than 0".to_string(),
            ));
        }

        Ok(Self(Duration::from_secs(value as u64 * multiplier)))
    }

    /// The interval as a [`Duration`].
    #[must_use]
    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl<'de> Deserialize<'de> for TimeInterval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(secs) if secs > 0 => Ok(Self::from_secs(secs as u64)),
            Raw::Seconds(_) => Err(serde::de::Error::custom("time must be greater than 0")),
            Raw::Text(text) => Self::parse(&text).map_err(serde::de::Error::custom),
        }
    }
}

/// Process-wide verification settings. Read-only after startup.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyConfig {
    /// Signing secret shared by the deployment, normally the host
    /// application's own secret key.
    pub key: String,
    /// Optional salt namespacing this use of the key from other signing
    /// uses in the host.
    #[serde(default)]
    pub salt: Option<String>,
    /// Character joining payload, timestamp, and authentication code.
    /// Must not be drawn from the URL-safe base64 alphabet.
    #[serde(default = "default_separator")]
    pub separator: char,
    /// Subject line of the verification email.
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Name of the email field in the host's registration form.
    #[serde(default = "default_email_field_name")]
    pub email_field_name: String,
    /// Template id for the verification email body.
    #[serde(default = "default_html_message_template")]
    pub html_message_template: String,
    /// From address for outbound verification mail.
    #[serde(default = "default_from_alias")]
    pub from_alias: String,
    /// Host login page the success flow points users at.
    #[serde(default = "default_login_page")]
    pub login_page: String,
    /// Template rendered on successful activation.
    #[serde(default = "default_success_template")]
    pub verification_success_template: String,
    /// Message shown on successful activation.
    #[serde(default = "default_success_msg")]
    pub verification_success_msg: String,
    /// Template rendered on a generic verification failure.
    #[serde(default = "default_failed_template")]
    pub verification_failed_template: String,
    /// Message shown on a generic verification failure.
    #[serde(default = "default_failed_msg")]
    pub verification_failed_msg: String,
    /// Template rendered when the link has expired.
    #[serde(default = "default_link_expired_template")]
    pub link_expired_template: String,
    /// Template for the "request a new verification email" form page.
    #[serde(default = "default_request_new_email_template")]
    pub request_new_email_template: String,
    /// Template confirming that a new verification email went out.
    #[serde(default = "default_new_email_sent_template")]
    pub new_email_sent_template: String,
    /// Maximum token age. Absent means links never expire.
    #[serde(default)]
    pub max_age: Option<TimeInterval>,
    /// Maximum replacement links beyond the original. Absent means
    /// unlimited.
    #[serde(default = "default_max_retries")]
    pub max_retries: Option<u32>,
    /// Debug mode: failure responses may carry internal error text.
    /// Production deployments leave this off.
    #[serde(default)]
    pub debug: bool,
}

impl VerifyConfig {
    /// Creates a config with the given signing key and every other field
    /// at its default.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            salt: None,
            separator: default_separator(),
            subject: default_subject(),
            email_field_name: default_email_field_name(),
            html_message_template: default_html_message_template(),
            from_alias: default_from_alias(),
            login_page: default_login_page(),
            verification_success_template: default_success_template(),
            verification_success_msg: default_success_msg(),
            verification_failed_template: default_failed_template(),
            verification_failed_msg: default_failed_msg(),
            link_expired_template: default_link_expired_template(),
            request_new_email_template: default_request_new_email_template(),
            new_email_sent_template: default_new_email_sent_template(),
            max_age: None,
            max_retries: default_max_retries(),
            debug: false,
        }
    }

    /// Sets `max_age` from an interval string, failing eagerly on a
    /// malformed value.
    pub fn with_max_age(mut self, raw: &str) -> VerifyResult<Self> {
        self.max_age = Some(TimeInterval::parse(raw)?);
        Ok(self)
    }

    /// Sets the replacement-link ceiling.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Validates startup invariants: a non-empty key and a separator that
    /// cannot collide with token characters.
    ///
    /// # Errors
    ///
    /// [`VerifyError::Config`] on violation. `max_age` needs no check
    /// here; it is already typed by the time a config exists.
    pub fn validate(&self) -> VerifyResult<()> {
        if self.key.is_empty() {
            return Err(VerifyError::Config("signing key must not be empty".into()));
        }
        if URL_SAFE_ALPHABET.contains(self.separator) {
            return Err(VerifyError::Config(format!(
                "separator {:?} is in the URL-safe base64 alphabet and would make signed tokens ambiguous",
                self.separator
            )));
        }
        Ok(())
    }
}

fn default_separator() -> char {
    DEFAULT_SEPARATOR
}

fn default_subject() -> String {
    "Email Verification Mail".to_string()
}

fn default_email_field_name() -> String {
    "email".to_string()
}

fn default_html_message_template() -> String {
    "email_verification_msg.html".to_string()
}

fn default_from_alias() -> String {
    "noreply <noreply@example.com>".to_string()
}

fn default_login_page() -> String {
    "accounts_login".to_string()
}

fn default_success_template() -> String {
    "email_verification_successful.html".to_string()
}

fn default_success_msg() -> String {
    "Your Email is verified successfully and account has been activated. \
     You can login with the credentials now..."
        .to_string()
}

fn default_failed_template() -> String {
    "email_verification_failed.html".to_string()
}

fn default_failed_msg() -> String {
    "There is something wrong with this link, can't verify the user...".to_string()
}

fn default_link_expired_template() -> String {
    "link_expired.html".to_string()
}

fn default_request_new_email_template() -> String {
    "request_new_email.html".to_string()
}

fn default_new_email_sent_template() -> String {
    "new_email_sent.html".to_string()
}

fn default_max_retries() -> Option<u32> {
    Some(2)
}
