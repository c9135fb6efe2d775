//! Outbound verification mail for verimail.
//!
//! This crate is the boundary between the token lifecycle and the
//! outside world:
//! - [`EmailTransport`] — the host-facing send contract, with
//!   [`SmtpMailer`] as the stock SMTP implementation (lettre)
//! - [`MessageTemplates`] — tera-backed rendering of the email body
//! - [`ActivationMailManager`] — "mark inactive, mint link, render,
//!   send" orchestration, including the rollback that deletes a user
//!   whose verification email could not be delivered, and the resend
//!   flow that re-identifies a user from an old link and issues a
//!   replacement under the retry ceiling

mod error;
mod manager;
mod template;
mod transport;

pub use error::{MailError, MailResult};
pub use manager::ActivationMailManager;
pub use template::{strip_tags, MessageTemplates};
pub use transport::{EmailTransport, OutgoingEmail, SmtpConfig, SmtpMailer};
