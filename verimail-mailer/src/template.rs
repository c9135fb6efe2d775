//! Tera-backed rendering of verification email bodies.

use tera::Tera;
use tracing::debug;

use crate::error::MailResult;

/// Built-in body registered under the default template id, for hosts
/// that have not supplied their own.
const DEFAULT_MESSAGE_TEMPLATE: (&str, &str) = (
    "email_verification_msg.html",
    r#"<div>
  <p>Hello{% if inactive_user %} {{ inactive_user }}{% endif %},</p>
  <p>Please click the link below to verify your email address and activate your account:</p>
  <p><a href="{{ link }}">{{ link }}</a></p>
  <p>If you did not sign up, you can ignore this email.</p>
</div>"#,
);

/// Email template registry.
///
/// Templates render with a context that always carries `link` and, for
/// the initial send, `inactive_user`.
pub struct MessageTemplates {
    tera: Tera,
}

impl MessageTemplates {
    /// Registry with only the built-in default message template.
    pub fn with_defaults() -> MailResult<Self> {
        let mut tera = Tera::default();
        let (name, body) = DEFAULT_MESSAGE_TEMPLATE;
        tera.add_raw_template(name, body)?;
        Ok(Self { tera })
    }

    /// Loads every template matching a glob (e.g.
    /// `"templates/**/*.html"`), replacing the built-ins.
    pub fn from_glob(pattern: &str) -> MailResult<Self> {
        let tera = Tera::new(pattern)?;
        debug!(pattern = %pattern, "email templates loaded");
        Ok(Self { tera })
    }

    /// Registers or replaces a template under a host-chosen id.
    pub fn add_template(&mut self, name: &str, body: &str) -> MailResult<()> {
        self.tera.add_raw_template(name, body)?;
        Ok(())
    }

    /// Renders a registered template.
    pub fn render(&self, name: &str, context: &tera::Context) -> MailResult<String> {
        Ok(self.tera.render(name, context)?)
    }
}

/// Strips HTML tags to derive the plaintext fallback body.
///
/// Deliberately simple: drops `<...>` runs and collapses nothing else.
/// Good enough for the bodies this crate renders; not a sanitizer.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_renders_link() {
        let templates = MessageTemplates::with_defaults().unwrap();
        let mut context = tera::Context::new();
        context.insert("link", "/verification/user/verify-email/a/b/");
        let html = templates
            .render("email_verification_msg.html", &context)
            .unwrap();
        assert!(html.contains("/verification/user/verify-email/a/b/"));
    }

    #[test]
    fn strip_tags_removes_markup() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("no markup"), "no markup");
        assert_eq!(strip_tags("<a href=\"x\">link</a>"), "link");
    }
}
