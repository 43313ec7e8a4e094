//! Invitation email delivery.
//!
//! Emailing is optional: without Resend credentials the magic link is only
//! returned in the invite response. Delivery failures are logged by the
//! caller and never fail the invitation itself.

use access::Role;
use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;

use crate::config::MailerConfig;

const INVITATION_TEMPLATE: &str = include_str!("../../templates/invitation.html");

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

/// Everything an invitation email needs to say.
#[derive(Debug, Clone)]
pub struct InvitationEmail {
    pub to: String,
    pub name: String,
    pub role: Role,
    pub magic_link: String,
    /// Human-readable expiry, already formatted.
    pub expires_at: String,
}

/// Transport for invitation emails. Enables fakes in tests.
#[async_trait::async_trait]
pub trait InvitationMailer: Send + Sync {
    /// Deliver one invitation.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Delivery`] if the provider rejects the message.
    async fn send_invitation(&self, email: &InvitationEmail) -> Result<(), MailerError>;
}

/// Resend-backed mailer.
pub struct ResendMailer {
    client: Resend,
    from: String,
}

impl ResendMailer {
    #[must_use]
    pub fn new(config: &MailerConfig) -> Self {
        Self { client: Resend::new(&config.api_key), from: config.from.clone() }
    }
}

#[async_trait::async_trait]
impl InvitationMailer for ResendMailer {
    async fn send_invitation(&self, email: &InvitationEmail) -> Result<(), MailerError> {
        let to = [email.to.as_str()];
        let subject = "You're invited to the project dashboard";
        let html = render_invitation_template(email);

        let message = CreateEmailBaseOptions::new(&self.from, to, subject).with_html(&html);
        self.client
            .emails
            .send(message)
            .await
            .map_err(|e| MailerError::Delivery(e.to_string()))?;
        Ok(())
    }
}

/// Fill the template's `{{KEY}}` placeholders in one pass. Values are
/// HTML-escaped and never rescanned, so user-supplied text cannot add
/// markup or expand another placeholder.
#[must_use]
pub fn render_invitation_template(email: &InvitationEmail) -> String {
    let mut out = String::with_capacity(INVITATION_TEMPLATE.len() + email.magic_link.len());
    let mut rest = INVITATION_TEMPLATE;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let value = match &after[..close] {
            "NAME" => Some(email.name.as_str()),
            "ROLE" => Some(email.role.as_str()),
            "LINK" => Some(email.magic_link.as_str()),
            "EXPIRES" => Some(email.expires_at.as_str()),
            _ => None,
        };
        match value {
            Some(value) => push_escaped(&mut out, value),
            None => out.push_str(&rest[open..open + 4 + close]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

fn push_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
#[path = "mailer_test.rs"]
mod tests;
