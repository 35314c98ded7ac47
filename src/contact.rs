//! Contact form relay: validation, mail composition, and the delivery seam.
//!
//! The browser posts `{name, email, message}`; the server validates it,
//! composes one HTML mail and hands it to a [`MailTransport`]. A single
//! attempt is made per submission; there is no retry.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::ContactError;
use crate::util::html_escape;

/// Default sender for relayed mail.
pub const DEFAULT_FROM: &str = "onboarding@resend.dev";

/// One form submission as posted by the browser. Absent keys deserialize
/// to empty strings so they fail validation rather than parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Every field must be present and non-blank.
    pub fn validate(&self) -> Result<(), ContactError> {
        for (field, value) in [("name", &self.name), ("email", &self.email), ("message", &self.message)] {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// A composed mail ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

/// Build the notification mail for a validated submission.
pub fn compose(submission: &ContactSubmission, from: &str, to: &str) -> OutgoingMail {
    let name = html_escape(&submission.name);
    let email = html_escape(&submission.email);
    let message = html_escape(&submission.message).replace('\n', "<br>");
    let html = format!(
        "<h2>New Contact Form Submission</h2>\n\
         <p><strong>Name:</strong> {name}</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{message}</p>\n"
    );
    OutgoingMail {
        from: from.to_string(),
        to: vec![to.to_string()],
        reply_to: submission.email.clone(),
        subject: format!("New Contact Form Submission from {}", submission.name),
        html,
    }
}

/// Delivery seam between the HTTP handler and a mail provider.
pub trait MailTransport {
    fn send(&self, mail: OutgoingMail) -> impl Future<Output = Result<(), ContactError>> + Send;
}

/// Dry-run transport: logs the mail and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

impl MailTransport for LogTransport {
    fn send(&self, mail: OutgoingMail) -> impl Future<Output = Result<(), ContactError>> + Send {
        async move {
            log::info!(
                "dry-run mail: to={:?} reply_to={} subject={:?} ({} bytes html)",
                mail.to,
                mail.reply_to,
                mail.subject,
                mail.html.len()
            );
            Ok(())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use resend::ResendTransport;

#[cfg(not(target_arch = "wasm32"))]
mod resend {
    use std::future::Future;
    use std::time::Duration;

    use serde::Serialize;

    use super::{MailTransport, OutgoingMail};
    use crate::error::ContactError;

    const ENDPOINT: &str = "https://api.resend.com/emails";

    /// Delivers through the Resend HTTP API.
    #[derive(Debug, Clone)]
    pub struct ResendTransport {
        client: reqwest::Client,
        api_key: String,
        endpoint: String,
    }

    #[derive(Serialize)]
    struct SendRequest<'a> {
        from: &'a str,
        to: &'a [String],
        reply_to: &'a str,
        subject: &'a str,
        html: &'a str,
    }

    impl ResendTransport {
        pub fn new(api_key: impl Into<String>) -> Result<Self, ContactError> {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .map_err(|e| ContactError::Delivery(format!("http client: {e}")))?;
            Ok(Self {
                client,
                api_key: api_key.into(),
                endpoint: ENDPOINT.to_string(),
            })
        }

        /// Point at a different API base (staging, local stub).
        pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
            self.endpoint = endpoint.into();
            self
        }
    }

    impl MailTransport for ResendTransport {
        fn send(&self, mail: OutgoingMail) -> impl Future<Output = Result<(), ContactError>> + Send {
            let request = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&SendRequest {
                    from: &mail.from,
                    to: &mail.to,
                    reply_to: &mail.reply_to,
                    subject: &mail.subject,
                    html: &mail.html,
                });
            async move {
                let resp = request
                    .send()
                    .await
                    .map_err(|e| ContactError::Delivery(e.to_string()))?;
                let status = resp.status();
                if status.is_success() {
                    log::info!("mail relayed for {}", mail.reply_to);
                    return Ok(());
                }
                let body = resp.text().await.unwrap_or_default();
                log::error!("mail provider returned {status}: {body}");
                Err(ContactError::Delivery(format!("{status}: {body}")))
            }
        }
    }
}

/// Validate, compose, and deliver one submission.
pub async fn relay<T: MailTransport>(
    transport: &T,
    submission: &ContactSubmission,
    from: &str,
    to: &str,
) -> Result<(), ContactError> {
    submission.validate()?;
    transport.send(compose(submission, from, to)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_missing() {
        assert_eq!(
            ContactSubmission::new("", "a@b.c", "hi").validate(),
            Err(ContactError::MissingField("name"))
        );
        assert_eq!(
            ContactSubmission::new("Ann", "  ", "hi").validate(),
            Err(ContactError::MissingField("email"))
        );
        assert_eq!(
            ContactSubmission::new("Ann", "a@b.c", "\n").validate(),
            Err(ContactError::MissingField("message"))
        );
        assert!(ContactSubmission::new("Ann", "a@b.c", "hi").validate().is_ok());
    }

    #[test]
    fn absent_keys_deserialize_empty() {
        let s: ContactSubmission = serde_json::from_str(r#"{"name":"Ann"}"#).unwrap();
        assert_eq!(s.email, "");
        assert!(s.validate().is_err());
    }

    #[test]
    fn compose_escapes_and_breaks_lines() {
        let s = ContactSubmission::new("Ann <script>", "ann@example.com", "line one\nline & two");
        let mail = compose(&s, DEFAULT_FROM, "studio@example.com");
        assert_eq!(mail.subject, "New Contact Form Submission from Ann <script>");
        assert_eq!(mail.reply_to, "ann@example.com");
        assert_eq!(mail.to, vec!["studio@example.com".to_string()]);
        assert!(mail.html.contains("Ann &lt;script&gt;"));
        assert!(mail.html.contains("line one<br>line &amp; two"));
        assert!(!mail.html.contains("<script>"));
    }
}
