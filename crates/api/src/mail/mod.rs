//! Outbound email.
//!
//! Handlers depend on the [`Mailer`] trait; `main` picks [`smtp::SmtpMailer`]
//! when `SMTP_HOST` is set and [`LogMailer`] otherwise.

pub mod smtp;

use async_trait::async_trait;

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// A plain-text message ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Build the sign-up confirmation email carrying `code`.
pub fn verification_email(to: &str, name: &str, code: &str, expires_in_secs: i64) -> OutgoingEmail {
    let minutes = (expires_in_secs / 60).max(1);
    OutgoingEmail {
        to: to.to_string(),
        subject: "Confirm your email".to_string(),
        body: format!(
            "Hi {name},\n\nYour confirmation code is {code}.\n\
             It expires in {minutes} minutes.\n\n\
             If you did not sign up, you can ignore this email."
        ),
    }
}

/// Mailer that only writes to the log. Used when SMTP is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            body = %email.body,
            "SMTP not configured, email logged instead of sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_email_contains_code_and_expiry() {
        let email = verification_email("ada@example.com", "Ada", "042917", 600);
        assert_eq!(email.to, "ada@example.com");
        assert!(email.body.contains("042917"));
        assert!(email.body.contains("10 minutes"));
        assert!(email.body.starts_with("Hi Ada"));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let email = verification_email("ada@example.com", "Ada", "000001", 30);
        assert!(LogMailer.send(email).await.is_ok());
    }

    #[test]
    fn mail_error_display_build() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
