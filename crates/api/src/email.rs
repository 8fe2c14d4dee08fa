//! Outgoing email via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport to send the welcome
//! email after signup. When SMTP is not configured the mailer is a no-op, so
//! local development works without a mail server. Sending happens on a spawned
//! task and never blocks or fails the signup request.

use crate::config::SmtpConfig;

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
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

/// Sends transactional emails via SMTP. No-op when unconfigured.
pub struct Mailer {
    config: Option<SmtpConfig>,
}

impl Mailer {
    /// Create a mailer. Pass `None` to disable outgoing email.
    pub fn new(config: Option<SmtpConfig>) -> Self {
        if config.is_none() {
            tracing::warn!("SMTP_HOST not set, outgoing email disabled");
        }
        Self { config }
    }

    /// Send the post-signup welcome email.
    ///
    /// Returns `Ok(())` without sending when SMTP is not configured.
    pub async fn send_welcome(&self, to_email: &str, name: Option<&str>) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let Some(config) = &self.config else {
            return Ok(());
        };

        let greeting = match name {
            Some(name) => format!("Hi {name},"),
            None => "Hi,".to_string(),
        };
        let body = format!(
            "{greeting}\n\n\
             Welcome to Drawstory! Your account is ready.\n\n\
             Create a project, upload your scenes, and start building your storyboard.\n\n\
             The Drawstory team"
        );

        let email = Message::builder()
            .from(config.from.parse()?)
            .to(to_email.parse()?)
            .subject("Welcome to Drawstory")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        transport.send(email).await?;

        tracing::info!(to = to_email, "Welcome email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_mailer_is_noop() {
        let mailer = Mailer::new(None);
        let result = mailer.send_welcome("user@example.com", Some("User")).await;
        assert!(result.is_ok());
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
