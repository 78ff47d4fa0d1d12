//! Email delivery of meeting notes over SMTP.
//!
//! Delivery is best-effort: a transport failure is reported to the caller
//! but never touches the JSON/HTML artifacts already saved to disk.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::EmailConfig;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid email address '{0}'")]
    InvalidAddress(String),
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("SMTP transport error: {0}")]
    Transport(String),
    #[error("failed to deliver notes to {failed} of {total} recipients")]
    Partial { failed: usize, total: usize },
}

/// Seam for sending finished notes to participants.
#[async_trait]
pub trait NotesDelivery: Send + Sync {
    async fn deliver(
        &self,
        subject: &str,
        html: &str,
        recipients: &[String],
    ) -> Result<(), DeliveryError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer from config. Returns `None` when SMTP credentials are
    /// not configured; delivery is an optional feature, not an error.
    pub fn from_config(config: &EmailConfig) -> Result<Option<Self>, DeliveryError> {
        let Some(username) = config.resolved_username() else {
            return Ok(None);
        };
        let password = config.resolved_password().unwrap_or_default();
        let server = config.resolved_smtp_server();

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&server)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .port(config.resolved_port())
            .credentials(Credentials::new(username.clone(), password))
            .build();

        let sender: Mailbox = format!("{} <{}>", config.sender_name, username)
            .parse()
            .map_err(|_| DeliveryError::InvalidAddress(username))?;

        info!("Initialized SMTP mailer via {}", server);

        Ok(Some(Self { transport, sender }))
    }
}

#[async_trait]
impl NotesDelivery for SmtpMailer {
    /// Send the HTML notes to each recipient in turn. One bad address or
    /// refused delivery does not stop the rest; failures are totted up and
    /// reported at the end.
    async fn deliver(
        &self,
        subject: &str,
        html: &str,
        recipients: &[String],
    ) -> Result<(), DeliveryError> {
        let mut failed = 0;

        for recipient in recipients {
            let mailbox: Mailbox = match recipient.parse() {
                Ok(mailbox) => mailbox,
                Err(e) => {
                    warn!("Skipping invalid recipient '{}': {}", recipient, e);
                    failed += 1;
                    continue;
                }
            };

            let message = Message::builder()
                .from(self.sender.clone())
                .to(mailbox)
                .subject(subject)
                .header(ContentType::TEXT_HTML)
                .body(html.to_string())
                .map_err(|e| DeliveryError::Message(e.to_string()))?;

            match self.transport.send(message).await {
                Ok(_) => info!("Notes sent to {}", recipient),
                Err(e) => {
                    warn!("Failed to send notes to {}: {}", recipient, e);
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(DeliveryError::Partial {
                failed,
                total: recipients.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailer_absent_without_credentials() {
        std::env::remove_var("EMAIL_USERNAME");
        let mailer = SmtpMailer::from_config(&EmailConfig::default()).unwrap();
        assert!(mailer.is_none());
    }

    #[tokio::test]
    async fn test_mailer_built_from_config_credentials() {
        let config = EmailConfig {
            username: Some("notes@example.com".to_string()),
            password: Some("secret".to_string()),
            ..EmailConfig::default()
        };
        let mailer = SmtpMailer::from_config(&config).unwrap();
        assert!(mailer.is_some());
    }

    #[tokio::test]
    async fn test_sender_mailbox_uses_sender_name() {
        let config = EmailConfig {
            username: Some("notes@example.com".to_string()),
            password: Some("secret".to_string()),
            sender_name: "Team Notes".to_string(),
            ..EmailConfig::default()
        };
        let mailer = SmtpMailer::from_config(&config).unwrap().unwrap();
        assert_eq!(mailer.sender.name.as_deref(), Some("Team Notes"));
        assert_eq!(mailer.sender.email.to_string(), "notes@example.com");
    }
}
