//! Notifications
//!
//! Fire-and-forget alerts sent when the agent records a visitor's details or
//! a question it could not answer. Every notification is logged; email
//! delivery is attempted only when credentials are configured, and delivery
//! failures are logged and swallowed.

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::error::{PersonaError, Result};

/// What happened to a notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No delivery channel configured; logged only
    Skipped,
    Failed(String),
}

/// Sink for one-line notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Log and attempt delivery. Never fails; the outcome is informational.
    async fn notify(&self, message: &str, reason: &str) -> Delivery;
}

/// SMTP settings for the email notifier
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Sender address, also the login user
    pub sender: Option<String>,
    pub password: Option<String>,
    /// Defaults to the sender
    pub recipient: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".into(),
            port: 587,
            sender: None,
            password: None,
            recipient: None,
        }
    }
}

impl SmtpConfig {
    /// Read `CLONE_EMAIL`, `CLONE_PASSWORD`, `CLONE_NOTIFY_TO`,
    /// `CLONE_SMTP_HOST` and `CLONE_SMTP_PORT`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            host: value("CLONE_SMTP_HOST").unwrap_or(defaults.host),
            port: value("CLONE_SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            sender: value("CLONE_EMAIL"),
            password: value("CLONE_PASSWORD"),
            recipient: value("CLONE_NOTIFY_TO"),
        }
    }

    /// Sender and password, when both are present
    fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.sender.as_deref()?, self.password.as_deref()?))
    }
}

/// Logs every notification and emails it when configured
pub struct EmailNotifier {
    config: SmtpConfig,
}

impl EmailNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(SmtpConfig::from_env())
    }

    pub fn is_configured(&self) -> bool {
        self.config.credentials().is_some()
    }

    fn build_email(config: &SmtpConfig, sender: &str, message: &str, reason: &str) -> Result<Message> {
        let from: Mailbox = sender
            .parse()
            .map_err(|e| PersonaError::Notification(format!("Invalid sender address: {e}")))?;
        let to: Mailbox = config
            .recipient
            .as_deref()
            .unwrap_or(sender)
            .parse()
            .map_err(|e| PersonaError::Notification(format!("Invalid recipient: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(reason)
            .header(ContentType::TEXT_PLAIN)
            .body(message.to_string())
            .map_err(|e| PersonaError::Notification(format!("Failed to build email: {e}")))
    }

    /// Blocking SMTP send over STARTTLS
    fn send(config: &SmtpConfig, message: &str, reason: &str) -> Result<()> {
        let (sender, password) = config
            .credentials()
            .ok_or_else(|| PersonaError::Notification("SMTP credentials missing".into()))?;

        let email = Self::build_email(config, sender, message, reason)?;

        let transport = SmtpTransport::starttls_relay(&config.host)
            .map_err(|e| PersonaError::Notification(format!("SMTP setup failed: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(sender.to_string(), password.to_string()))
            .build();

        transport
            .send(&email)
            .map_err(|e| PersonaError::Notification(format!("SMTP send failed: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, message: &str, reason: &str) -> Delivery {
        tracing::info!(reason, "Push: {}", message);

        if !self.is_configured() {
            tracing::warn!(
                sender_set = self.config.sender.is_some(),
                password_set = self.config.password.is_some(),
                "CLONE_EMAIL or CLONE_PASSWORD not set; notification not emailed"
            );
            return Delivery::Skipped;
        }

        let config = self.config.clone();
        let message = message.to_string();
        let reason = reason.to_string();
        let outcome =
            tokio::task::spawn_blocking(move || Self::send(&config, &message, &reason)).await;

        match outcome {
            Ok(Ok(())) => {
                tracing::info!("Notification email sent");
                Delivery::Sent
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Error sending notification email");
                Delivery::Failed(e.to_string())
            }
            Err(e) => {
                tracing::error!(error = %e, "Notification task failed");
                Delivery::Failed(e.to_string())
            }
        }
    }
}
