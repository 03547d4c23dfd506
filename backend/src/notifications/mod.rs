//! Outbound email delivery
//!
//! A [`NotificationSender`] takes a rendered email and hands it to a
//! transactional provider. Sends are not retried: providers do not
//! deduplicate, so a retry can deliver the same reminder twice.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{Config, NotificationProvider};

pub mod resend;
pub mod smtp;

pub use resend::ResendSender;
pub use smtp::SmtpSender;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Provider acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentEmail {
    pub id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("Email delivery is not configured: {0}")]
    NotConfigured(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Provider rejected the email ({status}): {message}")]
    Provider { status: u16, message: String },
    #[error("Timed out waiting for the email provider")]
    Timeout,
    #[error("Transport error: {0}")]
    Transport(String),
}

impl SendError {
    /// Message safe to show to the dashboard user
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::NotConfigured(_) => "Email delivery is not configured".to_string(),
            Self::InvalidAddress(addr) => format!("Invalid email address: {}", addr),
            Self::Timeout => "Timed out sending email".to_string(),
            _ => "Failed to send email".to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<SentEmail, SendError>;
}

/// Build the sender selected by configuration
pub fn sender_from_config(config: &Config) -> Result<Arc<dyn NotificationSender>, SendError> {
    match config.notifications.provider {
        NotificationProvider::Resend => {
            if !config.notifications.is_configured() {
                tracing::warn!("RESEND_API_KEY is not set; reminder emails will fail until it is configured");
            }
            Ok(Arc::new(ResendSender::new(&config.notifications)?))
        }
        NotificationProvider::Smtp => {
            if !config.smtp.is_configured() {
                tracing::warn!("SMTP is not fully configured; reminder emails will fail until it is");
            }
            Ok(Arc::new(SmtpSender::new(&config.smtp, config.notifications.timeout())?))
        }
    }
}
