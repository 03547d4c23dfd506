use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{authentication::Credentials, PoolConfig},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

use super::{NotificationSender, OutboundEmail, SendError, SentEmail};
use crate::config::SmtpConfig;

/// SMTP delivery through lettre's pooled async transport
#[derive(Clone)]
pub struct SmtpSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    configured: bool,
}

impl SmtpSender {
    pub fn new(smtp_config: &SmtpConfig, timeout: Duration) -> Result<Self, SendError> {
        let creds = Credentials::new(
            smtp_config.username.clone(),
            smtp_config.password.clone(),
        );

        let builder = if smtp_config.use_tls && !smtp_config.host.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp_config.host)
                .map_err(|e| SendError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp_config.host)
        };

        let transport = builder
            .port(smtp_config.port)
            .credentials(creds)
            .pool_config(PoolConfig::new().max_size(4))
            .timeout(Some(timeout))
            .build();

        let from = format!("{} <{}>", smtp_config.from_name, smtp_config.from_email)
            .parse::<Mailbox>()
            .map_err(|e| SendError::InvalidAddress(format!("{}: {}", smtp_config.from_email, e)))?;

        Ok(Self {
            transport,
            from,
            configured: smtp_config.is_configured(),
        })
    }

    /// `<uuid@sender-domain>`; returned to callers as the provider id
    fn message_id(&self) -> String {
        format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain())
    }
}

#[async_trait]
impl NotificationSender for SmtpSender {
    async fn send(&self, email: &OutboundEmail) -> Result<SentEmail, SendError> {
        if !self.configured {
            return Err(SendError::NotConfigured("SMTP host or credentials missing".to_string()));
        }

        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|_| SendError::InvalidAddress(email.to.clone()))?;

        let id = self.message_id();
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .message_id(Some(id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| SendError::Transport(e.to_string()))?;

        match self.transport.send(message).await {
            Ok(_) => {
                info!("Email sent successfully to {} ({})", email.to, id);
                Ok(SentEmail { id })
            }
            Err(e) if e.is_timeout() => {
                error!("Timed out sending email to {}", email.to);
                Err(SendError::Timeout)
            }
            Err(e) => {
                error!("Failed to send email to {}: {}", email.to, e);
                match e.status() {
                    Some(code) => Err(SendError::Provider {
                        status: code.to_string().parse().unwrap_or(0),
                        message: e.to_string(),
                    }),
                    None => Err(SendError::Transport(e.to_string())),
                }
            }
        }
    }
}
