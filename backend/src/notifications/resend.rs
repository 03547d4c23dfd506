use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{NotificationSender, OutboundEmail, SendError, SentEmail};
use crate::config::NotificationConfig;

/// Resend transactional email API client
#[derive(Debug, Clone)]
pub struct ResendSender {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendErrorBody {
    message: Option<String>,
    name: Option<String>,
}

impl ResendSender {
    pub fn new(config: &NotificationConfig) -> Result<Self, SendError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SendError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SendError {
    if err.is_timeout() {
        SendError::Timeout
    } else {
        SendError::Transport(err.to_string())
    }
}

#[async_trait]
impl NotificationSender for ResendSender {
    async fn send(&self, email: &OutboundEmail) -> Result<SentEmail, SendError> {
        if self.api_key.is_empty() {
            return Err(SendError::NotConfigured("RESEND_API_KEY is empty".to_string()));
        }

        let request = SendEmailRequest {
            from: &self.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .http
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status.is_success() {
            let body: SendEmailResponse = response.json().await.map_err(map_reqwest_error)?;
            info!("Email sent to {} (id {})", email.to, body.id);
            return Ok(SentEmail { id: body.id });
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ResendErrorBody>(&text) {
            Ok(body) => body.message.or(body.name).unwrap_or_default(),
            Err(_) => String::new(),
        };
        error!("Resend rejected email to {}: {} {}", email.to, status, text);

        Err(SendError::Provider {
            status: status.as_u16(),
            message,
        })
    }
}
