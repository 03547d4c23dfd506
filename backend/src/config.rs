use std::env;
use std::time::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means the in-memory store is used
    pub database_url: Option<String>,
    pub server_addr: String,
    pub notifications: NotificationConfig,
    pub smtp: SmtpConfig,
    /// IANA timezone used when rendering meeting times in reminders
    pub reminder_timezone: chrono_tz::Tz,
}

/// Which delivery backend the reminder sender uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationProvider {
    Resend,
    Smtp,
}

/// Transactional email API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub provider: NotificationProvider,
    pub api_url: String,
    pub api_key: String,
    /// Sender mailbox, e.g. "MeetSync <reminders@example.com>"
    pub from: String,
    pub timeout_secs: u64,
}

/// SMTP configuration for sending emails
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    pub use_tls: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let provider = match env::var("NOTIFICATION_PROVIDER")
            .unwrap_or_else(|_| "resend".to_string())
            .to_lowercase()
            .as_str()
        {
            "resend" => NotificationProvider::Resend,
            "smtp" => NotificationProvider::Smtp,
            other => anyhow::bail!("Unsupported NOTIFICATION_PROVIDER '{}'", other),
        };

        let tz_name = env::var("REMINDER_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let reminder_timezone = tz_name
            .parse::<chrono_tz::Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid REMINDER_TIMEZONE '{}': {}", tz_name, e))?;

        Ok(Config {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            server_addr: env::var("SERVER_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            notifications: NotificationConfig {
                provider,
                api_url: env::var("RESEND_API_URL")
                    .unwrap_or_else(|_| "https://api.resend.com".to_string()),
                api_key: env::var("RESEND_API_KEY").unwrap_or_default(),
                from: env::var("NOTIFICATION_FROM")
                    .unwrap_or_else(|_| "MeetSync <onboarding@resend.dev>".to_string()),
                timeout_secs: env::var("NOTIFICATION_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").unwrap_or_default(),
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse()
                    .unwrap_or(587),
                username: env::var("SMTP_USERNAME").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from_email: env::var("SMTP_FROM_EMAIL")
                    .unwrap_or_else(|_| "reminders@meetsync.local".to_string()),
                from_name: env::var("SMTP_FROM_NAME")
                    .unwrap_or_else(|_| "MeetSync".to_string()),
                use_tls: env::var("SMTP_USE_TLS")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .unwrap_or(true),
            },
            reminder_timezone,
        })
    }
}

impl NotificationConfig {
    /// Check if the email API is properly configured
    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.api_key.is_empty() && !self.from.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl SmtpConfig {
    /// Check if SMTP is properly configured
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}
