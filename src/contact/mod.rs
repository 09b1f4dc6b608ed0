//! Contact form relay to a Telegram chat

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ContactConfig;
use crate::helpers::format_timestamp;

/// A contact form submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ContactError {
    /// A required field is blank
    #[error("Vui lòng điền đầy đủ thông tin.")]
    Validation,

    /// The bot token or chat id is not configured
    #[error("missing Telegram credentials ({token_env} / {chat_id_env})")]
    MissingCredentials {
        token_env: String,
        chat_id_env: String,
    },

    /// Telegram rejected the message or could not be reached
    #[error("Telegram API error: {0}")]
    Upstream(String),
}

impl ContactError {
    /// Message safe to show to the person submitting the form
    pub fn public_message(&self) -> &'static str {
        match self {
            ContactError::Validation => "Vui lòng điền đầy đủ thông tin.",
            ContactError::MissingCredentials { .. } => "Server configuration error.",
            ContactError::Upstream(_) => "Không thể gửi tin nhắn.",
        }
    }
}

impl ContactRequest {
    /// Name, email and message must be non-blank
    pub fn validate(&self) -> Result<(), ContactError> {
        let blank = [&self.name, &self.email, &self.message]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank {
            Err(ContactError::Validation)
        } else {
            Ok(())
        }
    }

    /// Render the Telegram message (Markdown parse mode)
    pub fn to_message(&self, config: &ContactConfig, sent_at: &str) -> String {
        let type_label = match self.kind.as_deref() {
            Some(kind) => config
                .type_labels
                .get(kind)
                .map(String::as_str)
                .unwrap_or(kind),
            None => "—",
        };

        [
            "📩 *Liên hệ mới từ TensorLab*".to_string(),
            String::new(),
            format!("📋 *Loại hợp tác:* {}", type_label),
            format!("👤 *Tên:* {}", self.name),
            format!("📧 *Email:* {}", self.email),
            String::new(),
            "💬 *Nội dung:*".to_string(),
            self.message.clone(),
            String::new(),
            format!("🕐 _{}_", sent_at),
        ]
        .join("\n")
    }
}

/// Bot token and destination chat
#[derive(Debug, Clone)]
pub struct TelegramCredentials {
    pub token: String,
    pub chat_id: String,
}

impl TelegramCredentials {
    /// Read credentials from the environment variables named in `config`
    pub fn from_env(config: &ContactConfig) -> Option<Self> {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Some(Self {
            token: read(&config.token_env)?,
            chat_id: read(&config.chat_id_env)?,
        })
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Forwards validated submissions to Telegram
#[derive(Debug, Clone)]
pub struct ContactRelay {
    config: ContactConfig,
    credentials: Option<TelegramCredentials>,
    tz: Tz,
    http: reqwest::Client,
}

impl ContactRelay {
    pub fn new(config: ContactConfig, credentials: Option<TelegramCredentials>, tz: Tz) -> Self {
        Self {
            config,
            credentials,
            tz,
            http: reqwest::Client::new(),
        }
    }

    /// Build a relay with credentials taken from the environment
    pub fn from_env(config: ContactConfig, tz: Tz) -> Self {
        let credentials = TelegramCredentials::from_env(&config);
        if credentials.is_none() {
            tracing::warn!(
                "Missing {} or {}, contact submissions will be rejected",
                config.token_env,
                config.chat_id_env
            );
        }
        Self::new(config, credentials, tz)
    }

    /// Validate a submission and deliver it
    pub async fn submit(&self, request: &ContactRequest, now: DateTime<Utc>) -> Result<(), ContactError> {
        request.validate()?;

        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| ContactError::MissingCredentials {
                token_env: self.config.token_env.clone(),
                chat_id_env: self.config.chat_id_env.clone(),
            })?;

        let sent_at = format_timestamp(&now.with_timezone(&self.tz));
        let text = request.to_message(&self.config, &sent_at);

        self.send(credentials, &text).await
    }

    async fn send(&self, credentials: &TelegramCredentials, text: &str) -> Result<(), ContactError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            credentials.token
        );

        let response = self
            .http
            .post(&url)
            .json(&SendMessage {
                chat_id: &credentials.chat_id,
                text,
                parse_mode: "Markdown",
            })
            .send()
            .await
            .map_err(|e| ContactError::Upstream(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ContactError::Upstream(format!("{}: {}", status, body)));
        }

        tracing::debug!("Contact message delivered");
        Ok(())
    }
}
