use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::endpoint;
use super::traits::{AccountCredentials, MessageReceipt, MessagingClient, OutboundMessage};
use crate::errors::{AppError, AppResult};
use crate::shared::config::ServicesConfig;

/// Configuration for the messaging provider client
#[derive(Debug, Clone)]
pub struct TwilioClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for TwilioClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.twilio.com".to_string(),
            timeout_secs: 30,
            user_agent: Some(concat!("printer-sms/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl From<&ServicesConfig> for TwilioClientConfig {
    fn from(config: &ServicesConfig) -> Self {
        Self {
            base_url: config.messaging_url.clone(),
            timeout_secs: config.http_timeout_secs,
            ..Default::default()
        }
    }
}

/// Blocking client for the Twilio Messages API
pub struct TwilioClient {
    client: Client,
    base_url: Url,
}

impl TwilioClient {
    pub fn new(config: TwilioClientConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url)?;

        let mut client_builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs));
        if let Some(user_agent) = &config.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        }
        let client = client_builder
            .build()
            .map_err(|e| AppError::config_with_source("Failed to create HTTP client", e))?;

        Ok(Self { client, base_url })
    }

    /// Build the Messages resource URL for an account
    fn messages_url(&self, account_sid: &str) -> AppResult<Url> {
        endpoint(&self.base_url, ["2010-04-01", "Accounts", account_sid, "Messages.json"])
    }

    /// Form fields for a message; `MediaUrl` only when an image is attached
    fn form_params(message: &OutboundMessage) -> Vec<(&'static str, &str)> {
        let mut params = vec![
            ("To", message.to.as_str()),
            ("From", message.from.as_str()),
            ("Body", message.body.as_str()),
        ];
        if let Some(media_url) = &message.media_url {
            params.push(("MediaUrl", media_url.as_str()));
        }
        params
    }
}

/// Human-readable reason from a provider error body
fn provider_error(body: &Value, status: reqwest::StatusCode) -> String {
    match (body.get("code").and_then(Value::as_i64), body.get("message").and_then(Value::as_str)) {
        (Some(code), Some(message)) => format!("{message} (code {code})"),
        (None, Some(message)) => message.to_string(),
        _ => format!("HTTP {status}"),
    }
}

impl MessagingClient for TwilioClient {
    fn send(&self, account: &AccountCredentials, message: &OutboundMessage) -> AppResult<MessageReceipt> {
        let url = self.messages_url(&account.account_sid)?;
        debug!("Posting message to {} via {}", message.to, url);

        let response = self
            .client
            .post(url)
            .basic_auth(&account.account_sid, Some(&account.auth_token))
            .form(&Self::form_params(message))
            .send()?;

        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or_else(|e| {
                debug!("Error response from provider is not JSON: {}", e);
                Value::Null
            });
            return Err(AppError::MessageRejected {
                to: message.to.clone(),
                reason: provider_error(&body, status),
            });
        }

        let body: Value = serde_json::from_str(&text)?;
        Ok(MessageReceipt {
            message_id: body.get("sid").and_then(Value::as_str).unwrap_or_default().to_string(),
            status: body.get("status").and_then(Value::as_str).map(str::to_string),
        })
    }
}
