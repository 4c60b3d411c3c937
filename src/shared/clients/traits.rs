use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{AppError, AppResult};
use crate::shared::settings::NotifierSettings;

/// Messaging provider interface (SMS/MMS)
pub trait MessagingClient: Send + Sync {
    /// Deliver one message to one recipient
    fn send(&self, account: &AccountCredentials, message: &OutboundMessage) -> AppResult<MessageReceipt>;
}

/// Media host interface used to turn a local snapshot into a public URL
pub trait SnapshotPublisher: Send + Sync {
    /// Upload the file at `path`
    ///
    /// `Err` means the upload never completed; a response from the host that
    /// carries an error instead of a URL is `Ok(PublishOutcome::Rejected)`.
    fn publish(&self, path: &Path) -> AppResult<PublishOutcome>;
}

/// Messaging provider account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl AccountCredentials {
    /// Credentials from the notifier settings; both values are required
    pub fn from_settings(settings: &NotifierSettings) -> AppResult<Self> {
        let account_sid = settings.account_sid.trim();
        let auth_token = settings.auth_token.trim();
        if account_sid.is_empty() {
            return Err(AppError::config("account_sid is not configured"));
        }
        if auth_token.is_empty() {
            return Err(AppError::config("auth_token is not configured"));
        }
        Ok(Self {
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
        })
    }
}

/// A single outbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub to: String,
    pub from: String,
    pub body: String,
    pub media_url: Option<String>,
}

/// Provider acknowledgement for an accepted message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    pub message_id: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Upload accepted, reachable at `url`
    Hosted { url: String },
    /// The host answered with an error object
    Rejected { message: String },
}
