//! Settings provider abstraction
//!
//! The dispatcher never reads configuration from ambient state. It is handed
//! a [`SettingsProvider`] and takes a fresh typed snapshot of it on every
//! dispatch, so edits made by the host between events are picked up.

use serde_json::Value;
use std::path::PathBuf;

use super::config::{Config, DEFAULT_MESSAGE_BODY};

/// Key-path access to configuration values
pub trait SettingsProvider: Send + Sync {
    /// Look up a notifier option, e.g. `["message_format", "body"]`
    fn get(&self, path: &[&str]) -> Option<Value>;

    /// Look up a global option, e.g. `["webcam", "snapshot"]`
    fn global_get(&self, path: &[&str]) -> Option<Value>;

    /// Global boolean lookup; anything missing or non-boolean reads as false
    fn global_get_boolean(&self, path: &[&str]) -> bool {
        self.global_get(path).and_then(|v| v.as_bool()).unwrap_or(false)
    }
}

fn lookup(root: Value, path: &[&str]) -> Option<Value> {
    let mut current = root;
    for key in path {
        current = match current {
            Value::Object(mut map) => map.remove(*key)?,
            _ => return None,
        };
    }
    match current {
        Value::Null => None,
        value => Some(value),
    }
}

impl SettingsProvider for Config {
    fn get(&self, path: &[&str]) -> Option<Value> {
        lookup(serde_json::to_value(&self.sms_notifier).ok()?, path)
    }

    fn global_get(&self, path: &[&str]) -> Option<Value> {
        lookup(serde_json::to_value(self).ok()?, path)
    }
}

fn get_bool(provider: &dyn SettingsProvider, path: &[&str], default: bool) -> bool {
    provider.get(path).and_then(|v| v.as_bool()).unwrap_or(default)
}

fn get_string(provider: &dyn SettingsProvider, path: &[&str]) -> Option<String> {
    match provider.get(path)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(value: Option<Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str().map(str::trim).map(str::to_string))
        .filter(|s| !s.is_empty())
}

/// Snapshot of the notifier options taken at the start of a dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct NotifierSettings {
    pub enabled: bool,
    pub send_image: bool,
    pub recipient_number: String,
    pub from_number: String,
    pub account_sid: String,
    pub auth_token: String,
    pub printer_name: String,
    pub on_print_pause: bool,
    pub on_print_done: bool,
    pub message_body: String,
}

impl NotifierSettings {
    pub fn load(provider: &dyn SettingsProvider) -> Self {
        Self {
            enabled: get_bool(provider, &["enabled"], false),
            send_image: get_bool(provider, &["send_image"], false),
            recipient_number: get_string(provider, &["recipient_number"]).unwrap_or_default(),
            from_number: get_string(provider, &["from_number"]).unwrap_or_default(),
            account_sid: get_string(provider, &["account_sid"]).unwrap_or_default(),
            auth_token: get_string(provider, &["auth_token"]).unwrap_or_default(),
            printer_name: get_string(provider, &["printer_name"]).unwrap_or_default(),
            on_print_pause: get_bool(provider, &["on_print_pause"], false),
            on_print_done: get_bool(provider, &["on_print_done"], true),
            message_body: get_string(provider, &["message_format", "body"])
                .unwrap_or_else(|| DEFAULT_MESSAGE_BODY.to_string()),
        }
    }

    /// Recipient entries from the comma-separated list, trimmed, blanks dropped
    pub fn recipients(&self) -> Vec<&str> {
        self.recipient_number
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect()
    }
}

/// Snapshot of the global webcam settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebcamSettings {
    pub snapshot_url: Option<String>,
    pub ffmpeg: Option<PathBuf>,
    pub flip_h: bool,
    pub flip_v: bool,
    pub rotate_90: bool,
}

impl WebcamSettings {
    pub fn load(provider: &dyn SettingsProvider) -> Self {
        Self {
            snapshot_url: non_blank(provider.global_get(&["webcam", "snapshot"])),
            ffmpeg: non_blank(provider.global_get(&["webcam", "ffmpeg"])).map(PathBuf::from),
            flip_h: provider.global_get_boolean(&["webcam", "flipH"]),
            flip_v: provider.global_get_boolean(&["webcam", "flipV"]),
            rotate_90: provider.global_get_boolean(&["webcam", "rotate90"]),
        }
    }

    /// True when at least one rotate/flip flag is set
    pub fn wants_transform(&self) -> bool {
        self.flip_h || self.flip_v || self.rotate_90
    }
}
