use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default message body, matching the placeholders the composer provides
pub const DEFAULT_MESSAGE_BODY: &str = "{printer_name} event: {event} - {filename} - {elapsed_time}";

/// Main configuration structure for the printer SMS notifier
///
/// `sms_notifier` holds the plugin-level options read with
/// [`SettingsProvider::get`](crate::shared::settings::SettingsProvider::get);
/// the other sections are global and read with `global_get`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sms_notifier: NotifierConfig,
    #[serde(default)]
    pub webcam: WebcamConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Notification options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub enabled: bool,
    pub send_image: bool,
    pub recipient_number: String, // comma separated
    pub from_number: String,
    pub account_sid: String,
    pub auth_token: String,
    pub printer_name: String,
    pub on_print_pause: bool,
    pub on_print_done: bool,
    pub message_format: MessageFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageFormat {
    pub body: String,
}

impl Default for MessageFormat {
    fn default() -> Self {
        Self {
            body: DEFAULT_MESSAGE_BODY.to_string(),
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            send_image: false,
            recipient_number: String::new(),
            from_number: String::new(),
            account_sid: String::new(),
            auth_token: String::new(),
            printer_name: String::new(),
            on_print_pause: false,
            on_print_done: true,
            message_format: MessageFormat::default(),
        }
    }
}

/// Global webcam settings shared with the host
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WebcamConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ffmpeg: Option<PathBuf>,
    #[serde(rename = "flipH")]
    pub flip_h: bool,
    #[serde(rename = "flipV")]
    pub flip_v: bool,
    #[serde(rename = "rotate90")]
    pub rotate_90: bool,
}

/// Endpoints and timeouts for the external services
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub messaging_url: String,
    pub media_host_url: String,
    pub media_cloud_name: String,
    pub media_upload_preset: String,
    pub http_timeout_secs: u64,
    pub snapshot_timeout_secs: u64,
    pub ffmpeg_timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            messaging_url: "https://api.twilio.com".to_string(),
            media_host_url: "https://api.cloudinary.com".to_string(),
            media_cloud_name: "octoprint-twilio".to_string(),
            media_upload_preset: "snapshot".to_string(),
            http_timeout_secs: 30,
            snapshot_timeout_secs: 10,
            ffmpeg_timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_path: None, // console only
        }
    }
}
