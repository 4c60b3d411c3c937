use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::endpoint;
use super::traits::{PublishOutcome, SnapshotPublisher};
use crate::errors::{AppError, AppResult, ErrorContextExt};
use crate::shared::config::ServicesConfig;
use crate::snapshot::acquirer::SNAPSHOT_CONTENT_TYPE;

/// Configuration for unsigned uploads to the media host
#[derive(Debug, Clone)]
pub struct CloudinaryClientConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub upload_preset: String,
    pub timeout_secs: u64,
}

impl Default for CloudinaryClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cloudinary.com".to_string(),
            cloud_name: "octoprint-twilio".to_string(),
            upload_preset: "snapshot".to_string(),
            timeout_secs: 30,
        }
    }
}

impl From<&ServicesConfig> for CloudinaryClientConfig {
    fn from(config: &ServicesConfig) -> Self {
        Self {
            base_url: config.media_host_url.clone(),
            cloud_name: config.media_cloud_name.clone(),
            upload_preset: config.media_upload_preset.clone(),
            timeout_secs: config.http_timeout_secs,
        }
    }
}

/// Publishes snapshots with Cloudinary's unsigned upload endpoint
pub struct CloudinaryPublisher {
    client: Client,
    upload_url: Url,
    upload_preset: String,
}

impl CloudinaryPublisher {
    pub fn new(config: CloudinaryClientConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let upload_url = endpoint(&base_url, ["v1_1", config.cloud_name.as_str(), "image", "upload"])?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::config_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            upload_url,
            upload_preset: config.upload_preset,
        })
    }
}

/// Interpret an upload response body
pub fn parse_upload_response(body: &Value) -> PublishOutcome {
    let url = ["url", "secure_url"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find(|url| !url.is_empty());
    if let Some(url) = url {
        return PublishOutcome::Hosted { url: url.to_string() };
    }

    let message = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("response carried neither a url nor an error");
    PublishOutcome::Rejected { message: message.to_string() }
}

impl SnapshotPublisher for CloudinaryPublisher {
    fn publish(&self, path: &Path) -> AppResult<PublishOutcome> {
        let file = Part::file(path)
            .in_file_operation(path, "attach snapshot to upload")?
            .mime_str(SNAPSHOT_CONTENT_TYPE)?;
        let form = Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", file);

        debug!("Uploading {} to {}", path.display(), self.upload_url);
        let response = self.client.post(self.upload_url.clone()).multipart(form).send()?;

        let status = response.status();
        let text = response.text()?;
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => Ok(parse_upload_response(&body)),
            Err(_) => Err(AppError::HttpStatus {
                status_code: status.as_u16(),
                reason: format!("media host returned a non-JSON body ({} bytes)", text.len()),
            }),
        }
    }
}
