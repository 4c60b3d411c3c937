//! Common test utilities and helpers
//!
//! Hand-written fakes for the dispatcher's collaborators, a settings
//! provider the test can edit between dispatches, and a CLI command builder.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use printer_sms::errors::{AppError, AppResult};
use printer_sms::notifier::NotificationDispatcher;
use printer_sms::shared::clients::{
    AccountCredentials, MessageReceipt, MessagingClient, OutboundMessage, PublishOutcome, SnapshotPublisher,
};
use printer_sms::shared::config::Config;
use printer_sms::shared::settings::{SettingsProvider, WebcamSettings};
use printer_sms::snapshot::{SnapshotArtifact, SnapshotSource, SnapshotTransformer, TransformOutcome};
use serde_json::Value;

pub const SNAPSHOT_URL: &str = "http://camera.local/?action=snapshot";
pub const HOSTED_URL: &str = "https://media.example/snap.jpg";
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0fake-frame";

/// Notifier config that sends to one US recipient
pub fn enabled_config() -> Config {
    let mut config = Config::default();
    config.sms_notifier.enabled = true;
    config.sms_notifier.recipient_number = "5551234567".to_string();
    config.sms_notifier.from_number = "5550000000".to_string();
    config.sms_notifier.account_sid = "AC123".to_string();
    config.sms_notifier.auth_token = "secret".to_string();
    config.sms_notifier.printer_name = "Ender".to_string();
    config
}

/// Settings the test can change while the dispatcher holds them
pub struct SharedSettings {
    config: Mutex<Config>,
}

impl SharedSettings {
    pub fn new(config: Config) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }

    pub fn update(&self, edit: impl FnOnce(&mut Config)) {
        edit(&mut self.config.lock().unwrap());
    }
}

impl SettingsProvider for SharedSettings {
    fn get(&self, path: &[&str]) -> Option<Value> {
        self.config.lock().unwrap().get(path)
    }

    fn global_get(&self, path: &[&str]) -> Option<Value> {
        self.config.lock().unwrap().global_get(path)
    }
}

/// Camera that writes a fixed frame, or fails
pub struct FakeCamera {
    pub fail: bool,
    pub temp_dir: TempDir,
    pub requested: Mutex<Vec<String>>,
}

impl FakeCamera {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            temp_dir: TempDir::new().unwrap(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }
}

impl SnapshotSource for FakeCamera {
    fn acquire(&self, url: &str) -> AppResult<SnapshotArtifact> {
        self.requested.lock().unwrap().push(url.to_string());
        if self.fail {
            return Err(AppError::NetworkTimeout { url: url.to_string() });
        }
        SnapshotArtifact::materialize_in(JPEG_BYTES, self.temp_dir.path())
    }
}

/// Transformer that records what it was asked to do
pub struct FakeTransformer {
    pub fail: bool,
    pub seen: Mutex<Vec<(PathBuf, WebcamSettings)>>,
}

impl FakeTransformer {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl SnapshotTransformer for FakeTransformer {
    fn transform(&self, path: &Path, webcam: &WebcamSettings) -> AppResult<TransformOutcome> {
        self.seen.lock().unwrap().push((path.to_path_buf(), webcam.clone()));
        if self.fail {
            return Err(AppError::ProcessTimeout {
                command: format!("ffmpeg -y -i {}", path.display()),
                timeout_secs: 20,
            });
        }
        Ok(TransformOutcome::Applied)
    }
}

#[derive(Clone)]
pub enum UploadBehavior {
    Hosted,
    Rejected,
    Unreachable,
}

/// Media host fake; records the uploaded path and its contents at upload time
pub struct FakePublisher {
    pub behavior: UploadBehavior,
    pub uploads: Mutex<Vec<(PathBuf, Option<Vec<u8>>)>>,
}

impl FakePublisher {
    pub fn new(behavior: UploadBehavior) -> Self {
        Self {
            behavior,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

impl SnapshotPublisher for FakePublisher {
    fn publish(&self, path: &Path) -> AppResult<PublishOutcome> {
        self.uploads
            .lock()
            .unwrap()
            .push((path.to_path_buf(), std::fs::read(path).ok()));
        match self.behavior {
            UploadBehavior::Hosted => Ok(PublishOutcome::Hosted {
                url: HOSTED_URL.to_string(),
            }),
            UploadBehavior::Rejected => Ok(PublishOutcome::Rejected {
                message: "Upload preset not found".to_string(),
            }),
            UploadBehavior::Unreachable => Err(AppError::HttpStatus {
                status_code: 503,
                reason: "Service Unavailable".to_string(),
            }),
        }
    }
}

/// Messaging provider fake
pub struct FakeMessenger {
    /// Recipients the provider refuses
    pub reject: Vec<String>,
    /// Refuse every message that carries media
    pub reject_media: bool,
    pub attempts: Mutex<Vec<OutboundMessage>>,
    pub accounts: Mutex<Vec<AccountCredentials>>,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self {
            reject: Vec::new(),
            reject_media: false,
            attempts: Mutex::new(Vec::new()),
            accounts: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(recipients: &[&str]) -> Self {
        Self {
            reject: recipients.iter().map(|r| r.to_string()).collect(),
            ..Self::new()
        }
    }

    pub fn rejecting_media() -> Self {
        Self {
            reject_media: true,
            ..Self::new()
        }
    }

    pub fn attempts(&self) -> Vec<OutboundMessage> {
        self.attempts.lock().unwrap().clone()
    }
}

impl MessagingClient for FakeMessenger {
    fn send(&self, account: &AccountCredentials, message: &OutboundMessage) -> AppResult<MessageReceipt> {
        let mut attempts = self.attempts.lock().unwrap();
        attempts.push(message.clone());
        self.accounts.lock().unwrap().push(account.clone());

        if self.reject.contains(&message.to) || (self.reject_media && message.media_url.is_some()) {
            return Err(AppError::MessageRejected {
                to: message.to.clone(),
                reason: "The 'To' number is not a valid phone number.".to_string(),
            });
        }
        Ok(MessageReceipt {
            message_id: format!("SM{}", attempts.len()),
            status: Some("queued".to_string()),
        })
    }
}

/// A dispatcher wired to fakes, with handles kept for assertions
pub struct Harness {
    pub settings: Arc<SharedSettings>,
    pub camera: Arc<FakeCamera>,
    pub transformer: Arc<FakeTransformer>,
    pub publisher: Arc<FakePublisher>,
    pub messenger: Arc<FakeMessenger>,
    pub dispatcher: NotificationDispatcher,
}

impl Harness {
    pub fn new(config: Config) -> Self {
        Self::with(
            config,
            FakeCamera::new(false),
            FakeTransformer::new(false),
            FakePublisher::new(UploadBehavior::Hosted),
            FakeMessenger::new(),
        )
    }

    pub fn with(
        config: Config,
        camera: FakeCamera,
        transformer: FakeTransformer,
        publisher: FakePublisher,
        messenger: FakeMessenger,
    ) -> Self {
        let settings = Arc::new(SharedSettings::new(config));
        let camera = Arc::new(camera);
        let transformer = Arc::new(transformer);
        let publisher = Arc::new(publisher);
        let messenger = Arc::new(messenger);
        let dispatcher = NotificationDispatcher::new(
            settings.clone(),
            camera.clone(),
            transformer.clone(),
            publisher.clone(),
            messenger.clone(),
        );
        Self {
            settings,
            camera,
            transformer,
            publisher,
            messenger,
            dispatcher,
        }
    }
}

/// Test command builder for the printer-sms CLI with an isolated config file
pub struct TestCommand {
    cmd: Command,
}

impl TestCommand {
    pub fn new(config_path: &Path) -> Self {
        let mut cmd = Command::cargo_bin("printer-sms").expect("Failed to find printer-sms binary");
        cmd.env("PRINTER_SMS_CONFIG", config_path);
        cmd.env_remove("RUST_LOG");
        Self { cmd }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.cmd.arg(arg.as_ref());
        }
        self
    }

    pub fn stdin<S: AsRef<str>>(mut self, input: S) -> Self {
        self.cmd.write_stdin(input.as_ref());
        self
    }

    pub fn assert(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert()
    }
}

/// Write `config` as TOML into `dir` and return its path
pub fn write_config(dir: &TempDir, config: &Config) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, toml::to_string_pretty(config).unwrap()).unwrap();
    path
}
