//! Print event notification pipeline
//!
//! The dispatcher receives `PrintDone`/`PrintPause` events, optionally
//! captures and hosts a webcam snapshot, then sends an SMS (or MMS) to each
//! configured recipient.

pub mod composer;
pub mod dispatcher;
pub mod phone;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

pub use dispatcher::{DispatchPreview, NotificationDispatcher, SkipReason};
pub use types::{DeliveryReport, EventKind, EventPayload};

use crate::errors::AppResult;
use crate::shared::clients::{CloudinaryClientConfig, CloudinaryPublisher, TwilioClient, TwilioClientConfig};
use crate::shared::config::Config;
use crate::snapshot::{FfmpegTransformer, HttpSnapshotSource};

/// Create a dispatcher wired to the real camera, ffmpeg and provider clients
pub fn create_default_dispatcher(config: Config) -> AppResult<NotificationDispatcher> {
    let services = config.services.clone();
    let snapshots = HttpSnapshotSource::new(Duration::from_secs(services.snapshot_timeout_secs))?;
    let transformer = FfmpegTransformer::with_system_runner(Duration::from_secs(services.ffmpeg_timeout_secs));
    let publisher = CloudinaryPublisher::new(CloudinaryClientConfig::from(&services))?;
    let messenger = TwilioClient::new(TwilioClientConfig::from(&services))?;

    Ok(NotificationDispatcher::new(
        Arc::new(config),
        Arc::new(snapshots),
        Arc::new(transformer),
        Arc::new(publisher),
        Arc::new(messenger),
    ))
}
