//! Notification dispatcher
//!
//! Entry point for print events. Decides whether an event is worth a
//! message, runs the optional snapshot pipeline and delivers the message to
//! every configured recipient. Each external step returns a `Result`; the
//! fallback chain is plain branching over those results:
//!
//! ```text
//! snapshot url? ── no ──────────────────────────────┐
//!   acquire ── err ─────────────────────────────────┤
//!   transform ── err: warn, keep the file as-is     │
//!   publish ── err / rejected ──────────────────────┤
//!   send with media ── every recipient failed ──────┤
//!                                                    └─> send text only
//! ```

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::composer::compose;
use super::phone;
use super::types::{ComposedMessage, DeliveryReport, EventKind, EventPayload};
use crate::errors::{AppResult, PhoneRole};
use crate::shared::clients::{AccountCredentials, MessagingClient, OutboundMessage, PublishOutcome, SnapshotPublisher};
use crate::shared::settings::{NotifierSettings, SettingsProvider, WebcamSettings};
use crate::snapshot::{SnapshotSource, SnapshotTransformer, TransformOutcome};

/// Why an event did not produce a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedEvent,
    Disabled,
    DoneNotificationsOff,
    PauseNotificationsOff,
}

/// What a dispatch would do, without any network traffic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPreview {
    pub event: String,
    pub skipped: Option<SkipReason>,
    pub body: String,
    pub from: String,
    pub recipients: Vec<String>,
    /// Entries that would fail normalization
    pub invalid_recipients: Vec<String>,
    pub send_image: bool,
}

/// Orchestrates one notification per eligible print event
pub struct NotificationDispatcher {
    settings: Arc<dyn SettingsProvider>,
    snapshots: Arc<dyn SnapshotSource>,
    transformer: Arc<dyn SnapshotTransformer>,
    publisher: Arc<dyn SnapshotPublisher>,
    messenger: Arc<dyn MessagingClient>,
}

impl NotificationDispatcher {
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        snapshots: Arc<dyn SnapshotSource>,
        transformer: Arc<dyn SnapshotTransformer>,
        publisher: Arc<dyn SnapshotPublisher>,
        messenger: Arc<dyn MessagingClient>,
    ) -> Self {
        Self {
            settings,
            snapshots,
            transformer,
            publisher,
            messenger,
        }
    }

    /// Host event bus entry point
    ///
    /// Returns true once a send pass over the recipients has finished,
    /// whether or not every recipient succeeded.
    pub fn handle(&self, event: &str, payload: &EventPayload) -> bool {
        match self.dispatch(event, payload) {
            Ok(report) => report.is_some(),
            Err(e) => {
                error!(category = e.category(), "Notification for {} aborted: {}", event, e);
                false
            }
        }
    }

    /// Like [`handle`](Self::handle) but reports what happened
    ///
    /// `Ok(None)` means the event was filtered out.
    pub fn dispatch(&self, event: &str, payload: &EventPayload) -> AppResult<Option<DeliveryReport>> {
        let kind = EventKind::from(event);
        let settings = NotifierSettings::load(self.settings.as_ref());

        if let Some(reason) = Self::skip_reason(&kind, &settings) {
            debug!("Ignoring {} event: {:?}", kind, reason);
            return Ok(None);
        }

        self.notify(&kind, payload, &settings).map(Some)
    }

    /// Run the delivery pipeline without the eligibility checks
    pub fn notify_now(&self, event: &str, payload: &EventPayload) -> AppResult<DeliveryReport> {
        let settings = NotifierSettings::load(self.settings.as_ref());
        self.notify(&EventKind::from(event), payload, &settings)
    }

    /// Compose the message and resolve recipients without sending anything
    pub fn preview(&self, event: &str, payload: &EventPayload) -> AppResult<DispatchPreview> {
        let kind = EventKind::from(event);
        let settings = NotifierSettings::load(self.settings.as_ref());
        let composed = compose(payload, &kind, &settings)?;

        let mut recipients = Vec::new();
        let mut invalid_recipients = Vec::new();
        for raw in settings.recipients() {
            match phone::to_e164(raw, PhoneRole::Recipient) {
                Ok(to) => recipients.push(to),
                Err(_) => invalid_recipients.push(raw.to_string()),
            }
        }

        Ok(DispatchPreview {
            event: kind.to_string(),
            skipped: Self::skip_reason(&kind, &settings),
            body: composed.body,
            from: composed.from,
            recipients,
            invalid_recipients,
            send_image: settings.send_image,
        })
    }

    /// Eligibility gates, in order; `None` means the event should be sent
    pub fn skip_reason(kind: &EventKind, settings: &NotifierSettings) -> Option<SkipReason> {
        if !kind.is_notifiable() {
            return Some(SkipReason::UnsupportedEvent);
        }
        if !settings.enabled {
            return Some(SkipReason::Disabled);
        }
        match kind {
            EventKind::PrintDone if !settings.on_print_done => Some(SkipReason::DoneNotificationsOff),
            EventKind::PrintPause if !settings.on_print_pause => Some(SkipReason::PauseNotificationsOff),
            _ => None,
        }
    }

    fn notify(&self, kind: &EventKind, payload: &EventPayload, settings: &NotifierSettings) -> AppResult<DeliveryReport> {
        // Configuration problems abort before any camera or network work
        let composed = compose(payload, kind, settings)?;
        let account = AccountCredentials::from_settings(settings)?;

        if !settings.send_image {
            return Ok(self.send(&composed, &account, settings, None));
        }

        let webcam = WebcamSettings::load(self.settings.as_ref());
        let Some(media_url) = self.hosted_snapshot(&webcam) else {
            return Ok(self.send(&composed, &account, settings, None));
        };

        let report = self.send(&composed, &account, settings, Some(&media_url));
        if report.all_failed() {
            warn!("Could not send a webcam image, sending only text notification.");
            return Ok(self.send(&composed, &account, settings, None));
        }
        Ok(report)
    }

    /// Capture, orient and upload a snapshot; `None` on any failure
    fn hosted_snapshot(&self, webcam: &WebcamSettings) -> Option<String> {
        let Some(snapshot_url) = webcam.snapshot_url.as_deref() else {
            warn!("Could not find settings for snapshot URL. Is it enabled?");
            return None;
        };

        info!("Taking Snapshot.... Say Cheese!");
        let artifact = match self.snapshots.acquire(snapshot_url) {
            Ok(artifact) => artifact,
            Err(e) => {
                error!(category = e.category(), "Exception while fetching snapshot from webcam, sending only a note: {}", e);
                return None;
            }
        };

        info!("Processing {} before uploading.", artifact.path().display());
        match self.transformer.transform(artifact.path(), webcam) {
            Ok(TransformOutcome::Applied) => info!("Rotated/flipped image with ffmpeg"),
            Ok(TransformOutcome::Skipped(reason)) => debug!("Snapshot left as captured: {:?}", reason),
            Err(e) => warn!("Failed to rotate/flip image with ffmpeg, {}", e),
        }

        match self.publisher.publish(artifact.path()) {
            Ok(PublishOutcome::Hosted { url }) => {
                info!("Snapshot uploaded to {}", url);
                Some(url)
            }
            Ok(PublishOutcome::Rejected { message }) => {
                error!("Cloud returned {}", message);
                None
            }
            Err(e) => {
                error!(category = e.category(), "Error Uploading image to the cloud: {}", e);
                None
            }
        }
    }

    /// One pass over the recipient list
    fn send(
        &self,
        composed: &ComposedMessage,
        account: &AccountCredentials,
        settings: &NotifierSettings,
        media_url: Option<&str>,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::new(media_url);
        let recipients = settings.recipients();
        if recipients.is_empty() {
            warn!("No recipient numbers configured, nothing to send");
        }

        for raw in recipients {
            let to = match phone::to_e164(raw, PhoneRole::Recipient) {
                Ok(to) => to,
                Err(e) => {
                    error!("SMS notification error: {}", e);
                    report.record_failure(raw, &e);
                    continue;
                }
            };

            let message = OutboundMessage {
                to: to.clone(),
                from: composed.from.clone(),
                body: composed.body.clone(),
                media_url: media_url.map(str::to_string),
            };
            match self.messenger.send(account, &message) {
                Ok(receipt) => {
                    info!("Print notification sent to {}", to);
                    report.record_success(to, receipt.message_id);
                }
                Err(e) => {
                    error!(category = e.category(), "SMS notification error: {}", e);
                    report.record_failure(to, &e);
                }
            }
        }

        report
    }
}
