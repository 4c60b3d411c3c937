//! Clients for the external services the notifier calls out to
//!
//! - **TwilioClient**: messaging provider (SMS/MMS delivery)
//! - **CloudinaryPublisher**: media host for snapshot uploads
//! - **Traits**: the seams the dispatcher depends on, so tests can swap in fakes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use printer_sms::shared::clients::{
//!     AccountCredentials, MessagingClient, OutboundMessage, TwilioClient, TwilioClientConfig,
//! };
//!
//! # fn main() -> Result<(), printer_sms::errors::AppError> {
//! let client = TwilioClient::new(TwilioClientConfig::default())?;
//! let account = AccountCredentials {
//!     account_sid: "AC...".to_string(),
//!     auth_token: "token".to_string(),
//! };
//! client.send(&account, &OutboundMessage {
//!     to: "+15551234567".to_string(),
//!     from: "+15550000000".to_string(),
//!     body: "Print finished".to_string(),
//!     media_url: None,
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod cloudinary;
pub mod traits;
pub mod twilio;

pub use cloudinary::{CloudinaryClientConfig, CloudinaryPublisher};
pub use traits::{
    AccountCredentials, MessageReceipt, MessagingClient, OutboundMessage, PublishOutcome,
    SnapshotPublisher,
};
pub use twilio::{TwilioClient, TwilioClientConfig};

use url::Url;

use crate::errors::{AppError, AppResult};

/// Append path segments to a service base URL, keeping any path prefix
///
/// Each segment is percent-encoded on its own, so a `/` inside an
/// identifier stays part of that segment.
pub(crate) fn endpoint<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> AppResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| AppError::config(format!("'{base}' cannot be used as a service base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
