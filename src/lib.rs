//! Printer SMS Notifier Library
//!
//! Sends SMS/MMS notifications when a 3D print finishes or pauses, with an
//! optional oriented webcam snapshot attached.

pub mod config;
pub mod errors;
pub mod notifier;
pub mod shared;
pub mod snapshot;
pub mod templates;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigManager, NotifierConfig};
pub use errors::{AppError, AppResult};
pub use notifier::{create_default_dispatcher, DeliveryReport, EventPayload, NotificationDispatcher};
