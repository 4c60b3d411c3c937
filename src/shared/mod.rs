//! Building blocks shared by the CLI and the notification pipeline
//!
//! Configuration schema, the settings lookup seam and the external service
//! clients live here.

pub mod clients;
pub mod config;
pub mod settings;
