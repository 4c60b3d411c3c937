//! Centralized error handling module
//!
//! Structured, typed errors for the notifier. The CLI boundary converts them
//! into `anyhow::Error` for reporting.

pub mod types;
pub mod context;

pub use types::{AppError, AppResult, PhoneRole};
pub use context::ErrorContextExt;
