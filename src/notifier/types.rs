//! Type definitions for the notification pipeline

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::AppError;

/// Print lifecycle event kinds the host can deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    PrintDone,
    PrintPause,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::PrintDone => "PrintDone",
            EventKind::PrintPause => "PrintPause",
            EventKind::Other(name) => name,
        }
    }

    /// Whether this kind can ever produce a notification
    pub fn is_notifiable(&self) -> bool {
        !matches!(self, EventKind::Other(_))
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value {
            "PrintDone" => EventKind::PrintDone,
            "PrintPause" => EventKind::PrintPause,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered with a print event
///
/// Only `name` and `time` are read; everything else the host sends is kept
/// in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    /// File name of the job
    #[serde(default)]
    pub name: String,
    /// Elapsed print time in seconds
    #[serde(default)]
    pub time: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventPayload {
    pub fn new(name: impl Into<String>, time: f64) -> Self {
        Self {
            name: name.into(),
            time,
            extra: Map::new(),
        }
    }
}

/// Values available to the message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    pub event: String,
    pub filename: String,
    pub elapsed_time: String,
    pub printer_name: String,
}

impl TemplateContext {
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("event", self.event.as_str()),
            ("filename", self.filename.as_str()),
            ("elapsed_time", self.elapsed_time.as_str()),
            ("printer_name", self.printer_name.as_str()),
        ]
    }
}

/// Rendered body and normalized sender, shared by every recipient of a dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub body: String,
    pub from: String,
}

/// A recipient the provider accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: String,
    pub message_id: String,
}

/// A recipient that could not be reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// Normalized number, or the raw entry when it did not parse
    pub recipient: String,
    pub reason: String,
    pub category: &'static str,
}

/// Outcome of one send pass over the recipient list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub media_url: Option<String>,
    pub delivered: Vec<Delivery>,
    pub failed: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn new(media_url: Option<&str>) -> Self {
        Self {
            media_url: media_url.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, to: impl Into<String>, message_id: impl Into<String>) {
        self.delivered.push(Delivery {
            to: to.into(),
            message_id: message_id.into(),
        });
    }

    pub fn record_failure(&mut self, recipient: impl Into<String>, error: &AppError) {
        self.failed.push(DeliveryFailure {
            recipient: recipient.into(),
            reason: error.to_string(),
            category: error.category(),
        });
    }

    /// True when recipients were attempted and none of them got the message
    pub fn all_failed(&self) -> bool {
        self.delivered.is_empty() && !self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_kind_parsing() {
        assert_eq!(EventKind::from("PrintDone"), EventKind::PrintDone);
        assert_eq!(EventKind::from("PrintPause"), EventKind::PrintPause);
        let other = EventKind::from("PrintStarted");
        assert_eq!(other.as_str(), "PrintStarted");
        assert!(!other.is_notifiable());
        assert!(EventKind::PrintDone.is_notifiable());
    }

    #[test]
    fn test_payload_keeps_extra_fields() {
        let payload: EventPayload = serde_json::from_value(json!({
            "name": "part.gcode",
            "time": 125.7,
            "origin": "local",
            "path": "folder/part.gcode"
        }))
        .unwrap();
        assert_eq!(payload.name, "part.gcode");
        assert_eq!(payload.time, 125.7);
        assert_eq!(payload.extra.get("origin"), Some(&json!("local")));
    }

    #[test]
    fn test_payload_accepts_integer_time() {
        let payload: EventPayload = serde_json::from_value(json!({"name": "a.gcode", "time": 125})).unwrap();
        assert_eq!(payload.time, 125.0);
    }

    #[test]
    fn test_report_all_failed() {
        let mut report = DeliveryReport::new(None);
        assert!(!report.all_failed());
        report.record_failure("x", &AppError::config("bad"));
        assert!(report.all_failed());
        report.record_success("+15551234567", "SM1");
        assert!(!report.all_failed());
    }
}
