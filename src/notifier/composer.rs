//! Message composition
//!
//! Pure functions of (payload, event kind, settings); nothing here touches
//! the network or the filesystem.

use chrono::TimeDelta;

use super::phone;
use super::types::{ComposedMessage, EventKind, EventPayload, TemplateContext};
use crate::errors::{AppResult, PhoneRole};
use crate::shared::settings::NotifierSettings;
use crate::templates::MessageTemplate;

/// Format elapsed seconds as `H:MM:SS`
///
/// Hours are not wrapped into days, fractional seconds are dropped and
/// negative or non-finite input reads as zero.
pub fn format_elapsed(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        (seconds.trunc() as i64).min(i64::MAX / 1000)
    } else {
        0
    };
    let delta = TimeDelta::try_seconds(whole).unwrap_or_else(TimeDelta::zero);

    let hours = delta.num_hours();
    let minutes = delta.num_minutes() % 60;
    let secs = delta.num_seconds() % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

/// Template values for an event
pub fn template_context(
    payload: &EventPayload,
    kind: &EventKind,
    settings: &NotifierSettings,
) -> TemplateContext {
    TemplateContext {
        event: kind.to_string(),
        filename: payload.name.clone(),
        elapsed_time: format_elapsed(payload.time),
        printer_name: settings.printer_name.clone(),
    }
}

/// Build the outbound body and normalized sender
///
/// Fails on an unparseable sender or a malformed template; both mean the
/// configuration is unusable and nothing should be sent.
pub fn compose(
    payload: &EventPayload,
    kind: &EventKind,
    settings: &NotifierSettings,
) -> AppResult<ComposedMessage> {
    let context = template_context(payload, kind, settings);
    let from = phone::to_e164(&settings.from_number, PhoneRole::Sender)?;
    let body = MessageTemplate::parse(&settings.message_body)?.render(&context.fields())?;
    Ok(ComposedMessage { body, from })
}
