//! Print event and test notification handler

use super::super::CliContext;
use anyhow::{Context, Result};
use printer_sms::notifier::{create_default_dispatcher, DeliveryReport, DispatchPreview, EventPayload};
use std::io::{self, IsTerminal, Read};
use tracing::debug;

/// Handler for event dispatch and test sends
pub struct EventHandler<'a> {
    context: &'a CliContext,
}

impl<'a> EventHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    /// Dispatch an event delivered by the host
    pub fn handle_event(&self, kind: &str, payload: Option<String>, dry_run: bool) -> Result<()> {
        let raw = match payload {
            Some(raw) => raw,
            None => read_stdin()?,
        };
        let payload = parse_payload(&raw)?;
        debug!("Handling {} event: {:?}", kind, payload);

        let dispatcher = create_default_dispatcher(self.context.config_manager.config().clone())?;

        if dry_run {
            print_preview(&dispatcher.preview(kind, &payload)?);
            return Ok(());
        }

        match dispatcher.dispatch(kind, &payload)? {
            Some(report) => print_report(&report),
            None => println!("Event {kind} ignored"),
        }
        Ok(())
    }

    /// Send a synthetic event straight through the delivery pipeline
    pub fn handle_test(&self, kind: &str, file: String, elapsed: f64) -> Result<()> {
        let dispatcher = create_default_dispatcher(self.context.config_manager.config().clone())?;
        let report = dispatcher.notify_now(kind, &EventPayload::new(file, elapsed))?;
        print_report(&report);

        if report.delivered.is_empty() {
            anyhow::bail!("Test notification was not delivered to any recipient");
        }
        Ok(())
    }
}

fn read_stdin() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .context("Failed to read event payload from stdin")?;
    Ok(buffer)
}

/// Parse a JSON payload; blank input is an empty payload
fn parse_payload(raw: &str) -> Result<EventPayload> {
    if raw.trim().is_empty() {
        return Ok(EventPayload::default());
    }
    serde_json::from_str(raw).context("Failed to parse event payload as JSON")
}

fn print_preview(preview: &DispatchPreview) {
    println!("Dry run - would send notification:");
    println!("Event: {}", preview.event);
    match preview.skipped {
        Some(reason) => println!("Decision: skip ({reason:?})"),
        None => println!("Decision: send"),
    }
    println!("From: {}", preview.from);
    println!("Recipients: {}", preview.recipients.join(", "));
    if !preview.invalid_recipients.is_empty() {
        println!("Invalid recipients: {}", preview.invalid_recipients.join(", "));
    }
    println!("Snapshot: {}", if preview.send_image { "yes" } else { "no" });
    println!("Body: {}", preview.body);
}

fn print_report(report: &DeliveryReport) {
    for delivery in &report.delivered {
        println!("Sent to {} ({})", delivery.to, delivery.message_id);
    }
    for failure in &report.failed {
        println!("Failed for {} [{}]: {}", failure.recipient, failure.category, failure.reason);
    }
    if let Some(url) = &report.media_url {
        println!("Media: {url}");
    }
}
