//! Command definitions and structures for the CLI
//!
//! All clap-based argument definitions: the top-level [`Cli`] and its
//! subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "printer-sms")]
#[command(about = "SMS/MMS notifications for 3D-print events")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, global = true, env = "PRINTER_SMS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Handle a print event from the host
    Event {
        /// Event kind (PrintDone, PrintPause, ...)
        kind: String,

        /// Event payload as JSON; read from stdin when omitted
        #[arg(short, long)]
        payload: Option<String>,

        /// Show what would be sent without contacting any service
        #[arg(long)]
        dry_run: bool,
    },

    /// Send a notification for a synthetic event, ignoring the enabled and per-event toggles
    Test {
        /// Event kind to report
        #[arg(short, long, default_value = "PrintDone")]
        event: String,

        /// File name to report
        #[arg(short, long, default_value = "test.gcode")]
        file: String,

        /// Elapsed print time in seconds
        #[arg(long, default_value_t = 0.0)]
        elapsed: f64,
    },

    /// Write the default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,
}
