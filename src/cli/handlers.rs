//! Command handlers for all CLI operations
//!
//! [`CommandHandler`] routes each subcommand to a focused handler in the
//! submodules.

mod config;
mod event;

use super::{CliContext, Commands};
use anyhow::Result;

pub use config::ConfigHandler;
pub use event::EventHandler;

/// Coordinates all command handling operations with dependency injection via CliContext
pub struct CommandHandler {
    context: CliContext,
}

impl CommandHandler {
    pub fn new(context: CliContext) -> Self {
        Self { context }
    }

    /// Route commands to their appropriate handlers
    pub fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Event { kind, payload, dry_run } => {
                EventHandler::new(&self.context).handle_event(&kind, payload, dry_run)
            }
            Commands::Test { event, file, elapsed } => {
                EventHandler::new(&self.context).handle_test(&event, file, elapsed)
            }
            Commands::Init { force } => ConfigHandler::new(&self.context).handle_init(force),
            Commands::Config { action } => ConfigHandler::new(&self.context).handle_config(action),
        }
    }
}
