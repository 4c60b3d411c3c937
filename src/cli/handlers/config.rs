//! Configuration management handler

use super::super::{CliContext, ConfigAction};
use anyhow::Result;
use printer_sms::config::ConfigManager;

/// Handler for configuration operations
pub struct ConfigHandler<'a> {
    context: &'a CliContext,
}

impl<'a> ConfigHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    /// Write the default configuration
    ///
    /// Loading the context already creates a missing file, so an existing
    /// file is only replaced with `--force`.
    pub fn handle_init(&self, force: bool) -> Result<()> {
        let config_path = self.context.config_manager.config_path().to_path_buf();

        if force {
            let mut config_manager = ConfigManager::new(Some(config_path.clone()))?;
            config_manager.reset()?;
            println!("Configuration reset to defaults at: {}", config_path.display());
        } else {
            println!("Configuration initialized at: {}", config_path.display());
            println!("Use --force to overwrite it with defaults");
        }

        Ok(())
    }

    pub fn handle_config(&self, action: ConfigAction) -> Result<()> {
        let config_manager = &self.context.config_manager;

        match action {
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(config_manager.config())?);
            }
            ConfigAction::Path => {
                println!("{}", config_manager.config_path().display());
            }
        }

        Ok(())
    }
}
