use crate::errors::{AppError, AppResult};
use directories::BaseDirs;
use std::fs;
use std::path::{Path, PathBuf};

// Re-export shared types for convenience
pub use crate::shared::config::{Config, LoggingConfig, NotifierConfig, ServicesConfig, WebcamConfig};

/// Configuration manager for the printer SMS notifier
///
/// Loads `config.toml` from an explicit path or from
/// `<config dir>/printer-sms/config.toml`, creating it with defaults when it
/// does not exist yet.
///
/// # Example
///
/// ```rust,no_run
/// use printer_sms::config::ConfigManager;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config_manager = ConfigManager::new(None)?;
///     let notifier = &config_manager.config().sms_notifier;
///     println!("Notifications enabled: {}", notifier.enabled);
///     Ok(())
/// }
/// ```
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Creates a new ConfigManager instance
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The configuration directory cannot be created
    /// - The configuration file cannot be read or parsed
    /// - Default configuration cannot be serialized and written
    pub fn new(config_path: Option<PathBuf>) -> AppResult<Self> {
        let config_path = Self::resolve_config_path(config_path)?;
        let config = Self::load_or_create(&config_path)?;
        Ok(ConfigManager {
            config_path,
            config,
        })
    }

    /// Resolve the configuration file location without loading it
    pub fn resolve_config_path(config_path: Option<PathBuf>) -> AppResult<PathBuf> {
        match config_path {
            Some(path) => Ok(path),
            None => {
                let base_dirs = BaseDirs::new().ok_or_else(|| AppError::config("Failed to get base directories"))?;
                Ok(base_dirs.config_dir().join("printer-sms").join("config.toml"))
            }
        }
    }

    fn load_or_create(path: &Path) -> AppResult<Config> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| AppError::io_with_source(path, "read config file", e))?;
            toml::from_str(&content)
                .map_err(|e| AppError::config_with_source("Failed to parse config file", e))
        } else {
            let config = Config::default();
            Self::write(path, &config)?;
            Ok(config)
        }
    }

    fn write(path: &Path, config: &Config) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::io_with_source(parent, "create config directory", e))?;
        }
        let content = toml::to_string_pretty(config)
            .map_err(|e| AppError::config_with_source("Failed to serialize config", e))?;
        fs::write(path, content)
            .map_err(|e| AppError::io_with_source(path, "write config file", e))
    }

    /// Saves the current configuration to disk
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or written.
    pub fn save(&self) -> AppResult<()> {
        Self::write(&self.config_path, &self.config)
    }

    /// Replace the configuration with defaults and persist it
    pub fn reset(&mut self) -> AppResult<()> {
        self.config = Config::default();
        self.save()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}
