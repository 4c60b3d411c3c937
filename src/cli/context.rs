//! CLI Context for dependency injection and shared state
//!
//! Centralizes configuration loading and logging setup so handlers only
//! deal with their own command.

use anyhow::Result;
use printer_sms::config::ConfigManager;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// CLI execution context containing shared dependencies and configuration
#[derive(Clone)]
pub struct CliContext {
    pub verbose: bool,
    pub config_manager: Arc<ConfigManager>,
}

impl CliContext {
    /// Load (or create) the configuration at `config_path`, or the default location
    pub fn new(config_path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let config_manager = Arc::new(ConfigManager::new(config_path)?);
        Ok(Self {
            verbose,
            config_manager,
        })
    }

    /// Initialize logging from `[logging]`, or at debug level with `--verbose`
    ///
    /// Console output goes to stderr. When `log_path` is set a daily rolling
    /// file is written as well; the returned guard must outlive the command.
    pub fn init_logging(&self) -> Result<Option<WorkerGuard>> {
        let logging = &self.config_manager.config().logging;
        let log_level = if self.verbose { "debug" } else { logging.log_level.as_str() };

        let env_filter = EnvFilter::from_default_env()
            .add_directive(log_level.parse().unwrap_or_else(|_| tracing::Level::INFO.into()));
        let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        let guard = match &logging.log_path {
            Some(log_path) => {
                let file_appender = tracing_appender::rolling::daily(
                    log_path.parent().unwrap_or_else(|| Path::new(".")),
                    log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("printer-sms.log")),
                );
                let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(console_layer)
                    .with(file_layer)
                    .try_init()?;
                Some(guard)
            }
            None => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(console_layer)
                    .try_init()?;
                None
            }
        };

        if self.verbose {
            tracing::debug!("Verbose logging enabled");
            tracing::debug!("Config path: {:?}", self.config_manager.config_path());
        }

        Ok(guard)
    }
}
