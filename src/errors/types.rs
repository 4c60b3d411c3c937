//! Error types for the printer-sms notifier
//!
//! Errors are grouped by how the dispatcher reacts to them: configuration
//! errors abort a dispatch, external-service errors degrade to the next-best
//! delivery path, and per-recipient errors are isolated to one number.

use thiserror::Error;
use std::path::PathBuf;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid {role} phone number '{input}'")]
    InvalidPhoneNumber {
        role: PhoneRole,
        input: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Template errors
    #[error("Template syntax error at offset {offset}: {reason}")]
    TemplateSyntax {
        offset: usize,
        reason: String,
    },

    #[error("Template references unknown field '{field}'")]
    TemplateUnknownField {
        field: String,
    },

    // Messaging provider errors
    #[error("Message to '{to}' rejected: {reason}")]
    MessageRejected {
        to: String,
        reason: String,
    },

    // I/O errors
    #[error("File I/O error for '{path}': {operation}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Serialization errors
    #[error("JSON deserialization error: {context}")]
    JsonDeserialization {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Network and HTTP errors
    #[error("HTTP request failed: {method} {url}")]
    HttpRequest {
        method: String,
        url: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Network timeout for {url}")]
    NetworkTimeout {
        url: String,
    },

    #[error("HTTP {status_code}: {reason}")]
    HttpStatus {
        status_code: u16,
        reason: String,
    },

    // Process errors
    #[error("Process execution failed: {command}")]
    ProcessExecution {
        command: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Process '{command}' exited with {}: {stdout}, {stderr}", describe_exit(.exit_code))]
    ProcessFailed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Process '{command}' timed out after {timeout_secs} seconds")]
    ProcessTimeout {
        command: String,
        timeout_secs: u64,
    },

    #[error("Parse error for '{input}': {expected}")]
    Parse {
        input: String,
        expected: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code".to_string(),
    }
}

/// Which side of a message a phone number belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneRole {
    Sender,
    Recipient,
}

impl std::fmt::Display for PhoneRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhoneRole::Sender => f.write_str("sender"),
            PhoneRole::Recipient => f.write_str("recipient"),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new Config error with context
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new Config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new InvalidPhoneNumber error with the parser's reason
    pub fn invalid_phone_number(
        role: PhoneRole,
        input: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidPhoneNumber {
            role,
            input: input.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new I/O error with source
    pub fn io_with_source(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new ProcessExecution error with source
    pub fn process_with_source(
        command: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ProcessExecution {
            command: command.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error means the configuration itself is unusable.
    ///
    /// The dispatcher aborts on these instead of degrading.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::InvalidPhoneNumber { role, .. } => *role == PhoneRole::Sender,
            _ => self.category() == "config" || self.category() == "template",
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::InvalidPhoneNumber { .. } => "phone",
            Self::TemplateSyntax { .. } | Self::TemplateUnknownField { .. } => "template",
            Self::MessageRejected { .. } => "messaging",
            Self::Io { .. } => "io",
            Self::JsonDeserialization { .. } => "serialization",
            Self::HttpRequest { .. } | Self::NetworkTimeout { .. } | Self::HttpStatus { .. } => "network",
            Self::ProcessExecution { .. } | Self::ProcessFailed { .. } | Self::ProcessTimeout { .. } => "process",
            Self::Parse { .. } => "validation",
        }
    }
}

// Conversions from third-party error types
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let context = if err.is_syntax() {
            format!("JSON syntax error at line {} column {}", err.line(), err.column())
        } else if err.is_eof() {
            "Unexpected end of JSON input".to_string()
        } else {
            "JSON data error".to_string()
        };
        Self::JsonDeserialization {
            context,
            source: Some(Box::new(err)),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_else(|| "unknown".to_string());
        if err.is_timeout() {
            Self::NetworkTimeout { url }
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                status_code: status.as_u16(),
                reason: err.to_string(),
            }
        } else {
            Self::HttpRequest {
                method: "UNKNOWN".to_string(),
                url,
                source: Some(Box::new(err)),
            }
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        Self::Parse {
            input: "URL".to_string(),
            expected: "valid URL format".to_string(),
            source: Some(Box::new(err)),
        }
    }
}
