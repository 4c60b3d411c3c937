//! Error context enhancement utilities
//!
//! Attaches the file and operation being worked on to foreign errors so that
//! log lines read as "what we were doing: why it failed".

use std::path::PathBuf;
use super::types::AppError;

/// Extension trait for adding context to error types
pub trait ErrorContextExt<T> {
    /// Add operation and file context, producing an I/O error
    fn in_file_operation(
        self,
        path: impl Into<PathBuf>,
        operation: impl Into<String>
    ) -> Result<T, AppError>;
}

impl<T, E> ErrorContextExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn in_file_operation(
        self,
        path: impl Into<PathBuf>,
        operation: impl Into<String>
    ) -> Result<T, AppError> {
        self.map_err(|e| AppError::io_with_source(path, operation, e))
    }
}
