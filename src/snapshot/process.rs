//! Subprocess adapter
//!
//! Commands are described as data ([`CommandSpec`]) and executed by a
//! [`ProcessRunner`], so code that builds argument lists can be tested
//! without spawning anything.

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use crate::errors::{AppError, AppResult};

/// Program plus argv, passed to the OS without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Shell-quoted rendering for log lines
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| shell_quote(&part.to_string_lossy()).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote `value` for a POSIX shell when it contains anything outside a safe set
pub fn shell_quote(value: &str) -> Cow<'_, str> {
    let safe = |c: char| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c);
    if value.is_empty() {
        Cow::Borrowed("''")
    } else if value.chars().all(safe) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{}'", value.replace('\'', r"'\''")))
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a command to completion with captured output
pub trait ProcessRunner: Send + Sync {
    fn run(&self, command: &CommandSpec, timeout: Duration) -> AppResult<ProcessOutput>;
}

/// [`ProcessRunner`] backed by `tokio::process`
///
/// Each run drives the child on a current-thread runtime. When `timeout`
/// elapses the wait future is dropped and `kill_on_drop` kills the child.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &CommandSpec, timeout: Duration) -> AppResult<ProcessOutput> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::process_with_source(command.display(), e))?;

        runtime.block_on(async {
            let child = tokio::process::Command::new(&command.program)
                .args(&command.args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| AppError::process_with_source(command.display(), e))?;

            match tokio::time::timeout(timeout, child.wait_with_output()).await {
                Ok(Ok(output)) => Ok(ProcessOutput {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                }),
                Ok(Err(e)) => Err(AppError::process_with_source(command.display(), e)),
                Err(_) => Err(AppError::ProcessTimeout {
                    command: command.display(),
                    timeout_secs: timeout.as_secs(),
                }),
            }
        })
    }
}
