//! Rotate/flip snapshots in place with ffmpeg

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::process::{CommandSpec, ProcessRunner, SystemProcessRunner};
use crate::errors::{AppError, AppResult};
use crate::shared::settings::WebcamSettings;

/// Pixel format forced ahead of the other filters; ffmpeg rejects some
/// webcam JPEGs (yuvj422p) in the transpose filter otherwise.
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";

/// Applies the configured webcam orientation to a snapshot file
pub trait SnapshotTransformer: Send + Sync {
    /// Rewrite the file at `path` in place
    fn transform(&self, path: &Path, webcam: &WebcamSettings) -> AppResult<TransformOutcome>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Applied,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No rotate/flip flag is set
    NothingToDo,
    /// No ffmpeg path configured
    NoExecutable,
    /// The configured path is not an executable file
    NotExecutable(PathBuf),
}

/// The `-vf` filter graph for the webcam flags, or `None` when no flag is set
pub fn filter_chain(webcam: &WebcamSettings) -> Option<String> {
    if !webcam.wants_transform() {
        return None;
    }

    let mut filters = vec![format!("format={DEFAULT_PIXEL_FORMAT}")];
    if webcam.rotate_90 {
        filters.push("transpose=2".to_string()); // 90 degrees counter-clockwise
    }
    if webcam.flip_h {
        filters.push("hflip".to_string());
    }
    if webcam.flip_v {
        filters.push("vflip".to_string());
    }
    Some(filters.join(","))
}

/// `ffmpeg -y -i <path> -vf <filters> <path>`
pub fn build_command(ffmpeg: &Path, path: &Path, filters: &str) -> CommandSpec {
    CommandSpec::new(ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(path.as_os_str())
        .arg("-vf")
        .arg(OsString::from(filters))
        .arg(path.as_os_str())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// ffmpeg-backed [`SnapshotTransformer`]
pub struct FfmpegTransformer {
    runner: Arc<dyn ProcessRunner>,
    timeout: Duration,
}

impl FfmpegTransformer {
    pub fn new(runner: Arc<dyn ProcessRunner>, timeout: Duration) -> Self {
        Self {
            runner,
            timeout,
        }
    }

    pub fn with_system_runner(timeout: Duration) -> Self {
        Self::new(Arc::new(SystemProcessRunner), timeout)
    }
}

impl SnapshotTransformer for FfmpegTransformer {
    fn transform(&self, path: &Path, webcam: &WebcamSettings) -> AppResult<TransformOutcome> {
        let Some(filters) = filter_chain(webcam) else {
            return Ok(TransformOutcome::Skipped(SkipReason::NothingToDo));
        };
        let Some(ffmpeg) = webcam.ffmpeg.as_deref() else {
            return Ok(TransformOutcome::Skipped(SkipReason::NoExecutable));
        };
        if !is_executable(ffmpeg) {
            debug!("ffmpeg path {} is not executable", ffmpeg.display());
            return Ok(TransformOutcome::Skipped(SkipReason::NotExecutable(ffmpeg.to_path_buf())));
        }

        let command = build_command(ffmpeg, path, &filters);
        info!("Running: {}", command.display());

        let output = self.runner.run(&command, self.timeout)?;
        if output.success() {
            Ok(TransformOutcome::Applied)
        } else {
            Err(AppError::ProcessFailed {
                command: command.display(),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::process::ProcessOutput;
    use std::sync::Mutex;

    struct RecordingRunner {
        exit_code: Option<i32>,
        calls: Mutex<Vec<CommandSpec>>,
    }

    impl RecordingRunner {
        fn new(exit_code: Option<i32>) -> Arc<Self> {
            Arc::new(Self { exit_code, calls: Mutex::new(Vec::new()) })
        }
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&self, command: &CommandSpec, _timeout: Duration) -> AppResult<ProcessOutput> {
            self.calls.lock().unwrap().push(command.clone());
            Ok(ProcessOutput {
                exit_code: self.exit_code,
                stdout: String::new(),
                stderr: "Invalid filter".to_string(),
            })
        }
    }

    fn webcam(rotate: bool, h: bool, v: bool, ffmpeg: Option<PathBuf>) -> WebcamSettings {
        WebcamSettings {
            snapshot_url: None,
            ffmpeg,
            flip_h: h,
            flip_v: v,
            rotate_90: rotate,
        }
    }

    #[cfg(unix)]
    fn fake_ffmpeg(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("ffmpeg");
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_filter_chain_order() {
        assert_eq!(
            filter_chain(&webcam(true, true, true, None)).as_deref(),
            Some("format=yuv420p,transpose=2,hflip,vflip")
        );
        assert_eq!(
            filter_chain(&webcam(false, false, true, None)).as_deref(),
            Some("format=yuv420p,vflip")
        );
        assert_eq!(filter_chain(&webcam(false, false, false, None)), None);
    }

    #[test]
    fn test_build_command_writes_in_place() {
        let command = build_command(Path::new("/usr/bin/ffmpeg"), Path::new("/tmp/s.jpg"), "format=yuv420p,hflip");
        let args: Vec<_> = command.args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["-y", "-i", "/tmp/s.jpg", "-vf", "format=yuv420p,hflip", "/tmp/s.jpg"]);
    }

    #[test]
    fn test_no_flags_never_invokes_runner() {
        let runner = RecordingRunner::new(Some(0));
        let transformer = FfmpegTransformer::new(runner.clone(), Duration::from_secs(1));
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("snap.jpg");
        std::fs::write(&file, b"\xff\xd8jpeg").unwrap();

        let outcome = transformer
            .transform(&file, &webcam(false, false, false, Some(PathBuf::from("/bin/sh"))))
            .unwrap();

        assert_eq!(outcome, TransformOutcome::Skipped(SkipReason::NothingToDo));
        assert!(runner.calls.lock().unwrap().is_empty());
        assert_eq!(std::fs::read(&file).unwrap(), b"\xff\xd8jpeg");
    }

    #[test]
    fn test_missing_or_non_executable_ffmpeg_skips() {
        let runner = RecordingRunner::new(Some(0));
        let transformer = FfmpegTransformer::new(runner.clone(), Duration::from_secs(1));
        let dir = tempfile::TempDir::new().unwrap();
        let not_exec = dir.path().join("ffmpeg.txt");
        std::fs::write(&not_exec, "text").unwrap();

        let outcome = transformer.transform(Path::new("/tmp/s.jpg"), &webcam(true, false, false, None)).unwrap();
        assert_eq!(outcome, TransformOutcome::Skipped(SkipReason::NoExecutable));

        let outcome = transformer
            .transform(Path::new("/tmp/s.jpg"), &webcam(true, false, false, Some(not_exec.clone())))
            .unwrap();
        assert_eq!(outcome, TransformOutcome::Skipped(SkipReason::NotExecutable(not_exec)));
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_ffmpeg_when_flags_set() {
        let dir = tempfile::TempDir::new().unwrap();
        let ffmpeg = fake_ffmpeg(dir.path());
        let runner = RecordingRunner::new(Some(0));
        let transformer = FfmpegTransformer::new(runner.clone(), Duration::from_secs(1));

        let outcome = transformer
            .transform(Path::new("/tmp/s.jpg"), &webcam(true, true, false, Some(ffmpeg.clone())))
            .unwrap();

        assert_eq!(outcome, TransformOutcome::Applied);
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, ffmpeg);
        assert_eq!(calls[0].args[4], OsString::from("format=yuv420p,transpose=2,hflip"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_reported_with_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let ffmpeg = fake_ffmpeg(dir.path());
        let transformer = FfmpegTransformer::new(RecordingRunner::new(Some(1)), Duration::from_secs(1));

        let err = transformer
            .transform(Path::new("/tmp/s.jpg"), &webcam(false, false, true, Some(ffmpeg)))
            .unwrap_err();

        match err {
            AppError::ProcessFailed { exit_code, stderr, command, .. } => {
                assert_eq!(exit_code, Some(1));
                assert_eq!(stderr, "Invalid filter");
                assert!(command.contains("format=yuv420p,vflip"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
