//! Fetch webcam snapshots into temporary files

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::debug;
use url::Url;

use crate::errors::{AppError, AppResult, ErrorContextExt};

/// Suffix given to every snapshot; ffmpeg picks its demuxer from it
pub const SNAPSHOT_SUFFIX: &str = ".jpg";

/// Content type the snapshot file is declared as
pub const SNAPSHOT_CONTENT_TYPE: &str = "image/jpeg";

/// Source of camera frames
pub trait SnapshotSource: Send + Sync {
    fn acquire(&self, url: &str) -> AppResult<SnapshotArtifact>;
}

/// A captured frame on local disk, removed when dropped
#[derive(Debug)]
pub struct SnapshotArtifact {
    file: NamedTempFile,
}

impl SnapshotArtifact {
    /// Write `bytes` to a new uniquely named `.jpg` file in the system temp directory
    ///
    /// The bytes are stored as-is and are always declared as
    /// [`SNAPSHOT_CONTENT_TYPE`] when published.
    pub fn materialize(bytes: &[u8]) -> AppResult<Self> {
        Self::materialize_in(bytes, &std::env::temp_dir())
    }

    pub fn materialize_in(bytes: &[u8], dir: &Path) -> AppResult<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("snapshot-")
            .suffix(SNAPSHOT_SUFFIX)
            .tempfile_in(dir)
            .in_file_operation(dir, "create snapshot file")?;

        let path = file.path().to_path_buf();
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .in_file_operation(path, "write snapshot")?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Downloads snapshots over HTTP
pub struct HttpSnapshotSource {
    client: Client,
}

impl HttpSnapshotSource {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config_with_source("Failed to create HTTP client", e))?;
        Ok(Self { client })
    }
}

impl SnapshotSource for HttpSnapshotSource {
    fn acquire(&self, url: &str) -> AppResult<SnapshotArtifact> {
        let url = Url::parse(url)?;
        let response = self.client.get(url.clone()).send()?.error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("no content type")
            .to_string();
        let bytes = response.bytes()?;
        debug!("Fetched {} bytes from {} ({})", bytes.len(), url, content_type);

        SnapshotArtifact::materialize(&bytes)
    }
}
