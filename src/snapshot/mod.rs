//! Snapshot pipeline: acquire a webcam frame, orient it, hand it to a publisher
//!
//! Each stage sits behind a trait so the dispatcher can be exercised with
//! fakes and the ffmpeg argument construction can be tested without a binary.

pub mod acquirer;
pub mod process;
pub mod transformer;

pub use acquirer::{HttpSnapshotSource, SnapshotArtifact, SnapshotSource};
pub use process::{CommandSpec, ProcessOutput, ProcessRunner, SystemProcessRunner};
pub use transformer::{FfmpegTransformer, SkipReason, SnapshotTransformer, TransformOutcome};
