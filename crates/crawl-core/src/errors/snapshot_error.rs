//! Snapshot sink errors.

use super::error_code::{self, CrawlErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed at {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("snapshot encoding failed for {path}: {reason}")]
    Encode { path: String, reason: String },
}

impl CrawlErrorCode for SnapshotError {
    fn error_code(&self) -> &'static str {
        error_code::SNAPSHOT_ERROR
    }
}
