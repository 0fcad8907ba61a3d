//! Round-level terminal errors.

use super::error_code::{self, CrawlErrorCode};
use super::{ConfigError, FetchError, SnapshotError, SourceError};

/// Why a round (or the traversal around it) could not continue.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum TraversalError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Traversal cancelled")]
    Cancelled,
}

impl CrawlErrorCode for TraversalError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Fetch(e) => e.error_code(),
            Self::Source(e) => e.error_code(),
            Self::Snapshot(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
