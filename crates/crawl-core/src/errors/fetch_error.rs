//! Terminal outcomes of a retryable fetch.

use super::error_code::{self, CrawlErrorCode};
use super::source_error::SourceError;

/// A fetch that could not produce neighbors. Every variant ends the round.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The source reported a permanent failure; no retry was attempted.
    #[error("permanent failure fetching {node_id}: {source}")]
    Permanent {
        node_id: String,
        #[source]
        source: SourceError,
    },

    /// The confirmation gate answered "stop" after a transient failure.
    #[error("retry declined for {node_id} after attempt {attempt}: {source}")]
    Declined {
        node_id: String,
        attempt: u32,
        #[source]
        source: SourceError,
    },

    /// The attempt ceiling was reached without a success.
    #[error("retries exhausted for {node_id} after {attempts} attempts: {source}")]
    Exhausted {
        node_id: String,
        attempts: u32,
        #[source]
        source: SourceError,
    },
}

impl FetchError {
    pub fn node_id(&self) -> &str {
        match self {
            Self::Permanent { node_id, .. }
            | Self::Declined { node_id, .. }
            | Self::Exhausted { node_id, .. } => node_id,
        }
    }

    /// The last underlying source failure.
    pub fn last_failure(&self) -> &SourceError {
        match self {
            Self::Permanent { source, .. }
            | Self::Declined { source, .. }
            | Self::Exhausted { source, .. } => source,
        }
    }
}

impl CrawlErrorCode for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Permanent { .. } => error_code::FETCH_PERMANENT,
            Self::Declined { .. } => error_code::RETRY_DECLINED,
            Self::Exhausted { .. } => error_code::RETRIES_EXHAUSTED,
        }
    }
}
