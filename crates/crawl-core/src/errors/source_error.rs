//! Adjacency/node source errors.

use super::error_code::{self, CrawlErrorCode};

/// Failure of a single lookup against the remote source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// Recoverable by retrying: network blip, rate limiting, server error.
    #[error("lookup of {node_id} failed: {reason}")]
    Transient { node_id: String, reason: String },

    /// Authorization/forbidden response. Retrying cannot fix it.
    #[error("lookup of {node_id} forbidden (HTTP {status}): {reason}")]
    Forbidden {
        node_id: String,
        status: u16,
        reason: String,
    },
}

impl SourceError {
    pub fn transient(node_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transient {
            node_id: node_id.into(),
            reason: reason.into(),
        }
    }

    pub fn forbidden(node_id: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self::Forbidden {
            node_id: node_id.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Whether automatic retry must be skipped.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}

impl CrawlErrorCode for SourceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Transient { .. } => error_code::SOURCE_TRANSIENT,
            Self::Forbidden { .. } => error_code::SOURCE_FORBIDDEN,
        }
    }
}
