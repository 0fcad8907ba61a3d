//! Errors raised while resolving `CrawlConfig` or building collaborators from it.

use super::error_code::{self, CrawlErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly named config file is missing or unreadable.
    #[error("cannot read config file {path}")]
    FileNotFound { path: String },

    #[error("cannot parse {path}: {message}")]
    ParseError { path: String, message: String },

    /// A resolved value is out of range, e.g. `traversal.concurrency = 0`.
    #[error("{field} {message}")]
    ValidationFailed { field: String, message: String },

    /// A raw value (usually a `CRAWL_*` variable) does not parse.
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// The HTTP client could not be built from the `[source]` section.
    #[error("cannot build HTTP client: {message}")]
    ClientSetup { message: String },
}

impl ConfigError {
    /// The config key or environment variable at fault, if there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationFailed { field, .. } | Self::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl CrawlErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
