//! Error handling for the crawler.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod fetch_error;
pub mod prompt_error;
pub mod snapshot_error;
pub mod source_error;
pub mod traversal_error;

pub use config_error::ConfigError;
pub use error_code::CrawlErrorCode;
pub use fetch_error::FetchError;
pub use prompt_error::PromptError;
pub use snapshot_error::SnapshotError;
pub use source_error::SourceError;
pub use traversal_error::TraversalError;
