//! Stable error codes for log fields and process exit reporting.

/// Every error enum implements this to expose a machine-readable code.
pub trait CrawlErrorCode {
    /// Returns the error code string (e.g., "RETRY_DECLINED").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn tagged(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SOURCE_TRANSIENT: &str = "SOURCE_TRANSIENT";
pub const SOURCE_FORBIDDEN: &str = "SOURCE_FORBIDDEN";
pub const FETCH_PERMANENT: &str = "FETCH_PERMANENT";
pub const RETRY_DECLINED: &str = "RETRY_DECLINED";
pub const RETRIES_EXHAUSTED: &str = "RETRIES_EXHAUSTED";
pub const PROMPT_ERROR: &str = "PROMPT_ERROR";
pub const SNAPSHOT_ERROR: &str = "SNAPSHOT_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CANCELLED: &str = "CANCELLED";
