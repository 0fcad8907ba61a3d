//! Confirmation prompt errors.

use super::error_code::{self, CrawlErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt input closed")]
    Closed,
}

impl CrawlErrorCode for PromptError {
    fn error_code(&self) -> &'static str {
        error_code::PROMPT_ERROR
    }
}
