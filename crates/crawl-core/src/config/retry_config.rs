//! Retry/backoff configuration for adjacency fetches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per fetch, including the first. Default: 11.
    pub max_attempts: Option<u32>,
    /// Delay before the first retry in milliseconds. Default: 1000.
    pub initial_backoff_ms: Option<u64>,
    /// Upper bound for any single delay in milliseconds. Default: 60000.
    pub max_backoff_ms: Option<u64>,
    /// Multiplier applied to the delay after each retry. Default: 2.0.
    pub backoff_factor: Option<f64>,
}

impl RetryConfig {
    pub fn effective_max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(defaults::DEFAULT_MAX_ATTEMPTS)
    }

    pub fn effective_initial_backoff(&self) -> Duration {
        Duration::from_millis(
            self.initial_backoff_ms
                .unwrap_or(defaults::DEFAULT_INITIAL_BACKOFF_MS),
        )
    }

    pub fn effective_max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms.unwrap_or(defaults::DEFAULT_MAX_BACKOFF_MS))
    }

    pub fn effective_backoff_factor(&self) -> f64 {
        self.backoff_factor.unwrap_or(defaults::DEFAULT_BACKOFF_FACTOR)
    }
}
