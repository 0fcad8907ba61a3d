//! Retryable adjacency fetch with exponential backoff, a permanent-failure
//! bail-out, and operator-gated retries.

use std::time::Duration;

use crawl_core::config::RetryConfig;
use crawl_core::errors::FetchError;
use crawl_core::events::{EventDispatcher, RetryEvent};
use crawl_core::traits::{AdjacencySource, ConfirmationPrompt};
use crawl_core::{Node, NodeId};

use crate::gate::ConfirmationGate;

/// Attempt ceiling and backoff curve for one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. At least 1.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay.
    pub max_backoff: Duration,
    /// Multiplier applied after each retry.
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.effective_max_attempts().max(1),
            initial_backoff: config.effective_initial_backoff(),
            max_backoff: config.effective_max_backoff(),
            factor: config.effective_backoff_factor(),
        }
    }

    /// No delay between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            factor: 1.0,
        }
    }

    /// Delay after the failed `attempt` (1-based): `initial * factor^(attempt-1)`,
    /// capped at `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        if self.initial_backoff.is_zero() {
            return Duration::ZERO;
        }
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_backoff.as_secs_f64() * self.factor.powi(exp);
        let capped = secs.min(self.max_backoff.as_secs_f64());
        if capped.is_finite() && capped > 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            self.max_backoff
        }
    }
}

/// Fetch the neighbors of `node_id`.
///
/// - `Forbidden` from the source returns `FetchError::Permanent` at once.
/// - A transient failure is logged with its attempt number. If the gate
///   confirms, a `RetryEvent` is emitted and the lookup is retried after
///   backoff; a "stop" answer returns `FetchError::Declined` with no event.
/// - Reaching `max_attempts` returns `FetchError::Exhausted`.
pub async fn fetch_with_retry<S, P>(
    source: &S,
    gate: &ConfirmationGate<P>,
    policy: &RetryPolicy,
    events: &EventDispatcher,
    node_id: &NodeId,
) -> Result<Vec<Node>, FetchError>
where
    S: AdjacencySource,
    P: ConfirmationPrompt,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;

        let failure = match source.lookup_neighbors(node_id).await {
            Ok(neighbors) => return Ok(neighbors),
            Err(e) if e.is_permanent() => {
                tracing::warn!(node_id = %node_id, attempt, error = %e, "permanent lookup failure; not retrying");
                return Err(FetchError::Permanent {
                    node_id: node_id.to_string(),
                    source: e,
                });
            }
            Err(e) => e,
        };

        if attempt >= policy.max_attempts {
            tracing::warn!(node_id = %node_id, attempts = attempt, error = %failure, "retries exhausted");
            return Err(FetchError::Exhausted {
                node_id: node_id.to_string(),
                attempts: attempt,
                source: failure,
            });
        }

        tracing::warn!(node_id = %node_id, attempt, error = %failure, "adjacency lookup failed");

        if !gate.confirm(node_id, &failure).await {
            return Err(FetchError::Declined {
                node_id: node_id.to_string(),
                attempt,
                source: failure,
            });
        }

        tracing::debug!(node_id = %node_id, attempt, "retrying adjacency lookup");
        events.emit_retry(&RetryEvent {
            node_id: node_id.clone(),
            attempt,
            error: failure.to_string(),
        });

        let delay = policy.backoff(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
