//! Bounded concurrent mapper.

use std::future::Future;

use futures::stream::{self, StreamExt};

/// Run `op` over `inputs` with at most `limit` futures in flight and collect
/// the outputs in input order.
///
/// Every future is driven to completion before the call returns; if any
/// failed, the first failure in input order is returned and the successful
/// outputs are discarded.
pub async fn try_map_bounded<I, F, Fut, T, E>(inputs: I, limit: usize, op: F) -> Result<Vec<T>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let outcomes: Vec<Result<T, E>> = stream::iter(inputs)
        .map(op)
        .buffered(limit.max(1))
        .collect()
        .await;

    let failures = outcomes.iter().filter(|r| r.is_err()).count();
    if failures > 1 {
        tracing::debug!(failures, "multiple operations failed in one batch");
    }
    outcomes.into_iter().collect()
}
