//! Per-round fetch context.

use std::sync::Arc;

use crawl_core::errors::FetchError;
use crawl_core::events::EventDispatcher;
use crawl_core::traits::{AdjacencySource, ConfirmationPrompt};
use crawl_core::Node;

use crate::fetch::{fetch_with_retry, RetryPolicy};
use crate::gate::ConfirmationGate;
use crate::mapper::try_map_bounded;

/// Everything a round's concurrent fetches share: the source, the gate for
/// this round, the retry policy, and the event sink. Built by the engine at
/// the start of each round and dropped when the round's fetches resolve.
pub struct RoundContext<'r, S, P> {
    /// 1-based number of the round being expanded.
    pub iteration: u64,
    pub source: &'r S,
    pub gate: &'r ConfirmationGate<P>,
    pub policy: &'r RetryPolicy,
    pub events: &'r EventDispatcher,
}

impl<'r, S, P> RoundContext<'r, S, P>
where
    S: AdjacencySource,
    P: ConfirmationPrompt,
{
    /// Fetch the neighbors of one frontier node.
    pub async fn fetch(&self, node: Arc<Node>) -> Result<(Arc<Node>, Vec<Node>), FetchError> {
        let neighbors =
            fetch_with_retry(self.source, self.gate, self.policy, self.events, &node.id).await?;
        Ok((node, neighbors))
    }

    /// Fetch every node of `frontier`, at most `concurrency` at a time.
    /// Output pairs follow `frontier` order.
    pub async fn fetch_all(
        &self,
        frontier: &[Arc<Node>],
        concurrency: usize,
    ) -> Result<Vec<(Arc<Node>, Vec<Node>)>, FetchError> {
        let ctx = self;
        try_map_bounded(frontier.iter().cloned(), concurrency, move |node| ctx.fetch(node)).await
    }
}
