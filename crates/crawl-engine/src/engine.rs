//! FrontierEngine: round orchestration, merge, and termination.

use std::sync::Arc;

use crawl_core::config::{CrawlConfig, GatePolicy};
use crawl_core::errors::{CrawlErrorCode, TraversalError};
use crawl_core::events::{EventDispatcher, RoundCompleteEvent, TraversalStoppedEvent};
use crawl_core::traits::{AdjacencySource, Cancellable, CancellationToken, ConfirmationPrompt};
use crawl_core::{EdgeList, Node, RoundState, Visit, VisitedSet};

use crate::fetch::RetryPolicy;
use crate::gate::ConfirmationGate;
use crate::round::RoundContext;

/// Engine tuning resolved from configuration.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Maximum fetches in flight per round.
    pub concurrency: usize,
    /// Stop after this many rounds. `None` runs until the frontier is empty.
    pub max_iterations: Option<u64>,
    pub gate_policy: GatePolicy,
    pub retry: RetryPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&CrawlConfig::default())
    }
}

impl EngineSettings {
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            concurrency: config.traversal.effective_concurrency().max(1),
            max_iterations: config.traversal.max_iterations,
            gate_policy: config.traversal.effective_gate_policy(),
            retry: RetryPolicy::from_config(&config.retry),
        }
    }
}

/// Why a traversal stopped.
#[derive(Debug)]
pub enum StopReason {
    /// The last round discovered no new nodes.
    FrontierExhausted,
    /// The configured iteration ceiling was reached.
    IterationCeiling,
    /// Cancellation was requested between rounds.
    Cancelled,
    /// A round (or the round observer) failed; its partial results were discarded.
    Failed(TraversalError),
}

impl StopReason {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::FrontierExhausted)
    }

    pub fn error(&self) -> Option<&TraversalError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::FrontierExhausted => "frontier exhausted".to_string(),
            Self::IterationCeiling => "iteration ceiling reached".to_string(),
            Self::Cancelled => "cancelled".to_string(),
            Self::Failed(e) => e.to_string(),
        }
    }
}

/// Outcome of [`FrontierEngine::run`].
#[derive(Debug)]
pub struct TraversalReport {
    pub stop_reason: StopReason,
    /// State through the last fully merged round.
    pub final_state: RoundState,
}

/// Breadth-first expansion engine.
///
/// Owns the visited set, edge list and frontier exclusively. They change only
/// in the merge step after a round's fetches have all resolved, so a failed
/// round leaves them exactly as the previous round produced them.
pub struct FrontierEngine<S, P> {
    source: S,
    prompt: Arc<P>,
    settings: EngineSettings,
    events: EventDispatcher,
    cancel: CancellationToken,
    visited: VisitedSet,
    edges: EdgeList,
    frontier: Vec<Arc<Node>>,
    iteration: u64,
    request_count: u64,
    /// Shared across rounds under `GatePolicy::WholeTraversal`.
    traversal_gate: Option<ConfirmationGate<P>>,
}

impl<S, P> FrontierEngine<S, P>
where
    S: AdjacencySource,
    P: ConfirmationPrompt,
{
    /// Initialize: visited = {start}, frontier = [start], no edges, counters at zero.
    pub fn new(source: S, prompt: P, start: Node, settings: EngineSettings) -> Self {
        let start = Arc::new(start);
        Self {
            source,
            prompt: Arc::new(prompt),
            settings,
            events: EventDispatcher::new(),
            cancel: CancellationToken::new(),
            visited: VisitedSet::seeded(Arc::clone(&start)),
            edges: EdgeList::new(),
            frontier: vec![start],
            iteration: 0,
            request_count: 0,
            traversal_gate: None,
        }
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn edges(&self) -> &EdgeList {
        &self.edges
    }

    /// Nodes the next round will expand.
    pub fn frontier(&self) -> &[Arc<Node>] {
        &self.frontier
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The confirmation gate kept for the whole traversal, if that policy is
    /// active and a round has run.
    pub fn traversal_gate(&self) -> Option<&ConfirmationGate<P>> {
        self.traversal_gate.as_ref()
    }

    /// Independent copy of the merged state.
    pub fn snapshot(&self) -> RoundState {
        RoundState {
            iteration: self.iteration,
            request_count: self.request_count,
            visited: self.visited.clone(),
            edges: self.edges.clone(),
        }
    }

    /// The reason no further round would run, if any. Cancellation is not
    /// considered here.
    fn finished(&self) -> Option<StopReason> {
        if self.frontier.is_empty() {
            return Some(StopReason::FrontierExhausted);
        }
        match self.settings.max_iterations {
            Some(max) if self.iteration >= max => Some(StopReason::IterationCeiling),
            _ => None,
        }
    }

    /// Expand one round.
    ///
    /// Returns `Ok(None)` once the frontier is empty or the iteration ceiling
    /// is reached. On error nothing from the failed round is merged and the
    /// frontier is restored, so the state is still that of the last
    /// successful round.
    pub async fn expand_round(&mut self) -> Result<Option<RoundState>, TraversalError> {
        if self.finished().is_some() {
            return Ok(None);
        }
        if self.cancel.is_cancelled() {
            return Err(TraversalError::Cancelled);
        }

        let current = std::mem::take(&mut self.frontier);
        let fetched = {
            let round_gate;
            let gate = match self.settings.gate_policy {
                GatePolicy::PerRound => {
                    round_gate = ConfirmationGate::new(
                        Arc::clone(&self.prompt),
                        current.len(),
                        self.events.clone(),
                    );
                    &round_gate
                }
                GatePolicy::WholeTraversal => {
                    let prompt = &self.prompt;
                    let capacity = self.settings.concurrency;
                    let events = &self.events;
                    &*self.traversal_gate.get_or_insert_with(|| {
                        ConfirmationGate::new(Arc::clone(prompt), capacity, events.clone())
                    })
                }
            };

            let ctx = RoundContext {
                iteration: self.iteration + 1,
                source: &self.source,
                gate,
                policy: &self.settings.retry,
                events: &self.events,
            };
            tracing::debug!(
                iteration = ctx.iteration,
                frontier = current.len(),
                "expanding round"
            );
            ctx.fetch_all(&current, self.settings.concurrency).await
        };

        let fetched = match fetched {
            Ok(pairs) => pairs,
            Err(e) => {
                self.frontier = current;
                return Err(e.into());
            }
        };

        let mut next = Vec::new();
        for (node, neighbors) in fetched {
            for neighbor in neighbors {
                match self.visited.visit(Arc::new(neighbor)) {
                    Visit::New(discovered) => {
                        self.edges.push(Arc::clone(&node), Arc::clone(&discovered));
                        next.push(discovered);
                    }
                    Visit::Seen(canonical) => {
                        self.edges.push(Arc::clone(&node), canonical);
                    }
                }
            }
        }

        self.iteration += 1;
        self.request_count += current.len() as u64;
        self.frontier = next;

        tracing::info!(
            iteration = self.iteration,
            request_count = self.request_count,
            visited = self.visited.len(),
            edges = self.edges.len(),
            frontier = self.frontier.len(),
            "round complete"
        );
        self.events.emit_round_complete(&RoundCompleteEvent {
            iteration: self.iteration,
            request_count: self.request_count,
            visited: self.visited.len(),
            edges: self.edges.len(),
            frontier: self.frontier.len(),
        });

        Ok(Some(self.snapshot()))
    }

    /// Run rounds until the frontier is exhausted, the ceiling is reached,
    /// cancellation is requested, or a round fails.
    ///
    /// `on_round` receives each round's checkpoint; an error from it stops the
    /// traversal like a round failure. Errors never escape: they become
    /// `StopReason::Failed` and the report still carries the merged state.
    pub async fn run<F>(&mut self, mut on_round: F) -> TraversalReport
    where
        F: FnMut(&RoundState) -> Result<(), TraversalError>,
    {
        let stop_reason = loop {
            if let Some(reason) = self.finished() {
                break reason;
            }
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            match self.expand_round().await {
                Ok(Some(state)) => {
                    if let Err(e) = on_round(&state) {
                        break StopReason::Failed(e);
                    }
                }
                Ok(None) => continue,
                Err(TraversalError::Cancelled) => break StopReason::Cancelled,
                Err(e) => break StopReason::Failed(e),
            }
        };

        let error_code = stop_reason.error().map(|e| e.error_code());
        match stop_reason.error() {
            Some(e) => tracing::warn!(
                iteration = self.iteration,
                error_code = e.error_code(),
                error = %e,
                "traversal stopped early; keeping results through the last complete round"
            ),
            None => tracing::info!(
                iteration = self.iteration,
                reason = %stop_reason.describe(),
                "traversal stopped"
            ),
        }
        self.events.emit_traversal_stopped(&TraversalStoppedEvent {
            iteration: self.iteration,
            reason: stop_reason.describe(),
            error_code,
        });

        TraversalReport {
            stop_reason,
            final_state: self.snapshot(),
        }
    }
}
