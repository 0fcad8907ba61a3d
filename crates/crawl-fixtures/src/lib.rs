//! Scripted collaborators for engine and CLI tests.
//!
//! - [`ScriptedSource`]: an in-memory graph with per-node queued failures,
//!   optional latency, call log and in-flight accounting.
//! - [`ScriptedPrompt`]: queued answers, optional latency, call counter.
//! - [`RecordingSink`]: keeps every snapshot as plain id rows.
//! - [`RecordingHandler`]: keeps every event.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crawl_core::errors::{PromptError, SnapshotError, SourceError};
use crawl_core::events::*;
use crawl_core::traits::{AdjacencySource, ConfirmationPrompt, NodeSource, SnapshotSink};
use crawl_core::{EdgeList, Node, NodeId, VisitedSet};

/// Node whose label is its id in upper case.
pub fn node(id: &str) -> Node {
    Node::new(id, id.to_uppercase())
}

// ─── Source ────────────────────────────────────────────────

#[derive(Default)]
pub struct ScriptedSource {
    graph: HashMap<String, Vec<Node>>,
    failures: Mutex<HashMap<String, VecDeque<SourceError>>>,
    calls: Mutex<Vec<String>>,
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    /// Build from adjacency lists; nodes without an entry have no neighbors.
    pub fn from_adjacency(adjacency: &[(&str, &[&str])]) -> Self {
        let graph = adjacency
            .iter()
            .map(|(id, neighbors)| (id.to_string(), neighbors.iter().map(|n| node(n)).collect()))
            .collect();
        Self {
            graph,
            ..Default::default()
        }
    }

    /// Every lookup sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue failures returned (in order) by the next lookups of `id`.
    pub fn fail(self, id: &str, errors: impl IntoIterator<Item = SourceError>) -> Self {
        self.lock_failures()
            .entry(id.to_string())
            .or_default()
            .extend(errors);
        self
    }

    /// Queue `times` transient failures for `id`.
    pub fn fail_transient(self, id: &str, times: usize) -> Self {
        let errors = (0..times).map(|i| SourceError::transient(id, format!("HTTP 503 (#{i})")));
        self.fail(id, errors.collect::<Vec<_>>())
    }

    /// Queue one forbidden failure for `id`.
    pub fn fail_forbidden(self, id: &str) -> Self {
        self.fail(id, [SourceError::forbidden(id, 403, "quota exceeded")])
    }

    /// Ids looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, id: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == id).count()
    }

    /// Highest number of lookups observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn lock_failures(&self) -> std::sync::MutexGuard<'_, HashMap<String, VecDeque<SourceError>>> {
        self.failures.lock().unwrap()
    }
}

impl AdjacencySource for ScriptedSource {
    async fn lookup_neighbors(&self, node_id: &NodeId) -> Result<Vec<Node>, SourceError> {
        self.calls.lock().unwrap().push(node_id.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        } else {
            tokio::task::yield_now().await;
        }

        let queued = self
            .lock_failures()
            .get_mut(node_id.as_str())
            .and_then(VecDeque::pop_front);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match queued {
            Some(err) => Err(err),
            None => Ok(self.graph.get(node_id.as_str()).cloned().unwrap_or_default()),
        }
    }
}

impl NodeSource for ScriptedSource {
    async fn lookup_node(&self, node_id: &NodeId) -> Result<Node, SourceError> {
        Ok(node(node_id.as_str()))
    }
}

// ─── Prompt ────────────────────────────────────────────────

pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<String>>,
    fallback: Option<String>,
    latency: Duration,
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    /// Always answers `answer`.
    pub fn always(answer: &str) -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            fallback: Some(answer.to_string()),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
        }
    }

    /// Answers from the queue, then reports the input as closed.
    pub fn answers(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            fallback: None,
            ..Self::always("")
        }
    }

    /// Fails if ever asked.
    pub fn never() -> Self {
        Self::answers(&[])
    }

    /// Each prompt takes this long to be answered.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt texts received, in order.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

impl ConfirmationPrompt for ScriptedPrompt {
    async fn ask(&self, prompt_text: &str) -> Result<String, PromptError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().push(prompt_text.to_string());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let next = self.answers.lock().unwrap().pop_front();
        next.or_else(|| self.fallback.clone())
            .ok_or(PromptError::Closed)
    }
}

// ─── Sink ──────────────────────────────────────────────────

/// One recorded snapshot as plain rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSnapshot {
    pub iteration: u64,
    pub nodes: Vec<(String, String)>,
    pub edges: Vec<(String, String)>,
}

#[derive(Default)]
pub struct RecordingSink {
    pub snapshots: Vec<RecordedSnapshot>,
    /// Fail every write with this message when set.
    pub fail_with: Option<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iterations(&self) -> Vec<u64> {
        self.snapshots.iter().map(|s| s.iteration).collect()
    }
}

impl SnapshotSink for RecordingSink {
    fn record(
        &mut self,
        iteration: u64,
        visited: &VisitedSet,
        edges: &EdgeList,
    ) -> Result<(), SnapshotError> {
        if let Some(ref reason) = self.fail_with {
            return Err(SnapshotError::Io {
                path: "<memory>".to_string(),
                reason: reason.clone(),
            });
        }
        self.snapshots.push(RecordedSnapshot {
            iteration,
            nodes: visited
                .iter()
                .map(|n| (n.id.to_string(), n.label.clone()))
                .collect(),
            edges: edges_as_ids(edges),
        });
        Ok(())
    }
}

/// `(source, target)` id pairs in edge order.
pub fn edges_as_ids(edges: &EdgeList) -> Vec<(String, String)> {
    edges
        .iter()
        .map(|e| (e.source.id.to_string(), e.target.id.to_string()))
        .collect()
}

// ─── Events ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingHandler {
    pub retries: Mutex<Vec<RetryEvent>>,
    pub prompts: Mutex<Vec<GatePromptEvent>>,
    pub resolutions: Mutex<Vec<GateResolvedEvent>>,
    pub rounds: Mutex<Vec<RoundCompleteEvent>>,
    pub stops: Mutex<Vec<TraversalStoppedEvent>>,
}

impl CrawlEventHandler for RecordingHandler {
    fn on_retry(&self, event: &RetryEvent) {
        self.retries.lock().unwrap().push(event.clone());
    }

    fn on_gate_prompt(&self, event: &GatePromptEvent) {
        self.prompts.lock().unwrap().push(event.clone());
    }

    fn on_gate_resolved(&self, event: &GateResolvedEvent) {
        self.resolutions.lock().unwrap().push(event.clone());
    }

    fn on_round_complete(&self, event: &RoundCompleteEvent) {
        self.rounds.lock().unwrap().push(event.clone());
    }

    fn on_traversal_stopped(&self, event: &TraversalStoppedEvent) {
        self.stops.lock().unwrap().push(event.clone());
    }
}
