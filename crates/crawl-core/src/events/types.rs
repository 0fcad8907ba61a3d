//! Event payloads.

use crate::types::NodeId;

/// A transient failure is about to be retried.
#[derive(Debug, Clone)]
pub struct RetryEvent {
    pub node_id: NodeId,
    /// 1-based attempt number that failed.
    pub attempt: u32,
    pub error: String,
}

/// The confirmation gate is prompting the operator.
#[derive(Debug, Clone)]
pub struct GatePromptEvent {
    /// Fetch whose failure triggered the prompt.
    pub node_id: NodeId,
    pub error: String,
}

/// The confirmation gate resolved.
#[derive(Debug, Clone)]
pub struct GateResolvedEvent {
    pub proceed: bool,
}

/// A round finished and was merged.
#[derive(Debug, Clone)]
pub struct RoundCompleteEvent {
    pub iteration: u64,
    pub request_count: u64,
    pub visited: usize,
    pub edges: usize,
    pub frontier: usize,
}

/// The traversal stopped.
#[derive(Debug, Clone)]
pub struct TraversalStoppedEvent {
    /// Last fully merged iteration.
    pub iteration: u64,
    pub reason: String,
    /// Set when the stop was caused by an error.
    pub error_code: Option<&'static str>,
}
