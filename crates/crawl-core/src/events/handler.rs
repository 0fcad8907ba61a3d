//! CrawlEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for handling traversal events.
///
/// Handlers only override the events they care about. Methods are called
/// from fetch futures running concurrently, hence `Send + Sync`.
pub trait CrawlEventHandler: Send + Sync {
    // ---- Fetch ----
    fn on_retry(&self, _event: &RetryEvent) {}

    // ---- Gate ----
    fn on_gate_prompt(&self, _event: &GatePromptEvent) {}
    fn on_gate_resolved(&self, _event: &GateResolvedEvent) {}

    // ---- Traversal ----
    fn on_round_complete(&self, _event: &RoundCompleteEvent) {}
    fn on_traversal_stopped(&self, _event: &TraversalStoppedEvent) {}
}
