//! EventDispatcher: synchronous fan-out, zero cost when empty.

use std::sync::Arc;

use super::handler::CrawlEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn CrawlEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn CrawlEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit to all handlers. A panicking handler is logged and skipped;
    /// later handlers still receive the event.
    fn emit<F: Fn(&dyn CrawlEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                ::tracing::error!("event handler panicked; continuing");
            }
        }
    }

    pub fn emit_retry(&self, event: &RetryEvent) {
        self.emit(|h| h.on_retry(event));
    }

    pub fn emit_gate_prompt(&self, event: &GatePromptEvent) {
        self.emit(|h| h.on_gate_prompt(event));
    }

    pub fn emit_gate_resolved(&self, event: &GateResolvedEvent) {
        self.emit(|h| h.on_gate_resolved(event));
    }

    pub fn emit_round_complete(&self, event: &RoundCompleteEvent) {
        self.emit(|h| h.on_round_complete(event));
    }

    pub fn emit_traversal_stopped(&self, event: &TraversalStoppedEvent) {
        self.emit(|h| h.on_traversal_stopped(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
