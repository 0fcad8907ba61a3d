//! Tests for the event system.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crawl_core::events::*;
use crawl_core::NodeId;

/// A test handler that counts events.
#[derive(Default)]
struct CountingHandler {
    retries: AtomicUsize,
    rounds: AtomicUsize,
}

impl CrawlEventHandler for CountingHandler {
    fn on_retry(&self, _event: &RetryEvent) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    fn on_round_complete(&self, _event: &RoundCompleteEvent) {
        self.rounds.fetch_add(1, Ordering::Relaxed);
    }
}

fn retry_event() -> RetryEvent {
    RetryEvent {
        node_id: NodeId::new("a"),
        attempt: 1,
        error: "boom".into(),
    }
}

#[test]
fn test_empty_dispatcher_is_noop() {
    let dispatcher = EventDispatcher::new();
    assert_eq!(dispatcher.handler_count(), 0);
    dispatcher.emit_retry(&retry_event());
}

#[test]
fn test_events_reach_every_handler() {
    let a = Arc::new(CountingHandler::default());
    let b = Arc::new(CountingHandler::default());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(a.clone());
    dispatcher.register(b.clone());

    dispatcher.emit_retry(&retry_event());
    dispatcher.emit_round_complete(&RoundCompleteEvent {
        iteration: 1,
        request_count: 1,
        visited: 3,
        edges: 2,
        frontier: 2,
    });
    // Not overridden: falls through to the no-op default.
    dispatcher.emit_gate_resolved(&GateResolvedEvent { proceed: true });

    for h in [&a, &b] {
        assert_eq!(h.retries.load(Ordering::Relaxed), 1);
        assert_eq!(h.rounds.load(Ordering::Relaxed), 1);
    }
}

#[test]
fn test_panicking_handler_does_not_block_others() {
    struct Panicker;
    impl CrawlEventHandler for Panicker {
        fn on_retry(&self, _event: &RetryEvent) {
            panic!("handler bug");
        }
    }

    let counter = Arc::new(CountingHandler::default());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(Panicker));
    dispatcher.register(counter.clone());

    dispatcher.emit_retry(&retry_event());
    assert_eq!(counter.retries.load(Ordering::Relaxed), 1);
}
