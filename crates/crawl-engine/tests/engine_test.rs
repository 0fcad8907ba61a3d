//! FrontierEngine: rounds, deduplication, edge identity, termination and
//! partial-results-on-failure.

use std::sync::Arc;
use std::time::Duration;

use crawl_core::config::GatePolicy;
use crawl_core::errors::{FetchError, SnapshotError, SourceError, TraversalError};
use crawl_core::events::EventDispatcher;
use crawl_core::traits::{AdjacencySource, Cancellable};
use crawl_core::{Node, NodeId};
use crawl_engine::{EngineSettings, FrontierEngine, RetryPolicy, StopReason};
use crawl_fixtures::{edges_as_ids, node, RecordingHandler, ScriptedPrompt, ScriptedSource};

fn settings(concurrency: usize) -> EngineSettings {
    EngineSettings {
        concurrency,
        max_iterations: None,
        gate_policy: GatePolicy::PerRound,
        retry: RetryPolicy::immediate(4),
    }
}

fn example_source() -> ScriptedSource {
    ScriptedSource::from_adjacency(&[("a", &["b", "c"]), ("b", &["c", "d"])])
}

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
    list.iter()
        .map(|(s, t)| (s.to_string(), t.to_string()))
        .collect()
}

fn ids<'a>(nodes: impl IntoIterator<Item = &'a Arc<Node>>) -> Vec<String> {
    nodes.into_iter().map(|n| n.id.to_string()).collect()
}

fn recording_events() -> (EventDispatcher, Arc<RecordingHandler>) {
    let handler = Arc::new(RecordingHandler::default());
    let mut events = EventDispatcher::new();
    events.register(handler.clone());
    (events, handler)
}

// ─── Happy path ────────────────────────────────────────────

#[tokio::test]
async fn example_graph_runs_three_rounds() {
    let mut engine = FrontierEngine::new(
        example_source(),
        ScriptedPrompt::never(),
        node("a"),
        settings(2),
    );
    let mut checkpoints = Vec::new();

    let report = engine
        .run(|state| {
            checkpoints.push((state.iteration, state.node_count(), state.edge_count()));
            Ok(())
        })
        .await;

    assert!(report.stop_reason.is_complete());
    assert_eq!(checkpoints, vec![(1, 3, 2), (2, 4, 4), (3, 4, 4)]);

    let state = report.final_state;
    assert_eq!(state.iteration, 3);
    assert_eq!(state.request_count, 4);
    assert_eq!(ids(state.visited.iter()), vec!["a", "b", "c", "d"]);
    assert_eq!(
        edges_as_ids(&state.edges),
        pairs(&[("a", "b"), ("a", "c"), ("b", "c"), ("b", "d")])
    );
}

#[tokio::test]
async fn frontier_holds_only_newly_discovered_nodes_in_order() {
    let mut engine = FrontierEngine::new(
        example_source(),
        ScriptedPrompt::never(),
        node("a"),
        settings(4),
    );
    assert_eq!(ids(engine.frontier()), vec!["a"]);

    engine.expand_round().await.unwrap();
    assert_eq!(ids(engine.frontier()), vec!["b", "c"]);

    engine.expand_round().await.unwrap();
    assert_eq!(ids(engine.frontier()), vec!["d"]);

    engine.expand_round().await.unwrap();
    assert!(engine.frontier().is_empty());
    assert!(engine.expand_round().await.unwrap().is_none());
    assert_eq!(engine.iteration(), 3);
}

#[tokio::test]
async fn edges_to_seen_nodes_point_at_the_canonical_instance() {
    let mut engine = FrontierEngine::new(
        example_source(),
        ScriptedPrompt::never(),
        node("a"),
        settings(2),
    );
    let report = engine.run(|_| Ok(())).await;
    let state = report.final_state;

    let canonical_c = state.visited.get("c").unwrap();
    let b_to_c = state
        .edges
        .iter()
        .find(|e| e.ids() == ("b", "c"))
        .unwrap();
    assert!(Arc::ptr_eq(&b_to_c.target, canonical_c));

    let canonical_b = state.visited.get("b").unwrap();
    assert!(state
        .edges
        .iter()
        .filter(|e| e.source.id.as_str() == "b")
        .all(|e| Arc::ptr_eq(&e.source, canonical_b)));
}

/// Reports the same neighbor id with a different label per caller.
struct RelabelingSource;

impl AdjacencySource for RelabelingSource {
    async fn lookup_neighbors(&self, node_id: &NodeId) -> Result<Vec<Node>, SourceError> {
        Ok(match node_id.as_str() {
            "a" => vec![Node::new("b", "from a"), Node::new("c", "from a")],
            "b" => vec![Node::new("c", "from b")],
            _ => vec![],
        })
    }
}

#[tokio::test]
async fn first_seen_label_wins() {
    let mut engine =
        FrontierEngine::new(RelabelingSource, ScriptedPrompt::never(), node("a"), settings(2));
    let report = engine.run(|_| Ok(())).await;

    assert_eq!(report.final_state.visited.get("c").unwrap().label, "from a");
    assert_eq!(report.final_state.edge_count(), 3);
}

#[tokio::test]
async fn self_loop_and_back_edge_are_recorded_but_not_revisited() {
    let source = ScriptedSource::from_adjacency(&[("a", &["a", "b"]), ("b", &["a"])]);
    let mut engine = FrontierEngine::new(source, ScriptedPrompt::never(), node("a"), settings(2));

    let report = engine.run(|_| Ok(())).await;

    assert!(report.stop_reason.is_complete());
    assert_eq!(report.final_state.iteration, 2);
    assert_eq!(report.final_state.node_count(), 2);
    assert_eq!(
        edges_as_ids(&report.final_state.edges),
        pairs(&[("a", "a"), ("a", "b"), ("b", "a")])
    );
}

#[tokio::test]
async fn isolated_start_finishes_after_one_round() {
    let source = ScriptedSource::from_adjacency(&[]);
    let mut engine = FrontierEngine::new(source, ScriptedPrompt::never(), node("a"), settings(1));

    let report = engine.run(|_| Ok(())).await;

    assert!(report.stop_reason.is_complete());
    assert_eq!(report.final_state.iteration, 1);
    assert_eq!(report.final_state.request_count, 1);
    assert_eq!(report.final_state.node_count(), 1);
    assert!(report.final_state.edges.is_empty());
}

#[tokio::test]
async fn each_node_is_fetched_once() {
    let mut engine = FrontierEngine::new(
        ScriptedSource::from_adjacency(&[
            ("a", &["b", "c"]),
            ("b", &["c", "a"]),
            ("c", &["b", "a"]),
        ]),
        ScriptedPrompt::never(),
        node("a"),
        settings(3),
    );
    let report = engine.run(|_| Ok(())).await;

    assert_eq!(report.final_state.request_count, 3);
    assert_eq!(engine.source().calls(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn fan_out_respects_the_concurrency_ceiling() {
    let leaves: Vec<String> = (0..20).map(|i| format!("leaf{i}")).collect();
    let leaf_refs: Vec<&str> = leaves.iter().map(String::as_str).collect();
    let source = ScriptedSource::from_adjacency(&[("root", leaf_refs.as_slice())])
        .with_latency(Duration::from_millis(2));
    let mut engine = FrontierEngine::new(source, ScriptedPrompt::never(), node("root"), settings(3));

    engine.expand_round().await.unwrap();
    engine.expand_round().await.unwrap();

    assert_eq!(engine.request_count(), 21);
    assert_eq!(engine.visited().len(), 21);
    assert!(engine.source().max_in_flight() <= 3);
}

// ─── Termination ───────────────────────────────────────────

#[tokio::test]
async fn iteration_ceiling_stops_early() {
    let mut engine = FrontierEngine::new(
        example_source(),
        ScriptedPrompt::never(),
        node("a"),
        EngineSettings {
            max_iterations: Some(1),
            ..settings(2)
        },
    );

    let report = engine.run(|_| Ok(())).await;

    assert!(matches!(report.stop_reason, StopReason::IterationCeiling));
    assert!(!report.stop_reason.is_complete());
    assert_eq!(report.final_state.iteration, 1);
    assert_eq!(ids(engine.frontier()), vec!["b", "c"]);
}

#[tokio::test]
async fn cancellation_stops_between_rounds() {
    let mut engine = FrontierEngine::new(
        example_source(),
        ScriptedPrompt::never(),
        node("a"),
        settings(2),
    );
    let token = engine.cancellation_token();

    let report = engine
        .run(|state| {
            if state.iteration == 1 {
                token.cancel();
            }
            Ok(())
        })
        .await;

    assert!(matches!(report.stop_reason, StopReason::Cancelled));
    assert_eq!(report.final_state.iteration, 1);
    assert_eq!(report.final_state.node_count(), 3);
}

#[tokio::test]
async fn cancelled_engine_refuses_to_expand() {
    let mut engine = FrontierEngine::new(
        example_source(),
        ScriptedPrompt::never(),
        node("a"),
        settings(2),
    );
    engine.cancellation_token().cancel();

    assert!(matches!(
        engine.expand_round().await,
        Err(TraversalError::Cancelled)
    ));
    assert_eq!(engine.iteration(), 0);
}

// ─── Failure keeps the last complete round ─────────────────

#[tokio::test]
async fn failed_round_is_discarded_and_previous_state_kept() {
    // "b" would discover "d", but "c" fails in the same round.
    let source = example_source().fail_forbidden("c");
    let mut engine = FrontierEngine::new(source, ScriptedPrompt::never(), node("a"), settings(2));

    let report = engine.run(|_| Ok(())).await;

    match &report.stop_reason {
        StopReason::Failed(TraversalError::Fetch(FetchError::Permanent { node_id, .. })) => {
            assert_eq!(node_id, "c");
        }
        other => panic!("unexpected stop reason: {other:?}"),
    }
    let state = report.final_state;
    assert_eq!(state.iteration, 1);
    assert_eq!(state.request_count, 1);
    assert_eq!(ids(state.visited.iter()), vec!["a", "b", "c"]);
    assert!(!state.visited.contains("d"));
    assert_eq!(edges_as_ids(&state.edges), pairs(&[("a", "b"), ("a", "c")]));
}

#[tokio::test]
async fn failed_round_restores_the_frontier() {
    let source = example_source().fail_forbidden("b");
    let mut engine = FrontierEngine::new(source, ScriptedPrompt::never(), node("a"), settings(2));

    engine.expand_round().await.unwrap();
    let err = engine.expand_round().await.unwrap_err();

    assert!(matches!(err, TraversalError::Fetch(FetchError::Permanent { .. })));
    assert_eq!(engine.iteration(), 1);
    assert_eq!(ids(engine.frontier()), vec!["b", "c"]);

    // The queued failure was consumed; the same round now succeeds.
    let state = engine.expand_round().await.unwrap().unwrap();
    assert_eq!(state.iteration, 2);
    assert_eq!(state.node_count(), 4);
}

#[tokio::test]
async fn failure_in_first_round_keeps_the_start_node() {
    let source = example_source().fail_forbidden("a");
    let mut engine = FrontierEngine::new(source, ScriptedPrompt::never(), node("a"), settings(2));

    let report = engine.run(|_| Ok(())).await;

    assert!(report.stop_reason.error().is_some());
    assert_eq!(report.final_state.iteration, 0);
    assert_eq!(ids(report.final_state.visited.iter()), vec!["a"]);
    assert!(report.final_state.edges.is_empty());
}

#[tokio::test]
async fn declined_retry_stops_the_traversal() {
    let source = example_source().fail_transient("d", 1);
    let mut engine =
        FrontierEngine::new(source, ScriptedPrompt::always("no"), node("a"), settings(2));

    let report = engine.run(|_| Ok(())).await;

    assert!(matches!(
        report.stop_reason,
        StopReason::Failed(TraversalError::Fetch(FetchError::Declined { .. }))
    ));
    assert_eq!(report.final_state.iteration, 2);
}

#[tokio::test]
async fn observer_error_stops_the_traversal() {
    let mut engine = FrontierEngine::new(
        example_source(),
        ScriptedPrompt::never(),
        node("a"),
        settings(2),
    );

    let report = engine
        .run(|_| {
            Err(TraversalError::Snapshot(SnapshotError::Io {
                path: "out".to_string(),
                reason: "disk full".to_string(),
            }))
        })
        .await;

    assert!(matches!(
        report.stop_reason,
        StopReason::Failed(TraversalError::Snapshot(_))
    ));
    // The round itself merged before the observer failed.
    assert_eq!(report.final_state.iteration, 1);
}

// ─── Gate policies ─────────────────────────────────────────

#[tokio::test]
async fn concurrent_failures_in_one_round_prompt_once() {
    let source = ScriptedSource::from_adjacency(&[("a", &["b", "c", "d", "e"])])
        .with_latency(Duration::from_millis(5))
        .fail_transient("b", 1)
        .fail_transient("c", 1)
        .fail_transient("d", 1)
        .fail_transient("e", 1);
    let (events, handler) = recording_events();
    let mut engine = FrontierEngine::new(
        source,
        ScriptedPrompt::always("y").with_latency(Duration::from_millis(10)),
        node("a"),
        settings(4),
    )
    .with_events(events);

    let report = engine.run(|_| Ok(())).await;

    assert!(report.stop_reason.is_complete());
    assert_eq!(report.final_state.node_count(), 5);
    assert_eq!(handler.prompts.lock().unwrap().len(), 1);
    assert_eq!(handler.retries.lock().unwrap().len(), 4);
}

fn chain_with_failures() -> ScriptedSource {
    ScriptedSource::from_adjacency(&[("a", &["b"]), ("b", &["c"])])
        .fail_transient("a", 1)
        .fail_transient("b", 1)
        .fail_transient("c", 1)
}

#[tokio::test]
async fn per_round_gate_prompts_again_each_round() {
    let (events, handler) = recording_events();
    let mut engine = FrontierEngine::new(
        chain_with_failures(),
        ScriptedPrompt::always("y"),
        node("a"),
        settings(2),
    )
    .with_events(events);

    let report = engine.run(|_| Ok(())).await;

    assert!(report.stop_reason.is_complete());
    assert_eq!(handler.prompts.lock().unwrap().len(), 3);
    assert!(engine.traversal_gate().is_none());
}

#[tokio::test]
async fn whole_traversal_gate_prompts_once() {
    let (events, handler) = recording_events();
    let mut engine = FrontierEngine::new(
        chain_with_failures(),
        ScriptedPrompt::always("y"),
        node("a"),
        EngineSettings {
            gate_policy: GatePolicy::WholeTraversal,
            ..settings(2)
        },
    )
    .with_events(events);

    let report = engine.run(|_| Ok(())).await;

    assert!(report.stop_reason.is_complete());
    assert_eq!(handler.prompts.lock().unwrap().len(), 1);
    let gate = engine.traversal_gate().unwrap();
    assert_eq!(gate.prompts_issued(), 1);
    assert_eq!(gate.capacity(), 2);
}

// ─── Events ────────────────────────────────────────────────

#[tokio::test]
async fn round_and_stop_events_are_emitted() {
    let (events, handler) = recording_events();
    let mut engine = FrontierEngine::new(
        example_source(),
        ScriptedPrompt::never(),
        node("a"),
        settings(2),
    )
    .with_events(events);

    engine.run(|_| Ok(())).await;

    let rounds = handler.rounds.lock().unwrap();
    let frontier_sizes: Vec<usize> = rounds.iter().map(|r| r.frontier).collect();
    assert_eq!(frontier_sizes, vec![2, 1, 0]);
    assert_eq!(rounds.last().unwrap().request_count, 4);

    let stops = handler.stops.lock().unwrap();
    assert_eq!(stops.len(), 1);
    assert_eq!(stops[0].iteration, 3);
    assert!(stops[0].error_code.is_none());
}

#[tokio::test]
async fn failed_stop_event_carries_the_error_code() {
    let (events, handler) = recording_events();
    let mut engine = FrontierEngine::new(
        example_source().fail_forbidden("a"),
        ScriptedPrompt::never(),
        node("a"),
        settings(2),
    )
    .with_events(events);

    engine.run(|_| Ok(())).await;

    let stops = handler.stops.lock().unwrap();
    assert_eq!(stops[0].error_code, Some("FETCH_PERMANENT"));
}
