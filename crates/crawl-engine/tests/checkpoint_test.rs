//! CheckpointWriter driven by a real traversal.

use crawl_core::config::{CheckpointCadence, GatePolicy};
use crawl_core::errors::{SnapshotError, TraversalError};
use crawl_engine::{CheckpointWriter, EngineSettings, FrontierEngine, RetryPolicy, StopReason};
use crawl_fixtures::{node, RecordingSink, ScriptedPrompt, ScriptedSource};

fn settings() -> EngineSettings {
    EngineSettings {
        concurrency: 2,
        max_iterations: None,
        gate_policy: GatePolicy::PerRound,
        retry: RetryPolicy::immediate(2),
    }
}

/// `n0 -> n1 -> ... -> n{len-1}`; the traversal takes `len` rounds.
fn chain(len: usize) -> ScriptedSource {
    let names: Vec<String> = (0..len).map(|i| format!("n{i}")).collect();
    let next: Vec<[&str; 1]> = names.iter().skip(1).map(|n| [n.as_str()]).collect();
    let adjacency: Vec<(&str, &[&str])> = names
        .iter()
        .zip(next.iter())
        .map(|(from, to)| (from.as_str(), to.as_slice()))
        .collect();
    ScriptedSource::from_adjacency(&adjacency)
}

async fn crawl(
    source: ScriptedSource,
    cadence: CheckpointCadence,
) -> (StopReason, CheckpointWriter<RecordingSink>) {
    let mut writer = CheckpointWriter::new(RecordingSink::new(), cadence);
    let mut engine = FrontierEngine::new(source, ScriptedPrompt::never(), node("n0"), settings());

    let report = engine
        .run(|state| {
            writer.observe(state)?;
            Ok(())
        })
        .await;
    writer.finish(&report.final_state).unwrap();
    (report.stop_reason, writer)
}

#[test]
fn power_of_two_schedule() {
    let writer = CheckpointWriter::new(RecordingSink::new(), CheckpointCadence::PowerOfTwo);
    let due: Vec<u64> = (0..=20).filter(|&i| writer.is_due(i)).collect();
    assert_eq!(due, vec![1, 2, 4, 8, 16]);
}

#[tokio::test]
async fn power_of_two_plus_final_state() {
    let (stop, writer) = crawl(chain(6), CheckpointCadence::PowerOfTwo).await;

    assert!(stop.is_complete());
    assert_eq!(writer.sink().iterations(), vec![1, 2, 4, 6]);
    assert_eq!(writer.last_written(), Some(6));
}

#[tokio::test]
async fn final_state_is_not_written_twice() {
    let (_, writer) = crawl(chain(4), CheckpointCadence::PowerOfTwo).await;
    assert_eq!(writer.sink().iterations(), vec![1, 2, 4]);
}

#[tokio::test]
async fn every_round_cadence() {
    let (_, writer) = crawl(chain(3), CheckpointCadence::EveryRound).await;
    assert_eq!(writer.sink().iterations(), vec![1, 2, 3]);
}

#[tokio::test]
async fn snapshots_carry_the_merged_state() {
    let (_, writer) = crawl(chain(3), CheckpointCadence::EveryRound).await;
    let second = &writer.sink().snapshots[1];

    assert_eq!(second.iteration, 2);
    assert_eq!(
        second.nodes,
        vec![
            ("n0".to_string(), "N0".to_string()),
            ("n1".to_string(), "N1".to_string()),
            ("n2".to_string(), "N2".to_string()),
        ]
    );
    assert_eq!(
        second.edges,
        vec![
            ("n0".to_string(), "n1".to_string()),
            ("n1".to_string(), "n2".to_string()),
        ]
    );
}

#[tokio::test]
async fn failure_in_first_round_writes_the_start_state() {
    let (stop, writer) = crawl(chain(3).fail_forbidden("n0"), CheckpointCadence::PowerOfTwo).await;

    assert!(stop.error().is_some());
    let snapshots = &writer.sink().snapshots;
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].iteration, 0);
    assert_eq!(snapshots[0].nodes.len(), 1);
    assert!(snapshots[0].edges.is_empty());
}

#[tokio::test]
async fn failure_mid_traversal_writes_the_last_complete_round() {
    let (stop, writer) = crawl(chain(6).fail_forbidden("n3"), CheckpointCadence::PowerOfTwo).await;

    assert!(matches!(stop, StopReason::Failed(TraversalError::Fetch(_))));
    assert_eq!(writer.sink().iterations(), vec![1, 2, 3]);
    assert_eq!(writer.sink().snapshots[2].nodes.len(), 4);
}

#[tokio::test]
async fn sink_failure_stops_the_traversal() {
    let mut sink = RecordingSink::new();
    sink.fail_with = Some("read-only file system".to_string());
    let mut writer = CheckpointWriter::new(sink, CheckpointCadence::EveryRound);
    let mut engine = FrontierEngine::new(chain(3), ScriptedPrompt::never(), node("n0"), settings());

    let report = engine
        .run(|state| {
            writer.observe(state)?;
            Ok(())
        })
        .await;

    match report.stop_reason {
        StopReason::Failed(TraversalError::Snapshot(SnapshotError::Io { reason, .. })) => {
            assert_eq!(reason, "read-only file system");
        }
        other => panic!("unexpected stop reason: {other:?}"),
    }
    assert_eq!(report.final_state.iteration, 1);
    assert!(writer.last_written().is_none());
}
