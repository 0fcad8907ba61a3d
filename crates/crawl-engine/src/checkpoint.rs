//! Checkpoint cadence layered over a snapshot sink.

use crawl_core::config::CheckpointCadence;
use crawl_core::errors::SnapshotError;
use crawl_core::traits::SnapshotSink;
use crawl_core::RoundState;

/// Decides which round checkpoints reach the sink, and makes sure the final
/// traversal state is always recorded exactly once.
pub struct CheckpointWriter<S> {
    sink: S,
    cadence: CheckpointCadence,
    last_written: Option<u64>,
}

impl<S: SnapshotSink> CheckpointWriter<S> {
    pub fn new(sink: S, cadence: CheckpointCadence) -> Self {
        Self {
            sink,
            cadence,
            last_written: None,
        }
    }

    /// Whether a completed round with this iteration count is written as it happens.
    pub fn is_due(&self, iteration: u64) -> bool {
        match self.cadence {
            CheckpointCadence::EveryRound => true,
            CheckpointCadence::PowerOfTwo => iteration.is_power_of_two(),
        }
    }

    /// Feed one round checkpoint. Returns whether it was written.
    pub fn observe(&mut self, state: &RoundState) -> Result<bool, SnapshotError> {
        if !self.is_due(state.iteration) {
            return Ok(false);
        }
        self.write(state)?;
        Ok(true)
    }

    /// Record the final state unless that iteration was already written.
    /// Returns whether a write happened.
    pub fn finish(&mut self, final_state: &RoundState) -> Result<bool, SnapshotError> {
        if self.last_written == Some(final_state.iteration) {
            return Ok(false);
        }
        self.write(final_state)?;
        Ok(true)
    }

    pub fn last_written(&self) -> Option<u64> {
        self.last_written
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn write(&mut self, state: &RoundState) -> Result<(), SnapshotError> {
        self.sink
            .record(state.iteration, &state.visited, &state.edges)?;
        self.last_written = Some(state.iteration);
        tracing::debug!(iteration = state.iteration, "checkpoint written");
        Ok(())
    }
}
