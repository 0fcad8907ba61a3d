//! Round checkpoint.

use super::edges::EdgeList;
use super::visited::VisitedSet;

/// Immutable checkpoint produced once per completed round.
///
/// Holds its own copies of the visited set and edge list, so a consumer can
/// keep it across later rounds without observing further mutation.
#[derive(Debug, Clone)]
pub struct RoundState {
    /// Number of fully merged rounds. Zero before the first round.
    pub iteration: u64,
    /// Cumulative adjacency requests issued by merged rounds.
    pub request_count: u64,
    pub visited: VisitedSet,
    pub edges: EdgeList,
}

impl RoundState {
    pub fn node_count(&self) -> usize {
        self.visited.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
