//! Snapshot persistence seam.

use crate::errors::SnapshotError;
use crate::types::{EdgeList, VisitedSet};

/// Durably records a consistent (node set, edge list) pair.
///
/// Implementations write a node table (id, label) in visited order and an
/// edge table (source id, target id) in edge order.
pub trait SnapshotSink {
    fn record(
        &mut self,
        iteration: u64,
        visited: &VisitedSet,
        edges: &EdgeList,
    ) -> Result<(), SnapshotError>;
}
