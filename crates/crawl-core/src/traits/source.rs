//! Remote lookup service seams.

use crate::errors::SourceError;
use crate::types::{Node, NodeId};

/// Answers "which nodes are adjacent to this one".
///
/// Implementations report recoverable failures as `SourceError::Transient`
/// and authorization failures as `SourceError::Forbidden`; the retry layer
/// relies on that distinction.
#[allow(async_fn_in_trait)]
pub trait AdjacencySource: Send + Sync {
    async fn lookup_neighbors(&self, node_id: &NodeId) -> Result<Vec<Node>, SourceError>;
}

/// Resolves a single node, used once to obtain the traversal's start node.
#[allow(async_fn_in_trait)]
pub trait NodeSource: Send + Sync {
    async fn lookup_node(&self, node_id: &NodeId) -> Result<Node, SourceError>;
}
