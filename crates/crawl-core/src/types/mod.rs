//! Graph data model: nodes, the visited set, the edge list, and round checkpoints.

pub mod edges;
pub mod node;
pub mod round;
pub mod visited;

pub use edges::{Edge, EdgeList};
pub use node::{Node, NodeId};
pub use round::RoundState;
pub use visited::{Visit, VisitedSet};
