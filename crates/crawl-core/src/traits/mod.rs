//! Collaborator traits the engine is written against.

pub mod cancellation;
pub mod prompt;
pub mod sink;
pub mod source;

pub use cancellation::{Cancellable, CancellationToken};
pub use prompt::{is_affirmative, ConfirmationPrompt};
pub use sink::SnapshotSink;
pub use source::{AdjacencySource, NodeSource};
