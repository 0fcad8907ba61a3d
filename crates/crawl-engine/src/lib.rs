//! # crawl-engine
//!
//! Breadth-first frontier expansion over a remote adjacency source.
//!
//! Each round fans out one retryable fetch per frontier node, at most
//! `concurrency` at a time. Transient failures are retried with backoff once
//! the shared [`ConfirmationGate`] allows it; the gate prompts the operator at
//! most once per gate lifetime no matter how many fetches fail together.
//! Results are merged only after the whole round resolved, in frontier order.

pub mod checkpoint;
pub mod engine;
pub mod fetch;
pub mod gate;
pub mod mapper;
pub mod round;

pub use checkpoint::CheckpointWriter;
pub use engine::{EngineSettings, FrontierEngine, StopReason, TraversalReport};
pub use fetch::RetryPolicy;
pub use gate::{ConfirmationGate, GatePhase, RETRY_PROMPT};
pub use round::RoundContext;
