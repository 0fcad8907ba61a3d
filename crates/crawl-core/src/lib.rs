//! # crawl-core
//!
//! Foundation crate for the frontier crawler.
//! Defines the graph data model, the collaborator traits the engine is
//! written against, errors, config, events, and tracing setup.

pub mod config;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::CrawlConfig;
pub use errors::{CrawlErrorCode, FetchError, SourceError, TraversalError};
pub use types::{Edge, EdgeList, Node, NodeId, RoundState, Visit, VisitedSet};
