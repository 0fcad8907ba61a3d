//! Event system: typed traversal events, a handler trait with no-op
//! defaults, and a dispatcher that fans events out to registered handlers.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::CrawlEventHandler;
pub use types::*;
