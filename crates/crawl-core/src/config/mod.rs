//! Configuration system for the crawler.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod crawl_config;
pub mod defaults;
pub mod output_config;
pub mod retry_config;
pub mod source_config;
pub mod traversal_config;

pub use crawl_config::{CliOverrides, CrawlConfig};
pub use output_config::{CheckpointCadence, OutputConfig};
pub use retry_config::RetryConfig;
pub use source_config::SourceConfig;
pub use traversal_config::{GatePolicy, TraversalConfig};
