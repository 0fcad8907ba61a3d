//! # crawl-cli
//!
//! Production collaborators for the frontier engine and the `crawl` binary.
//!
//! - [`HttpSource`]: venue adjacency and node lookups over a REST API.
//! - [`CsvSnapshotWriter`]: per-checkpoint `venues.csv` and `edge-list.csv`.
//! - [`StdinPrompt`]: the operator's retry confirmation on the terminal.

pub mod csv_sink;
pub mod exit;
pub mod http_source;
pub mod prompt;

pub use csv_sink::CsvSnapshotWriter;
pub use exit::ExitStatus;
pub use http_source::HttpSource;
pub use prompt::StdinPrompt;
