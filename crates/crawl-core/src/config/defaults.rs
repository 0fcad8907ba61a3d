// Single source of truth for all default values.

// --- Traversal ---
pub const DEFAULT_CONCURRENCY: usize = 10;

// --- Retry ---
pub const DEFAULT_MAX_ATTEMPTS: u32 = 11; // 10 retries after the first try
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1_000;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 60_000;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

// --- Source ---
pub const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v2";
pub const DEFAULT_API_VERSION: &str = "20180323";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_START_NODE_ID: &str = "4b19f917f964a520abe623e3";

// --- Output ---
pub const DEFAULT_OUTPUT_DIR: &str = "./out";

// --- Logging ---
pub const DEFAULT_LOG_FILTER: &str = "crawl=info";
