//! Top-level crawler configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CheckpointCadence, GatePolicy, OutputConfig, RetryConfig, SourceConfig, TraversalConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CRAWL_*`)
/// 3. Project config (`crawl.toml` in the working root)
/// 4. User config (`~/.crawl/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CrawlConfig {
    pub traversal: TraversalConfig,
    pub retry: RetryConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub concurrency: Option<usize>,
    pub max_iterations: Option<u64>,
    pub gate_policy: Option<GatePolicy>,
    pub max_attempts: Option<u32>,
    pub start_node_id: Option<String>,
    pub output_dir: Option<String>,
    pub cadence: Option<CheckpointCadence>,
}

impl CrawlConfig {
    /// Load configuration with layered resolution.
    ///
    /// `explicit_path`, when given, replaces the project `crawl.toml` and must exist.
    pub fn load(
        root: &Path,
        explicit_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        match explicit_path {
            Some(path) => Self::merge_toml_file(&mut config, path)?,
            None => {
                let project_config_path = root.join("crawl.toml");
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config)?;

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
        if config.traversal.concurrency == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "traversal.concurrency".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.traversal.max_iterations == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "traversal.max_iterations".to_string(),
                message: "must be greater than 0 when set".to_string(),
            });
        }
        if config.retry.max_attempts == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "retry.max_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(factor) = config.retry.backoff_factor {
            if !factor.is_finite() || factor < 1.0 {
                return Err(ConfigError::ValidationFailed {
                    field: "retry.backoff_factor".to_string(),
                    message: "must be a finite value >= 1.0".to_string(),
                });
            }
        }
        if let (Some(initial), Some(max)) =
            (config.retry.initial_backoff_ms, config.retry.max_backoff_ms)
        {
            if initial > max {
                return Err(ConfigError::ValidationFailed {
                    field: "retry.initial_backoff_ms".to_string(),
                    message: "must not exceed retry.max_backoff_ms".to_string(),
                });
            }
        }
        if config.source.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "source.timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref url) = config.source.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationFailed {
                    field: "source.base_url".to_string(),
                    message: "must be an http:// or https:// URL".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.crawl/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".crawl").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CrawlConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CrawlConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a `Some` value.
    fn merge(base: &mut CrawlConfig, other: &CrawlConfig) {
        fn take<T: Clone>(base: &mut Option<T>, other: &Option<T>) {
            if other.is_some() {
                *base = other.clone();
            }
        }

        // Traversal
        take(&mut base.traversal.concurrency, &other.traversal.concurrency);
        take(&mut base.traversal.max_iterations, &other.traversal.max_iterations);
        take(&mut base.traversal.gate_policy, &other.traversal.gate_policy);

        // Retry
        take(&mut base.retry.max_attempts, &other.retry.max_attempts);
        take(&mut base.retry.initial_backoff_ms, &other.retry.initial_backoff_ms);
        take(&mut base.retry.max_backoff_ms, &other.retry.max_backoff_ms);
        take(&mut base.retry.backoff_factor, &other.retry.backoff_factor);

        // Source
        take(&mut base.source.base_url, &other.source.base_url);
        take(&mut base.source.client_id, &other.source.client_id);
        take(&mut base.source.client_secret, &other.source.client_secret);
        take(&mut base.source.api_version, &other.source.api_version);
        take(&mut base.source.timeout_secs, &other.source.timeout_secs);
        take(&mut base.source.start_node_id, &other.source.start_node_id);

        // Output
        take(&mut base.output.dir, &other.output.dir);
        take(&mut base.output.cadence, &other.output.cadence);
    }

    /// Apply environment variable overrides.
    /// Pattern: `CRAWL_CONCURRENCY`, `CRAWL_RETRY_MAX_ATTEMPTS`, etc.
    fn apply_env_overrides(config: &mut CrawlConfig) -> Result<(), ConfigError> {
        if let Some(v) = env_parse::<usize>("CRAWL_CONCURRENCY")? {
            config.traversal.concurrency = Some(v);
        }
        if let Some(v) = env_parse::<u64>("CRAWL_MAX_ITERATIONS")? {
            config.traversal.max_iterations = Some(v);
        }
        if let Some(v) = env_parse::<GatePolicy>("CRAWL_GATE_POLICY")? {
            config.traversal.gate_policy = Some(v);
        }
        if let Some(v) = env_parse::<u32>("CRAWL_RETRY_MAX_ATTEMPTS")? {
            config.retry.max_attempts = Some(v);
        }
        if let Some(v) = env_parse::<u64>("CRAWL_RETRY_INITIAL_BACKOFF_MS")? {
            config.retry.initial_backoff_ms = Some(v);
        }
        if let Some(v) = env_parse::<u64>("CRAWL_RETRY_MAX_BACKOFF_MS")? {
            config.retry.max_backoff_ms = Some(v);
        }
        if let Some(v) = env_parse::<f64>("CRAWL_RETRY_BACKOFF_FACTOR")? {
            config.retry.backoff_factor = Some(v);
        }
        if let Ok(val) = std::env::var("CRAWL_SOURCE_BASE_URL") {
            config.source.base_url = Some(val);
        }
        if let Ok(val) = std::env::var("CRAWL_CLIENT_ID") {
            config.source.client_id = Some(val);
        }
        if let Ok(val) = std::env::var("CRAWL_CLIENT_SECRET") {
            config.source.client_secret = Some(val);
        }
        if let Ok(val) = std::env::var("CRAWL_API_VERSION") {
            config.source.api_version = Some(val);
        }
        if let Some(v) = env_parse::<u64>("CRAWL_SOURCE_TIMEOUT_SECS")? {
            config.source.timeout_secs = Some(v);
        }
        if let Ok(val) = std::env::var("CRAWL_START_NODE") {
            config.source.start_node_id = Some(val);
        }
        if let Ok(val) = std::env::var("CRAWL_OUTPUT_DIR") {
            config.output.dir = Some(val);
        }
        if let Some(v) = env_parse::<CheckpointCadence>("CRAWL_CHECKPOINT_CADENCE")? {
            config.output.cadence = Some(v);
        }
        Ok(())
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut CrawlConfig, cli: &CliOverrides) {
        if let Some(v) = cli.concurrency {
            config.traversal.concurrency = Some(v);
        }
        if let Some(v) = cli.max_iterations {
            config.traversal.max_iterations = Some(v);
        }
        if let Some(v) = cli.gate_policy {
            config.traversal.gate_policy = Some(v);
        }
        if let Some(v) = cli.max_attempts {
            config.retry.max_attempts = Some(v);
        }
        if let Some(ref v) = cli.start_node_id {
            config.source.start_node_id = Some(v.clone());
        }
        if let Some(ref v) = cli.output_dir {
            config.output.dir = Some(v.clone());
        }
        if let Some(v) = cli.cadence {
            config.output.cadence = Some(v);
        }
    }
}

/// Parse an environment variable, treating an unparsable value as an error
/// rather than silently falling back.
fn env_parse<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field: key.to_string(),
                message: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
