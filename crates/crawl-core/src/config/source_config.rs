//! Remote lookup service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SourceConfig {
    /// API root, without a trailing slash.
    pub base_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Value of the `v` query parameter.
    pub api_version: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Identifier of the node the traversal starts from.
    pub start_node_id: Option<String>,
}

impl SourceConfig {
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(defaults::DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_api_version(&self) -> &str {
        self.api_version
            .as_deref()
            .unwrap_or(defaults::DEFAULT_API_VERSION)
    }

    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_secs
                .unwrap_or(defaults::DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn effective_start_node_id(&self) -> &str {
        self.start_node_id
            .as_deref()
            .unwrap_or(defaults::DEFAULT_START_NODE_ID)
    }
}
