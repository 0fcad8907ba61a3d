//! Traversal configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::defaults;

/// How long one confirmation answer stays in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePolicy {
    /// A fresh gate per round; each round may prompt once.
    #[default]
    PerRound,
    /// One gate for the whole traversal; the first answer governs every round.
    WholeTraversal,
}

impl fmt::Display for GatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerRound => f.write_str("per_round"),
            Self::WholeTraversal => f.write_str("whole_traversal"),
        }
    }
}

impl FromStr for GatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "per_round" => Ok(Self::PerRound),
            "whole_traversal" => Ok(Self::WholeTraversal),
            other => Err(format!(
                "unknown gate policy '{other}', expected per_round or whole_traversal"
            )),
        }
    }
}

/// Configuration for the frontier expansion engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TraversalConfig {
    /// Maximum fetches in flight per round. Default: 10.
    pub concurrency: Option<usize>,
    /// Stop after this many rounds even if the frontier is non-empty.
    pub max_iterations: Option<u64>,
    /// Confirmation gate lifetime. Default: per_round.
    pub gate_policy: Option<GatePolicy>,
}

impl TraversalConfig {
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.unwrap_or(defaults::DEFAULT_CONCURRENCY)
    }

    pub fn effective_gate_policy(&self) -> GatePolicy {
        self.gate_policy.unwrap_or_default()
    }
}
