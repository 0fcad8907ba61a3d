//! Snapshot output configuration.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Which completed rounds are written to the snapshot sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointCadence {
    /// Rounds 1, 2, 4, 8, ... plus the final state.
    #[default]
    PowerOfTwo,
    /// Every round.
    EveryRound,
}

impl FromStr for CheckpointCadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "power_of_two" => Ok(Self::PowerOfTwo),
            "every_round" => Ok(Self::EveryRound),
            other => Err(format!(
                "unknown checkpoint cadence '{other}', expected power_of_two or every_round"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for run output. Default: ./out
    pub dir: Option<String>,
    pub cadence: Option<CheckpointCadence>,
}

impl OutputConfig {
    pub fn effective_dir(&self) -> PathBuf {
        PathBuf::from(self.dir.as_deref().unwrap_or(defaults::DEFAULT_OUTPUT_DIR))
    }

    pub fn effective_cadence(&self) -> CheckpointCadence {
        self.cadence.unwrap_or_default()
    }
}
