use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{MasError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasConfig {
    /// Pause between cycles under the continuous strategy; zero only yields
    pub tick_interval_ms: u64,
    /// Stop an agent after this many cycles
    pub max_cycles_per_agent: Option<u64>,
}

impl Default for MasConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 0,
            max_cycles_per_agent: None,
        }
    }
}

impl MasConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MasError::Config(e.to_string()))
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles_per_agent = Some(cycles);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// True once `cycles` has reached the configured cap.
    pub fn cycle_limit_reached(&self, cycles: u64) -> bool {
        self.max_cycles_per_agent
            .map(|max| cycles >= max)
            .unwrap_or(false)
    }
}
