use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// What to report when an event finds no relevant or applicable plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroppedEventDiagnostics {
    /// Dropped events are only visible in the cycle report
    #[default]
    Silent,
    /// Dropped events are also logged at warn level
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub dropped_events: DroppedEventDiagnostics,
    /// Register `print`, `send`, `broadcast`, `fail` and `stop` on build
    pub register_builtins: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            dropped_events: DroppedEventDiagnostics::Silent,
            register_builtins: true,
        }
    }
}

impl AgentConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AgentError::Config(e.to_string()))
    }

    pub fn with_dropped_events(mut self, diagnostics: DroppedEventDiagnostics) -> Self {
        self.dropped_events = diagnostics;
        self
    }

    pub fn with_builtins(mut self, register: bool) -> Self {
        self.register_builtins = register;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.dropped_events, DroppedEventDiagnostics::Silent);
        assert!(config.register_builtins);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = AgentConfig::from_json(r#"{"dropped_events": "warn"}"#).unwrap();
        assert_eq!(config.dropped_events, DroppedEventDiagnostics::Warn);
        assert!(config.register_builtins);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            AgentConfig::from_json(r#"{"dropped_events": "loud"}"#),
            Err(AgentError::Config(_))
        ));
    }
}
