//! Host configuration

use crate::error::{HostError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Buffered events per subscriber before lagging receivers drop events
    pub event_capacity: usize,
    /// Walk every committed tree to check the revision invariants
    pub validate_commits: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            event_capacity: 1024,
            validate_commits: true,
        }
    }
}

impl HostConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(HostError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = HostConfig::from_json(r#"{ "validate_commits": false }"#).unwrap();
        assert_eq!(config.event_capacity, 1024);
        assert!(!config.validate_commits);
    }

    #[test]
    fn test_invalid_config() {
        let result = HostConfig::from_json(r#"{ "event_capacity": "lots" }"#);
        assert!(matches!(result, Err(HostError::Config(_))));
    }
}
