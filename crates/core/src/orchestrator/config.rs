//! Orchestrator configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a run does after one source fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failed source.
    #[default]
    FailFast,
    /// Keep going with the remaining sources. Credential failures still
    /// stop the run.
    BestEffort,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailFast => "fail_fast",
            Self::BestEffort => "best_effort",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "fail_fast" => Ok(Self::FailFast),
            "best_effort" => Ok(Self::BestEffort),
            other => Err(format!(
                "unknown failure policy '{}', expected fail_fast or best_effort",
                other
            )),
        }
    }
}

/// Configuration for the publish orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl OrchestratorConfig {
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
    }

    #[test]
    fn test_deserialize_policy() {
        let config: OrchestratorConfig = toml::from_str(r#"failure_policy = "best_effort""#).unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::BestEffort);

        let config: OrchestratorConfig = toml::from_str("").unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("best-effort".parse::<FailurePolicy>(), Ok(FailurePolicy::BestEffort));
        assert_eq!("fail_fast".parse::<FailurePolicy>(), Ok(FailurePolicy::FailFast));
        assert!("yolo".parse::<FailurePolicy>().is_err());
    }
}
