//! Configuration for coder agents

use codebook_llm::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::CoderAgent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoderConfig {
    /// Chat model to use
    pub model: String,

    /// Sampling temperature for coding calls
    pub temperature: f32,

    /// Maximum tokens the model may spend on a completion
    pub max_completion_tokens: u32,

    /// Skip the network entirely and return a deterministic placeholder
    /// result per chunk (testing and cost avoidance)
    #[serde(default)]
    pub dry_run: bool,

    /// Retry behavior for the underlying chat call
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.7,
            max_completion_tokens: 1_000,
            dry_run: false,
            retry: RetryPolicy::default(),
        }
    }
}

impl CoderConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must be non-empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.max_completion_tokens == 0 {
            return Err("max_completion_tokens must be greater than 0".to_string());
        }
        if self.retry.attempt_timeout_secs == 0 {
            return Err("retry.attempt_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {e}"))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CoderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "gpt-4o");
        assert!(!config.dry_run);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn empty_model_is_invalid() {
        let mut config = CoderConfig::default();
        config.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn temperature_out_of_range_is_invalid() {
        let mut config = CoderConfig::default();
        config.temperature = 2.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_attempt_timeout_is_invalid() {
        let mut config = CoderConfig::default();
        config.retry.attempt_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_round_trip() {
        let config = CoderConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = CoderConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_toml_uses_defaults_for_flags() {
        let config = CoderConfig::from_toml(
            r#"
            model = "gpt-4o-mini"
            temperature = 0.2
            max_completion_tokens = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(!config.dry_run);
        assert_eq!(config.retry, RetryPolicy::default());
    }
}
