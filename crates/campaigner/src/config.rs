//! Runtime configuration, loaded from a JSON file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::import::PollPolicy;

/// Environment variable consulted for the API token when the config does
/// not name another one.
pub const DEFAULT_TOKEN_ENV: &str = "CAMPAIGNER_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub version: String,
    /// Base URL of the messaging platform API.
    pub api_base_url: String,
    /// Name of the environment variable holding the API token. The token
    /// itself never lives in the config file.
    #[serde(default = "default_token_env")]
    pub api_token_env: String,
    pub organization_id: String,
    /// Channel identity (sender) campaigns are built for.
    pub channel_id: String,
    #[serde(default)]
    pub polling: PollingConfig,
    /// Seconds to wait before immediate execution, letting
    /// recipient-attachment calls settle.
    #[serde(default = "default_safety_delay")]
    pub execute_safety_delay_secs: u64,
    /// Maximum recipients to request rendered previews for.
    #[serde(default = "default_preview_limit")]
    pub preview_limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollingConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl PollingConfig {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            max_attempts: self.max_attempts,
            interval: Duration::from_secs(self.interval_secs),
        }
    }
}

impl Config {
    pub fn safety_delay(&self) -> Duration {
        Duration::from_secs(self.execute_safety_delay_secs)
    }

    /// Resolves the API token from the configured environment variable.
    pub fn api_token(&self) -> Result<String, ConfigError> {
        std::env::var(&self.api_token_env).map_err(|_| ConfigError::TokenNotFound {
            env_var: self.api_token_env.clone(),
        })
    }
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_safety_delay() -> u64 {
    10
}

fn default_preview_limit() -> u32 {
    5
}

fn default_max_attempts() -> u32 {
    120
}

fn default_interval_secs() -> u64 {
    1
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if !config.api_base_url.starts_with("http://") && !config.api_base_url.starts_with("https://")
    {
        return Err(ConfigError::Validation {
            message: format!("apiBaseUrl must be an http(s) URL: '{}'", config.api_base_url),
        });
    }

    for (field, value) in [
        ("organizationId", &config.organization_id),
        ("channelId", &config.channel_id),
        ("apiTokenEnv", &config.api_token_env),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("{} must not be empty", field),
            });
        }
    }

    if config.polling.max_attempts == 0 {
        return Err(ConfigError::Validation {
            message: "polling.maxAttempts must be at least 1".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> &'static str {
        r#"{
            "version": "1.0",
            "apiBaseUrl": "https://api.example.com",
            "organizationId": "org-1",
            "channelId": "chan-1"
        }"#
    }

    #[test]
    fn test_load_minimal_config_applies_defaults() {
        let config = load_config_from_str(minimal_json()).unwrap();
        assert_eq!(config.api_token_env, DEFAULT_TOKEN_ENV);
        assert_eq!(config.polling.max_attempts, 120);
        assert_eq!(config.polling.interval_secs, 1);
        assert_eq!(config.execute_safety_delay_secs, 10);
        assert_eq!(config.preview_limit, 5);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let json = minimal_json().replace("1.0", "2.0");
        assert!(matches!(
            load_config_from_str(&json),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let json = minimal_json().replace("https://api.example.com", "ftp://nope");
        assert!(load_config_from_str(&json).is_err());
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let json = r#"{
            "version": "1.0",
            "apiBaseUrl": "https://api.example.com",
            "organizationId": "org-1",
            "channelId": "chan-1",
            "polling": {"maxAttempts": 0, "intervalSecs": 1}
        }"#;
        assert!(load_config_from_str(json).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, minimal_json()).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.channel_id, "chan-1");
    }

    #[test]
    fn test_missing_file_error_includes_path() {
        let error = load_config("/nonexistent/config.json").unwrap_err();
        assert!(error.to_string().contains("/nonexistent/config.json"));
    }

    #[test]
    fn test_policy_conversion() {
        let config = load_config_from_str(minimal_json()).unwrap();
        let policy = config.polling.policy();
        assert_eq!(policy.max_attempts, 120);
        assert_eq!(policy.interval, Duration::from_secs(1));
    }
}
