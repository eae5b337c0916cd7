use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BASE_URL_ENV: &str = "RAGEVAL_BASE_URL";
pub const MODEL_ENV: &str = "RAGEVAL_MODEL";
pub const DEFAULT_API_KEY_ENV: &str = "RAGEVAL_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Connection and scoring settings for the judge endpoint.
///
/// The credential is never part of the serialized form; it is read from the
/// environment variable named by `api_key_env`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(skip)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub score_policy: ScorePolicy,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://api.deepinfra.com/v1/openai".to_string()
}

fn default_model() -> String {
    "Qwen/QwQ-32B-Preview".to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

/// What to do with a judge score that parsed but fell outside [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// Keep the value as parsed ("1.5" stays 1.5).
    #[default]
    PassThrough,
    /// Clamp into [0, 1].
    Clamp,
}

impl ScorePolicy {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            ScorePolicy::PassThrough => value,
            ScorePolicy::Clamp => value.clamp(0.0, 1.0),
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            api_key: None,
            score_policy: ScorePolicy::default(),
            timeout_secs: None,
        }
    }
}

impl JudgeConfig {
    /// Parse YAML and resolve the credential from the environment.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: JudgeConfig = serde_yaml::from_str(yaml)?;
        config.api_key = read_env(&config.api_key_env);
        Ok(config)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }

    /// Defaults overridden by `RAGEVAL_BASE_URL`, `RAGEVAL_MODEL` and `RAGEVAL_API_KEY`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = read_env(BASE_URL_ENV) {
            config.base_url = url;
        }
        if let Some(model) = read_env(MODEL_ENV) {
            config.model = model;
        }
        config.api_key = read_env(&config.api_key_env);
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_score_policy(mut self, policy: ScorePolicy) -> Self {
        self.score_policy = policy;
        self
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_fills_defaults() {
        let config = JudgeConfig::from_yaml_str("model: judge-small\n").unwrap();
        assert_eq!(config.model, "judge-small");
        assert_eq!(config.base_url, "https://api.deepinfra.com/v1/openai");
        assert_eq!(config.score_policy, ScorePolicy::PassThrough);
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn yaml_reads_policy_and_timeout() {
        let yaml = "base_url: http://localhost:8080\nscore_policy: clamp\ntimeout_secs: 30\n";
        let config = JudgeConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.score_policy, ScorePolicy::Clamp);
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn api_key_is_never_serialized() {
        let config = JudgeConfig::default().with_api_key("secret");
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("secret"));
        assert!(yaml.contains("api_key_env"));
    }

    #[test]
    fn api_key_in_yaml_is_ignored() {
        let yaml = "api_key: inline-secret\napi_key_env: RAGEVAL_TEST_UNSET_KEY\n";
        let config = JudgeConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let err = JudgeConfig::from_yaml_str("score_policy: round\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn clamp_policy_bounds_scores() {
        assert_eq!(ScorePolicy::Clamp.apply(1.5), 1.0);
        assert_eq!(ScorePolicy::Clamp.apply(-0.2), 0.0);
        assert_eq!(ScorePolicy::Clamp.apply(0.4), 0.4);
        assert_eq!(ScorePolicy::PassThrough.apply(1.5), 1.5);
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = JudgeConfig::from_file("/nonexistent/rageval.yaml")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/rageval.yaml"));
    }
}
