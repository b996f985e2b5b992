//! Run configuration
//!
//! Loaded from an optional YAML file; the CLI layers environment variables
//! and flags on top.

use crate::normalize::LabelNormalizer;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    #[default]
    OpenAI,
    #[serde(rename = "azure")]
    AzureOpenAI,
    Anthropic,
    Gemini,
    Ollama,
}

impl LLMProvider {
    /// Whether calls need an API key
    pub fn requires_api_key(self) -> bool {
        !matches!(self, LLMProvider::Ollama)
    }

    /// Default API base URL; Azure has none and must be configured
    pub fn default_base_url(self) -> Option<&'static str> {
        match self {
            LLMProvider::OpenAI => Some("https://api.openai.com/v1"),
            LLMProvider::AzureOpenAI => None,
            LLMProvider::Anthropic => Some("https://api.anthropic.com/v1"),
            LLMProvider::Gemini => Some("https://generativelanguage.googleapis.com/v1beta"),
            LLMProvider::Ollama => Some("http://localhost:11434"),
        }
    }
}

impl fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LLMProvider::OpenAI => "openai",
            LLMProvider::AzureOpenAI => "azure",
            LLMProvider::Anthropic => "anthropic",
            LLMProvider::Gemini => "gemini",
            LLMProvider::Ollama => "ollama",
        };
        f.write_str(name)
    }
}

impl FromStr for LLMProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "azure" | "azureopenai" | "azure-openai" => Ok(LLMProvider::AzureOpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            other => Err(ConfigError::InvalidValue(format!("unknown provider '{}'", other))),
        }
    }
}

/// Relationship inference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Enabled status
    pub enabled: bool,
    /// The LLM provider to use
    pub provider: LLMProvider,
    /// Model name; the deployment name for Azure
    pub model: String,
    /// API key
    pub api_key: Option<String>,
    /// API base URL (the resource endpoint for Azure)
    pub api_base_url: Option<String>,
    /// Azure `api-version` query parameter
    pub api_version: String,
    /// Override for the built-in system prompt
    pub system_prompt: Option<String>,
    /// Pairs per request
    pub batch_size: usize,
    /// Pause between consecutive requests
    pub delay_ms: u64,
    /// Minimum score for a judgment to become an edge
    pub score_threshold: u8,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        InferenceConfig {
            enabled: true,
            provider: LLMProvider::default(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            api_base_url: None,
            api_version: "2024-06-01".to_string(),
            system_prompt: None,
            batch_size: 5,
            delay_ms: 1000,
            score_threshold: 5,
            temperature: 0.3,
            timeout_secs: 60,
        }
    }
}

impl InferenceConfig {
    /// Name the first missing credential or identifier, if any
    pub fn missing_credentials(&self) -> Option<String> {
        if self.model.trim().is_empty() {
            return Some("model".to_string());
        }
        if self.provider.requires_api_key()
            && self.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Some(format!("API key for {}", self.provider));
        }
        if self.provider.default_base_url().is_none()
            && self.api_base_url.as_deref().map_or(true, |u| u.trim().is_empty())
        {
            return Some(format!("API base URL for {}", self.provider));
        }
        None
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue("batch_size must be at least 1".to_string()));
        }
        if self.score_threshold > 10 {
            return Err(ConfigError::InvalidValue(
                "score_threshold must be between 0 and 10".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source identifier written into the output metadata
    pub source: Option<String>,
    pub inference: InferenceConfig,
    /// Extra synonym entries (variant -> canonical) on top of the built-in table
    pub synonyms: IndexMap<String, String>,
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.inference.validate()?;
        config.validate_synonyms()?;
        Ok(config)
    }

    /// Extra synonyms must keep normalization idempotent on top of the
    /// built-in table
    pub fn validate_synonyms(&self) -> ConfigResult<()> {
        let normalizer = LabelNormalizer::new().extend(self.synonyms.clone());
        match normalizer.conflict() {
            Some(problem) => Err(ConfigError::InvalidValue(format!("synonyms: {}", problem))),
            None => Ok(()),
        }
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InferenceConfig::default();
        assert!(config.enabled);
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.score_threshold, 5);
        assert_eq!(config.delay_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_credentials() {
        let mut config = InferenceConfig::default();
        assert!(config.missing_credentials().unwrap().contains("API key"));

        config.api_key = Some("sk-test".to_string());
        assert_eq!(config.missing_credentials(), None);

        config.provider = LLMProvider::AzureOpenAI;
        assert!(config.missing_credentials().unwrap().contains("base URL"));
        config.api_base_url = Some("https://example.openai.azure.com".to_string());
        assert_eq!(config.missing_credentials(), None);

        config.model = " ".to_string();
        assert_eq!(config.missing_credentials().as_deref(), Some("model"));

        let ollama = InferenceConfig {
            provider: LLMProvider::Ollama,
            ..Default::default()
        };
        assert_eq!(ollama.missing_credentials(), None);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<LLMProvider>().unwrap(), LLMProvider::OpenAI);
        assert_eq!("azure".parse::<LLMProvider>().unwrap(), LLMProvider::AzureOpenAI);
        assert_eq!("ollama".parse::<LLMProvider>().unwrap(), LLMProvider::Ollama);
        assert!("bard".parse::<LLMProvider>().is_err());
        assert_eq!(LLMProvider::AzureOpenAI.to_string(), "azure");
    }

    #[test]
    fn test_yaml_config() {
        let yaml = r#"
source: people-ops/employees.json
inference:
  provider: anthropic
  model: claude-sonnet
  batch_size: 3
  delay_ms: 0
synonyms:
  自己研鑽: 成長
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.source.as_deref(), Some("people-ops/employees.json"));
        assert_eq!(config.inference.provider, LLMProvider::Anthropic);
        assert_eq!(config.inference.batch_size, 3);
        assert_eq!(config.inference.delay_ms, 0);
        assert_eq!(config.inference.score_threshold, 5);
        assert_eq!(config.synonyms.get("自己研鑽").map(String::as_str), Some("成長"));
    }

    #[test]
    fn test_yaml_rejects_zero_batch() {
        let result = Config::from_yaml_str("inference:\n  batch_size: 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_yaml_rejects_synonym_chain() {
        let result = Config::from_yaml_str("synonyms:\n  Rustlang: rust\n  rust: Rust言語\n");
        match result {
            Err(ConfigError::InvalidValue(msg)) => assert!(msg.contains("Rustlang")),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_yaml_rejects_slug_shaped_variant() {
        let result = Config::from_yaml_str("synonyms:\n  rust: Rust言語\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));

        // chains through the built-in table count too
        let result = Config::from_yaml_str("synonyms:\n  Amazon: Amazon Web Services\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }
}
