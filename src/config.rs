// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Regions offered for the Bedrock provider
pub const SUPPORTED_REGIONS: [&str; 4] = ["us-east-2", "us-east-1", "us-west-2", "eu-west-1"];

/// Bounds for the conversation window
pub const MIN_WINDOW_SIZE: usize = 5;
pub const MAX_WINDOW_SIZE: usize = 50;

/// Catalog source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory holding catalog CSV files, relative to the working directory
    pub assets_path: PathBuf,
    pub file_name: String,
    /// How many search matches are handed to the model
    pub context_results: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            assets_path: PathBuf::from("assets"),
            file_name: "base_autopartes_dummy.csv".to_string(),
            context_results: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Bedrock,
    OpenAi,
}

impl std::str::FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bedrock" => Ok(Provider::Bedrock),
            "openai" => Ok(Provider::OpenAi),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Hosted model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Provider,
    pub region: String,
    pub model: String,
    /// Overrides the endpoint derived from provider and region
    pub endpoint: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    /// Total attempts per turn, including the first
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Bedrock,
            region: "us-east-2".to_string(),
            model: "us.amazon.nova-lite-v1:0".to_string(),
            endpoint: None,
            api_key_env: "AWS_BEARER_TOKEN_BEDROCK".to_string(),
            connect_timeout_secs: 60,
            read_timeout_secs: 300,
            max_attempts: 2,
            retry_backoff_ms: 500,
            max_tokens: 7000,
            temperature: 0.15,
            top_p: 0.9,
        }
    }
}

impl LlmConfig {
    /// Base URL requests are sent to
    pub fn resolved_endpoint(&self) -> String {
        if let Some(endpoint) = &self.endpoint {
            return endpoint.trim_end_matches('/').to_string();
        }
        match self.provider {
            Provider::Bedrock => format!("https://bedrock-runtime.{}.amazonaws.com", self.region),
            Provider::OpenAi => "https://api.openai.com/v1".to_string(),
        }
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> std::result::Result<String, ConfigError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingCredential(self.api_key_env.clone())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub window_size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            window_size: crate::memory::window::DEFAULT_WINDOW_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Replaces the built-in system prompt when set
    pub system_prompt: Option<String>,
}

/// Main configuration for autoparts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub llm: LlmConfig,
    pub memory: MemoryConfig,
    pub prompt: PromptConfig,
}

impl Config {
    /// Load configuration from config.toml file
    /// First tries to load from system config directory, falls back to embedded template
    pub fn load() -> Result<Self> {
        let config_path = crate::storage::get_system_config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::from_toml_str(&content)
                .with_context(|| format!("Invalid configuration in {}", config_path.display()))?
        } else {
            // Config doesn't exist, create from template
            let template_content = include_str!("../config-templates/default.toml");
            let config = Self::from_toml_str(template_content)?;

            if let Some(parent) = config_path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&config_path, template_content)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject values outside their documented ranges
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let window = self.memory.window_size;
        if !(MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(&window) {
            return Err(ConfigError::OutOfRange {
                field: "memory.window_size",
                min: MIN_WINDOW_SIZE as u64,
                max: MAX_WINDOW_SIZE as u64,
                value: window as u64,
            });
        }

        if self.llm.max_attempts == 0 || self.llm.max_attempts > 5 {
            return Err(ConfigError::OutOfRange {
                field: "llm.max_attempts",
                min: 1,
                max: 5,
                value: self.llm.max_attempts as u64,
            });
        }

        if self.llm.provider == Provider::Bedrock
            && self.llm.endpoint.is_none()
            && !SUPPORTED_REGIONS.contains(&self.llm.region.as_str())
        {
            return Err(ConfigError::UnsupportedRegion(
                self.llm.region.clone(),
                SUPPORTED_REGIONS.join(", "),
            ));
        }

        Ok(())
    }

    /// System prompt in effect: the configured override or the built-in one
    pub fn system_prompt(&self) -> String {
        match &self.prompt.system_prompt {
            Some(prompt) if !prompt.trim().is_empty() => prompt.clone(),
            _ => crate::chat::prompt::DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let config = Config::from_toml_str(include_str!("../config-templates/default.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.provider, Provider::Bedrock);
        assert_eq!(config.llm.model, LlmConfig::default().model);
        assert_eq!(config.llm.max_attempts, 2);
        assert_eq!(config.memory.window_size, 10);
        assert_eq!(config.catalog.file_name, "base_autopartes_dummy.csv");
        assert!(config.prompt.system_prompt.is_none());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config = Config::from_toml_str("[memory]\nwindow_size = 20\n").unwrap();
        assert_eq!(config.memory.window_size, 20);
        assert_eq!(config.llm.region, "us-east-2");
        assert_eq!(config.catalog.context_results, 5);
    }

    #[test]
    fn test_window_size_bounds() {
        let mut config = Config::default();
        config.memory.window_size = 4;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "memory.window_size", .. })
        ));
        config.memory.window_size = 51;
        assert!(config.validate().is_err());
        config.memory.window_size = 50;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_region() {
        let mut config = Config::default();
        config.llm.region = "ap-south-1".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedRegion(..))
        ));

        // An explicit endpoint skips the region check
        config.llm.endpoint = Some("http://localhost:9000".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolved_endpoint() {
        let mut llm = LlmConfig::default();
        assert_eq!(
            llm.resolved_endpoint(),
            "https://bedrock-runtime.us-east-2.amazonaws.com"
        );

        llm.provider = Provider::OpenAi;
        assert_eq!(llm.resolved_endpoint(), "https://api.openai.com/v1");

        llm.endpoint = Some("http://localhost:8080/v1/".to_string());
        assert_eq!(llm.resolved_endpoint(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_missing_credential() {
        let llm = LlmConfig {
            api_key_env: "AUTOPARTS_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            llm.api_key(),
            Err(ConfigError::MissingCredential(name)) if name == "AUTOPARTS_TEST_KEY_THAT_IS_NEVER_SET"
        ));
    }

    #[test]
    fn test_system_prompt_override() {
        let mut config = Config::default();
        assert_eq!(
            config.system_prompt(),
            crate::chat::prompt::DEFAULT_SYSTEM_PROMPT
        );

        config.prompt.system_prompt = Some("Responde en inglés.".to_string());
        assert_eq!(config.system_prompt(), "Responde en inglés.");

        config.prompt.system_prompt = Some("   ".to_string());
        assert_eq!(
            config.system_prompt(),
            crate::chat::prompt::DEFAULT_SYSTEM_PROMPT
        );
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert!("vertex".parse::<Provider>().is_err());
    }
}
