//! Configuration management for replyforge
//!
//! This module loads settings from environment variables with sensible
//! defaults. Configuration covers backend selection, connection parameters,
//! and runtime options.
//!
//! # Environment Variables
//!
//! ## Replyforge Configuration
//! - `REPLYFORGE_PROVIDER`: Backend selection (azure|ollama) - default: "ollama"
//! - `REPLYFORGE_MODEL`: Model/deployment name - default: provider-specific
//! - `REPLYFORGE_REQUEST_TIMEOUT`: Timeout in seconds - default: "30"
//! - `REPLYFORGE_LOG_LEVEL`: Logging level - default: "info"
//!
//! ## Provider Configuration
//! - **Azure**: `AZURE_OPENAI_ENDPOINT` (required), `AZURE_OPENAI_API_KEY` (required)
//! - **Ollama**: `OLLAMA_HOST` (default: http://localhost:11434)
//!
//! # Example
//!
//! ```no_run
//! use replyforge::ReplyforgeConfig;
//! use std::env;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! env::set_var("REPLYFORGE_PROVIDER", "ollama");
//!
//! let config = ReplyforgeConfig::default();
//! config.validate()?;
//!
//! let bot = config.create_chatbot()?;
//! # Ok(())
//! # }
//! ```

use crate::chatbot::backend::{BackendConfig, Chatbot, ChatbotError};
use std::env;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Default values for configuration
const DEFAULT_AZURE_MODEL: &str = "gpt-4o";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid provider name
    #[error("Invalid provider: {0}. Valid options: azure, ollama")]
    InvalidProvider(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Backend initialization failed
    #[error("Backend initialization failed: {0}")]
    BackendInitError(#[from] ChatbotError),
}

/// Supported chatbot providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Azure OpenAI chat completions
    Azure,
    /// Local Ollama runtime
    Ollama,
}

impl Provider {
    /// Parses a provider from its lowercase name
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "azure" => Ok(Provider::Azure),
            "ollama" => Ok(Provider::Ollama),
            other => Err(ConfigError::InvalidProvider(other.to_string())),
        }
    }
}

/// Main configuration structure for replyforge
///
/// Construct with `Default::default()` to load from environment variables
/// with fallback defaults.
#[derive(Debug, Clone)]
pub struct ReplyforgeConfig {
    /// Selected chatbot provider
    pub provider: Provider,

    /// Model name to use for inference (provider-specific)
    pub model: String,

    /// Azure resource endpoint (azure provider only)
    pub azure_endpoint: Option<String>,

    /// Azure API key (azure provider only)
    pub azure_api_key: Option<String>,

    /// Ollama host URL (ollama provider only)
    pub ollama_host: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ReplyforgeConfig {
    /// Creates a configuration by loading environment variables with defaults
    fn default() -> Self {
        let provider = env::var("REPLYFORGE_PROVIDER")
            .ok()
            .and_then(|s| Provider::parse(&s).ok())
            .unwrap_or(Provider::Ollama);

        let model = env::var("REPLYFORGE_MODEL")
            .ok()
            .unwrap_or_else(|| match provider {
                Provider::Azure => DEFAULT_AZURE_MODEL.to_string(),
                Provider::Ollama => DEFAULT_OLLAMA_MODEL.to_string(),
            });

        let azure_endpoint = env::var("AZURE_OPENAI_ENDPOINT").ok();
        let azure_api_key = env::var("AZURE_OPENAI_API_KEY").ok();

        let ollama_host =
            env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string());

        let request_timeout_secs = env::var("REPLYFORGE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let log_level = env::var("REPLYFORGE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            provider,
            model,
            azure_endpoint,
            azure_api_key,
            ollama_host,
            request_timeout_secs,
            log_level,
        }
    }
}

impl ReplyforgeConfig {
    /// Validates the configuration
    ///
    /// Checks that numeric values are in valid ranges, the log level is
    /// recognized, and the selected provider has its connection parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any validation fails
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.model.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name cannot be empty".to_string(),
            ));
        }

        if self.provider == Provider::Azure {
            if self.azure_endpoint.as_deref().unwrap_or("").is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "Azure provider requires AZURE_OPENAI_ENDPOINT".to_string(),
                ));
            }
            if self.azure_api_key.as_deref().unwrap_or("").is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "Azure provider requires AZURE_OPENAI_API_KEY".to_string(),
                ));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Builds the backend configuration for the selected provider
    pub fn backend_config(&self) -> BackendConfig {
        match self.provider {
            Provider::Azure => BackendConfig::Azure {
                endpoint: self.azure_endpoint.clone().unwrap_or_default(),
                api_key: self.azure_api_key.clone().unwrap_or_default(),
                model: self.model.clone(),
                timeout_seconds: Some(self.request_timeout_secs),
            },
            Provider::Ollama => BackendConfig::Ollama {
                host: self.ollama_host.clone(),
                model: self.model.clone(),
                timeout_seconds: Some(self.request_timeout_secs),
            },
        }
    }

    /// Creates a chatbot instance for the configured provider
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation or backend construction fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use replyforge::ReplyforgeConfig;
    /// use std::env;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// env::set_var("REPLYFORGE_PROVIDER", "ollama");
    ///
    /// let bot = ReplyforgeConfig::default().create_chatbot()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn create_chatbot(&self) -> Result<Arc<dyn Chatbot>, ConfigError> {
        self.validate()?;
        let bot = self.backend_config().create_chatbot()?;
        Ok(bot)
    }
}

impl fmt::Display for ReplyforgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Replyforge Configuration:")?;
        writeln!(f, "  Provider: {:?}", self.provider)?;
        writeln!(f, "  Model: {}", self.model)?;
        if let Some(ref endpoint) = self.azure_endpoint {
            writeln!(f, "  Azure Endpoint: {}", endpoint)?;
        }
        writeln!(f, "  Ollama Host: {}", self.ollama_host)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn azure_config() -> ReplyforgeConfig {
        ReplyforgeConfig {
            provider: Provider::Azure,
            model: "gpt-4o".to_string(),
            azure_endpoint: Some("https://example.openai.azure.com".to_string()),
            azure_api_key: Some("secret-key".to_string()),
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("REPLYFORGE_PROVIDER"),
            EnvGuard::unset("REPLYFORGE_MODEL"),
            EnvGuard::unset("OLLAMA_HOST"),
            EnvGuard::unset("REPLYFORGE_REQUEST_TIMEOUT"),
            EnvGuard::unset("REPLYFORGE_LOG_LEVEL"),
        ];

        let config = ReplyforgeConfig::default();

        assert_eq!(config.provider, Provider::Ollama);
        assert_eq!(config.model, DEFAULT_OLLAMA_MODEL);
        assert_eq!(config.ollama_host, DEFAULT_OLLAMA_HOST);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("REPLYFORGE_PROVIDER", "azure"),
            EnvGuard::set("REPLYFORGE_MODEL", "custom-model"),
            EnvGuard::set("AZURE_OPENAI_ENDPOINT", "https://custom.openai.azure.com"),
            EnvGuard::set("AZURE_OPENAI_API_KEY", "secret"),
            EnvGuard::set("REPLYFORGE_REQUEST_TIMEOUT", "60"),
            EnvGuard::set("REPLYFORGE_LOG_LEVEL", "DEBUG"),
        ];

        let config = ReplyforgeConfig::default();

        assert_eq!(config.provider, Provider::Azure);
        assert_eq!(config.model, "custom-model");
        assert_eq!(
            config.azure_endpoint.as_deref(),
            Some("https://custom.openai.azure.com")
        );
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(Provider::parse("azure").unwrap(), Provider::Azure);
        assert_eq!(Provider::parse("Ollama").unwrap(), Provider::Ollama);
        assert!(matches!(
            Provider::parse("openai"),
            Err(ConfigError::InvalidProvider(_))
        ));
    }

    #[test]
    fn test_validation_valid() {
        assert!(azure_config().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_timeout() {
        let mut config = azure_config();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_missing_azure_credentials() {
        let mut config = azure_config();
        config.azure_api_key = None;

        let result = config.validate();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationFailed(_)
        ));
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = azure_config();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_config_for_azure() {
        let config = azure_config();
        let backend = config.backend_config();
        assert!(matches!(backend, BackendConfig::Azure { .. }));
        assert_eq!(backend.model_name(), "gpt-4o");
        assert_eq!(backend.timeout_seconds(), 30);
    }

    #[test]
    fn test_create_chatbot_for_ollama() {
        let config = ReplyforgeConfig {
            provider: Provider::Ollama,
            model: "llama3.1".to_string(),
            azure_endpoint: None,
            azure_api_key: None,
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        };

        let bot = config.create_chatbot().unwrap();
        assert_eq!(bot.name(), "ollama");
    }

    #[test]
    fn test_config_display_omits_api_key() {
        let display = format!("{}", azure_config());
        assert!(display.contains("Replyforge Configuration:"));
        assert!(display.contains("Provider: Azure"));
        assert!(!display.contains("secret-key"));
    }
}
