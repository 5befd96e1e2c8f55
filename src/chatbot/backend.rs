//! Chatbot abstraction layer
//!
//! This module provides the core trait and types for implementing different
//! chatbot backends (cloud-hosted chat completions, local model runtimes).
//! All backends must implement the `Chatbot` trait so callers can swap
//! providers without touching classification or reply logic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::post::SocialMediaPost;

/// Errors that can occur during chatbot operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatbotError {
    /// The backend terminated a completion abnormally (truncation, filter)
    IncompleteResponse { finish_reason: String },

    /// Reply generation produced no usable text
    EmptyGeneration,

    /// API request failed with the given message
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Request timed out after the specified duration (in seconds)
    TimeoutError { seconds: u64 },

    /// Network-related error
    NetworkError { message: String },

    /// Invalid or malformed response from the backend
    InvalidResponse {
        message: String,
        raw_response: Option<String>,
    },

    /// Configuration error (missing credentials, invalid settings, etc.)
    ConfigurationError { message: String },
}

impl fmt::Display for ChatbotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatbotError::IncompleteResponse { finish_reason } => {
                write!(f, "Completion did not finish normally: {}", finish_reason)
            }
            ChatbotError::EmptyGeneration => {
                write!(f, "Backend returned no usable reply text")
            }
            ChatbotError::ApiError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "API error ({}): {}", code, message)
                } else {
                    write!(f, "API error: {}", message)
                }
            }
            ChatbotError::TimeoutError { seconds } => {
                write!(f, "Request timed out after {} seconds", seconds)
            }
            ChatbotError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            ChatbotError::InvalidResponse { message, .. } => {
                write!(f, "Invalid response from backend: {}", message)
            }
            ChatbotError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for ChatbotError {}

/// Configuration for the supported chatbot backends
///
/// This enum lets callers select a backend at construction time with the
/// connection parameters that backend needs, and nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Azure OpenAI chat-completions configuration
    Azure {
        /// Resource endpoint (e.g., "https://myresource.openai.azure.com")
        endpoint: String,
        /// API key for authentication
        api_key: String,
        /// Deployment/model name (e.g., "gpt-4o")
        model: String,
        /// Request timeout in seconds (default: 30)
        timeout_seconds: Option<u64>,
    },

    /// Local Ollama configuration
    Ollama {
        /// Ollama API host (e.g., "http://localhost:11434")
        host: String,
        /// Model name (e.g., "llama3.1")
        model: String,
        /// Request timeout in seconds (default: 60)
        timeout_seconds: Option<u64>,
    },
}

impl BackendConfig {
    /// Returns the timeout in seconds for this configuration
    pub fn timeout_seconds(&self) -> u64 {
        match self {
            BackendConfig::Azure {
                timeout_seconds, ..
            } => timeout_seconds.unwrap_or(30),
            BackendConfig::Ollama {
                timeout_seconds, ..
            } => timeout_seconds.unwrap_or(60),
        }
    }

    /// Returns the model identifier for this configuration
    pub fn model_name(&self) -> &str {
        match self {
            BackendConfig::Azure { model, .. } => model,
            BackendConfig::Ollama { model, .. } => model,
        }
    }

    /// Creates a chatbot instance for this configuration
    ///
    /// # Errors
    ///
    /// Returns `ChatbotError::ConfigurationError` if required connection
    /// parameters are empty.
    pub fn create_chatbot(&self) -> Result<Arc<dyn Chatbot>, ChatbotError> {
        use crate::chatbot::azure::AzureChatbot;
        use crate::chatbot::ollama::OllamaChatbot;
        use std::time::Duration;

        let timeout = Duration::from_secs(self.timeout_seconds());

        match self {
            BackendConfig::Azure {
                endpoint,
                api_key,
                model,
                ..
            } => {
                if endpoint.is_empty() || api_key.is_empty() || model.is_empty() {
                    return Err(ChatbotError::ConfigurationError {
                        message: "Azure backend requires endpoint, api_key and model".to_string(),
                    });
                }
                Ok(Arc::new(AzureChatbot::with_timeout(
                    endpoint.clone(),
                    api_key.clone(),
                    model.clone(),
                    timeout,
                )))
            }
            BackendConfig::Ollama { host, model, .. } => {
                if host.is_empty() || model.is_empty() {
                    return Err(ChatbotError::ConfigurationError {
                        message: "Ollama backend requires host and model".to_string(),
                    });
                }
                Ok(Arc::new(OllamaChatbot::with_timeout(
                    host.clone(),
                    model.clone(),
                    timeout,
                )))
            }
        }
    }
}

/// Core trait that all chatbot backends must implement
///
/// This trait provides a uniform interface for classifying posts and drafting
/// replies. Every call is a stateless, single-turn request; implementations
/// hold only immutable configuration, so a single instance can be shared
/// across tasks with `Arc`.
///
/// # Example
///
/// ```ignore
/// use replyforge::{Chatbot, SocialMediaPost};
///
/// async fn handle_post(
///     bot: &dyn Chatbot,
///     post: SocialMediaPost,
/// ) -> Result<(), Box<dyn std::error::Error>> {
///     if bot.is_post_relevant(&post).await? {
///         let reply = bot.generate_reply(&post).await?;
///         println!("{}", reply);
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Chatbot: Send + Sync + std::fmt::Debug {
    /// Classifies whether a post matches the target customer profile
    ///
    /// Sends a single-turn request pairing the fixed system prompt with a
    /// yes/no user message. The post must carry a title; content may be
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns `ChatbotError` if the network call fails or the backend
    /// response cannot be interpreted.
    async fn is_post_relevant(&self, post: &SocialMediaPost) -> Result<bool, ChatbotError>;

    /// Drafts a short, subtly promotional reply to a post
    ///
    /// The returned string is trimmed, never empty, and stripped of exactly
    /// one layer of wrapping double quotes when the model adds one.
    ///
    /// # Errors
    ///
    /// Returns `ChatbotError::EmptyGeneration` if the backend produced no
    /// usable text, or a transport error if the network call fails.
    async fn generate_reply(&self, post: &SocialMediaPost) -> Result<String, ChatbotError>;

    /// Returns the human-readable name of this backend
    fn name(&self) -> &str;

    /// Returns optional model information for this backend
    fn model_info(&self) -> Option<String> {
        None
    }
}

/// Strips exactly one layer of wrapping double quotes from a reply
///
/// The input is trimmed first. Quotes are removed only when the text both
/// starts and ends with `"`; unmatched or interior quotes are left alone.
pub(crate) fn strip_wrapping_quotes(message: &str) -> &str {
    let message = message.trim();
    if message.len() >= 2 && message.starts_with('"') && message.ends_with('"') {
        &message[1..message.len() - 1]
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_incomplete_response() {
        let error = ChatbotError::IncompleteResponse {
            finish_reason: "length".to_string(),
        };
        assert!(error.to_string().contains("length"));
        assert!(error.to_string().contains("did not finish"));
    }

    #[test]
    fn test_error_display_api_error_with_status() {
        let error = ChatbotError::ApiError {
            message: "Test error".to_string(),
            status_code: Some(500),
        };
        assert!(error.to_string().contains("500"));
        assert!(error.to_string().contains("Test error"));
    }

    #[test]
    fn test_backend_config_timeout_defaults() {
        let config = BackendConfig::Azure {
            endpoint: "https://example.openai.azure.com".to_string(),
            api_key: "key".to_string(),
            model: "gpt-4o".to_string(),
            timeout_seconds: None,
        };
        assert_eq!(config.timeout_seconds(), 30);

        let config = BackendConfig::Ollama {
            host: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            timeout_seconds: None,
        };
        assert_eq!(config.timeout_seconds(), 60);
    }

    #[test]
    fn test_backend_config_model_name() {
        let config = BackendConfig::Ollama {
            host: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            timeout_seconds: Some(10),
        };
        assert_eq!(config.model_name(), "llama3.1");
        assert_eq!(config.timeout_seconds(), 10);
    }

    #[test]
    fn test_create_chatbot_rejects_empty_credentials() {
        let config = BackendConfig::Azure {
            endpoint: "https://example.openai.azure.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            timeout_seconds: None,
        };
        let result = config.create_chatbot();
        assert!(matches!(
            result.unwrap_err(),
            ChatbotError::ConfigurationError { .. }
        ));
    }

    #[test]
    fn test_create_chatbot_selects_backend_by_config() {
        let config = BackendConfig::Ollama {
            host: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            timeout_seconds: None,
        };
        let bot = config.create_chatbot().unwrap();
        assert_eq!(bot.name(), "ollama");

        let config = BackendConfig::Azure {
            endpoint: "https://example.openai.azure.com".to_string(),
            api_key: "key".to_string(),
            model: "gpt-4o".to_string(),
            timeout_seconds: None,
        };
        let bot = config.create_chatbot().unwrap();
        assert_eq!(bot.name(), "azure-openai");
    }

    #[test]
    fn test_backend_config_serde_tagged() {
        let json = r#"{"type":"ollama","host":"http://localhost:11434","model":"llama3.1","timeout_seconds":null}"#;
        let config: BackendConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(config, BackendConfig::Ollama { .. }));
    }

    #[test]
    fn test_strip_wrapping_quotes_removes_one_layer() {
        assert_eq!(strip_wrapping_quotes("\"Great point!\""), "Great point!");
        assert_eq!(
            strip_wrapping_quotes("  \"Great point!\"  "),
            "Great point!"
        );
    }

    #[test]
    fn test_strip_wrapping_quotes_leaves_unmatched_quotes() {
        assert_eq!(
            strip_wrapping_quotes("He said \"hi\" to me"),
            "He said \"hi\" to me"
        );
        assert_eq!(strip_wrapping_quotes("\"leading only"), "\"leading only");
        assert_eq!(strip_wrapping_quotes("trailing only\""), "trailing only\"");
    }

    #[test]
    fn test_strip_wrapping_quotes_single_quote_char() {
        // A lone quote character starts and ends with '"', but there is no
        // pair to strip.
        assert_eq!(strip_wrapping_quotes("\""), "\"");
    }

    #[test]
    fn test_strip_wrapping_quotes_keeps_inner_pair() {
        assert_eq!(strip_wrapping_quotes("\"\"nested\"\""), "\"nested\"");
    }
}
