//! Chatbot backend integrations
//!
//! This module provides the capability trait and the two interchangeable
//! backends that power relevance screening and reply drafting.

pub mod azure;
pub mod backend;
pub mod ollama;
pub mod prompt;

// Re-export commonly used types
pub use azure::AzureChatbot;
pub use backend::{BackendConfig, Chatbot, ChatbotError};
pub use ollama::OllamaChatbot;
pub use prompt::{PromptBuilder, SYSTEM_PROMPT};
