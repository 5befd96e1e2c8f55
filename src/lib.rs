//! replyforge - LLM-backed relevance screening and reply drafting
//!
//! This library classifies social media posts for topical relevance and
//! drafts short, subtly promotional replies using a large-language-model
//! backend. Backends are interchangeable: a cloud-hosted chat-completion
//! provider (Azure OpenAI) or a locally hosted model runtime (Ollama).
//!
//! # Core Concepts
//!
//! - **Chatbot**: the capability trait with two operations,
//!   [`Chatbot::is_post_relevant`] and [`Chatbot::generate_reply`]. Callers
//!   hold a trait object and never depend on a concrete backend.
//! - **Post**: the immutable, request-scoped input ([`SocialMediaPost`]).
//! - **Backends**: [`AzureChatbot`] uses structured output for the relevance
//!   decision; [`OllamaChatbot`] decides from deterministic free text.
//!
//! Every call is a stateless single-turn request: no retries, no streaming,
//! no conversation memory. Failures surface synchronously as
//! [`ChatbotError`] values.
//!
//! # Example Usage
//!
//! ```ignore
//! use replyforge::{Chatbot, ReplyforgeConfig, SocialMediaPost};
//!
//! async fn screen_and_reply(post: SocialMediaPost) -> Result<(), Box<dyn std::error::Error>> {
//!     let bot = ReplyforgeConfig::default().create_chatbot()?;
//!
//!     if bot.is_post_relevant(&post).await? {
//!         let reply = bot.generate_reply(&post).await?;
//!         println!("{}", reply);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`chatbot`]: the capability trait, backends, and prompt plumbing
//! - [`post`]: the post input type
//! - [`config`]: environment-driven configuration
//! - [`util`]: logging setup

// Public modules
pub mod chatbot;
pub mod config;
pub mod post;
pub mod util;

// Re-export key types for convenient access
pub use chatbot::azure::AzureChatbot;
pub use chatbot::backend::{BackendConfig, Chatbot, ChatbotError};
pub use chatbot::ollama::OllamaChatbot;
pub use chatbot::prompt::{PromptBuilder, SYSTEM_PROMPT};
pub use config::{ConfigError, Provider, ReplyforgeConfig};
pub use post::SocialMediaPost;
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_replyforge() {
        assert_eq!(NAME, "replyforge");
    }
}
