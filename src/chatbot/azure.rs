//! Azure OpenAI chat-completions client
//!
//! This module implements the cloud variant of the chatbot. Relevance checks
//! use structured output (a one-field JSON schema) so the decision is parsed
//! without free-text ambiguity; reply generation is plain text.
//!
//! # Example
//!
//! ```no_run
//! use replyforge::chatbot::azure::AzureChatbot;
//! use replyforge::chatbot::Chatbot;
//! use replyforge::post::SocialMediaPost;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bot = AzureChatbot::new(
//!     "https://myresource.openai.azure.com".to_string(),
//!     "api-key".to_string(),
//!     "gpt-4o".to_string(),
//! );
//!
//! let post = SocialMediaPost::with_content("Job search tips?", "Any advice on job boards?");
//! if bot.is_post_relevant(&post).await? {
//!     let reply = bot.generate_reply(&post).await?;
//!     println!("{}", reply);
//! }
//! # Ok(())
//! # }
//! ```

use crate::chatbot::backend::{strip_wrapping_quotes, Chatbot, ChatbotError};
use crate::chatbot::prompt::{PromptBuilder, SYSTEM_PROMPT};
use crate::post::SocialMediaPost;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Default request timeout for Azure OpenAI API calls
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Azure OpenAI API version used for all requests
const API_VERSION: &str = "2024-12-01-preview";

/// Output budget for the structured relevance check
const RELEVANCE_MAX_TOKENS: u32 = 5000;

/// Output budget for reply generation
const REPLY_MAX_TOKENS: u32 = 16384;

/// Azure OpenAI chatbot for cloud inference
///
/// Holds only immutable configuration plus a pooled HTTP client, so a single
/// instance can be shared across tasks with `Arc`. Each operation is one
/// outbound request with no retries and no local state.
pub struct AzureChatbot {
    /// Azure resource endpoint (e.g., "https://myresource.openai.azure.com")
    endpoint: String,

    /// API key sent in the `api-key` header
    api_key: String,

    /// Deployment/model name
    model: String,

    /// Shared HTTP client with connection pooling
    http_client: Client,

    /// Request timeout duration
    timeout: Duration,

    /// System prompt paired with every request
    system_prompt: String,
}

impl AzureChatbot {
    /// Creates a new Azure chatbot with the default timeout
    pub fn new(endpoint: String, api_key: String, model: String) -> Self {
        Self::with_timeout(
            endpoint,
            api_key,
            model,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Creates a new Azure chatbot with a custom timeout
    pub fn with_timeout(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            endpoint,
            api_key,
            model,
            http_client,
            timeout,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replaces the fixed system prompt
    ///
    /// Intended for tests and callers that market a different product; the
    /// default is [`SYSTEM_PROMPT`].
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    fn chat_completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            API_VERSION
        )
    }

    /// Internal method to call the chat-completions API
    async fn send_chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatbotError> {
        let url = self.chat_completions_url();

        debug!(
            "Sending request to Azure OpenAI: model={}, messages={}",
            self.model,
            request.messages.len()
        );

        let start = Instant::now();

        let response = self
            .http_client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Azure OpenAI request timed out after {:?}", self.timeout);
                    ChatbotError::TimeoutError {
                        seconds: self.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    error!("Cannot connect to Azure OpenAI at {}", self.endpoint);
                    ChatbotError::NetworkError {
                        message: format!("Connection failed: {}", e),
                    }
                } else {
                    error!("Azure OpenAI request error: {}", e);
                    ChatbotError::NetworkError {
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let elapsed = start.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            error!("Azure OpenAI returned error status {}: {}", status, body);

            return Err(ChatbotError::ApiError {
                message: format!("HTTP {}: {}", status, body),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Azure OpenAI response: {}", e);
            ChatbotError::InvalidResponse {
                message: format!("JSON parse error: {}", e),
                raw_response: None,
            }
        })?;

        info!(
            "Azure OpenAI completion finished in {:.2}s (model={})",
            elapsed.as_secs_f64(),
            self.model
        );

        debug!(
            "Azure OpenAI usage: prompt_tokens={}, completion_tokens={}",
            chat_response
                .usage
                .as_ref()
                .map(|u| u.prompt_tokens)
                .unwrap_or(0),
            chat_response
                .usage
                .as_ref()
                .map(|u| u.completion_tokens)
                .unwrap_or(0),
        );

        Ok(chat_response)
    }

    /// Extracts the relevance decision from a structured completion
    ///
    /// Any finish reason other than "stop" is a hard failure; the decision is
    /// never defaulted from a truncated completion.
    fn relevance_from_response(response: &ChatResponse) -> Result<bool, ChatbotError> {
        let choice = response
            .choices
            .first()
            .ok_or_else(|| ChatbotError::InvalidResponse {
                message: "No choices in completion".to_string(),
                raw_response: None,
            })?;

        match choice.finish_reason.as_deref() {
            Some("stop") => {}
            other => {
                return Err(ChatbotError::IncompleteResponse {
                    finish_reason: other.unwrap_or("unknown").to_string(),
                })
            }
        }

        let content = choice
            .message
            .as_ref()
            .map(|m| m.content.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or("{}");

        let decision: PostRelevance =
            serde_json::from_str(content).map_err(|e| ChatbotError::InvalidResponse {
                message: format!("Malformed relevance payload: {}", e),
                raw_response: Some(content.chars().take(200).collect()),
            })?;

        Ok(decision.is_relevant)
    }

    /// Extracts and post-processes the reply text from a completion
    fn reply_from_response(response: &ChatResponse) -> Result<String, ChatbotError> {
        let message = response
            .choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .map(|m| m.content.trim())
            .unwrap_or("");

        if message.is_empty() {
            return Err(ChatbotError::EmptyGeneration);
        }

        Ok(strip_wrapping_quotes(message).to_string())
    }
}

#[async_trait]
impl Chatbot for AzureChatbot {
    /// Classifies a post using a schema-constrained yes/no completion
    ///
    /// Posts with an empty or absent body are never relevant and are rejected
    /// without issuing a network call. The local backend has no such guard;
    /// the asymmetry is intentional and documented there.
    async fn is_post_relevant(&self, post: &SocialMediaPost) -> Result<bool, ChatbotError> {
        if !post.has_content() {
            debug!("Post has no content, skipping relevance check");
            return Ok(false);
        }

        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: PromptBuilder::relevance_prompt(post),
                },
            ],
            max_completion_tokens: RELEVANCE_MAX_TOKENS,
            response_format: Some(relevance_response_format()),
        };

        let response = self.send_chat(request).await?;
        let relevant = Self::relevance_from_response(&response)?;

        info!("Relevance decision for \"{}\": {}", post.title, relevant);

        Ok(relevant)
    }

    async fn generate_reply(&self, post: &SocialMediaPost) -> Result<String, ChatbotError> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: PromptBuilder::reply_prompt(post),
                },
            ],
            max_completion_tokens: REPLY_MAX_TOKENS,
            response_format: None,
        };

        let response = self.send_chat(request).await?;
        let reply = Self::reply_from_response(&response)?;

        debug!("Generated reply with {} characters", reply.len());

        Ok(reply)
    }

    fn name(&self) -> &str {
        "azure-openai"
    }

    fn model_info(&self) -> Option<String> {
        Some(format!("{} @ {}", self.model, self.endpoint))
    }
}

impl fmt::Debug for AzureChatbot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureChatbot")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Structured-output constraint for the relevance check
///
/// Restricts the completion to `{"isRelevant": <bool>}` so the decision can
/// be parsed directly.
fn relevance_response_format() -> serde_json::Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "PostRelevance",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "isRelevant": { "type": "boolean" }
                },
                "required": ["isRelevant"],
                "additionalProperties": false
            }
        }
    })
}

/// Message structure for the chat-completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    role: String,
    /// Message content
    content: String,
}

/// Request structure for the chat-completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatRequest {
    /// Ordered conversation messages
    messages: Vec<ChatMessage>,
    /// Maximum tokens the completion may produce
    max_completion_tokens: u32,
    /// Optional structured-output constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

/// Response structure from the chat-completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatResponse {
    /// Response ID
    id: Option<String>,
    /// Object type
    object: Option<String>,
    /// Creation timestamp
    created: Option<i64>,
    /// Model used
    model: Option<String>,
    /// Array of completion choices
    choices: Vec<Choice>,
    /// Token usage statistics
    usage: Option<Usage>,
}

/// Completion choice from the API response
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    /// Choice index
    index: Option<u32>,
    /// Completion-termination reason ("stop" for a normal finish)
    finish_reason: Option<String>,
    /// Message content
    message: Option<ChatMessage>,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    /// Number of prompt tokens
    prompt_tokens: u32,
    /// Number of completion tokens
    completion_tokens: u32,
    /// Total tokens
    total_tokens: u32,
}

/// Structured relevance payload returned by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PostRelevance {
    #[serde(rename = "isRelevant")]
    is_relevant: bool,
}
