//! Ollama HTTP client for local inference
//!
//! This module implements the local variant of the chatbot on top of the
//! Ollama chat API. Relevance checks run with fully deterministic sampling
//! and decide from the leading token of the free-text answer instead of a
//! structured payload.
//!
//! # Example
//!
//! ```no_run
//! use replyforge::chatbot::ollama::OllamaChatbot;
//! use replyforge::chatbot::Chatbot;
//! use replyforge::post::SocialMediaPost;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bot = OllamaChatbot::new(
//!     "http://localhost:11434".to_string(),
//!     "llama3.1".to_string(),
//! );
//!
//! if bot.health_check().await? {
//!     let post = SocialMediaPost::with_content("Job search tips?", "Any advice?");
//!     let relevant = bot.is_post_relevant(&post).await?;
//!     println!("relevant: {}", relevant);
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
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Default request timeout for Ollama API calls
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Ollama chatbot for local inference
///
/// Communicates with a local Ollama server over its chat endpoint. Holds only
/// immutable configuration plus a pooled HTTP client; share with `Arc` for
/// concurrent use.
pub struct OllamaChatbot {
    /// Ollama API host URL
    host: String,

    /// Model name to use for inference
    model: String,

    /// Shared HTTP client with connection pooling
    http_client: Client,

    /// Request timeout duration
    timeout: Duration,

    /// System prompt paired with every request
    system_prompt: String,
}

impl OllamaChatbot {
    /// Creates a new Ollama chatbot with the default timeout
    pub fn new(host: String, model: String) -> Self {
        Self::with_timeout(host, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new Ollama chatbot with a custom timeout
    pub fn with_timeout(host: String, model: String, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            host,
            model,
            http_client,
            timeout,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replaces the fixed system prompt
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Checks if the Ollama server is available and healthy
    ///
    /// Makes a lightweight request to the `/api/tags` endpoint.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if Ollama is healthy, `Ok(false)` if unreachable,
    /// or `Err` for other connection errors.
    pub async fn health_check(&self) -> Result<bool, ChatbotError> {
        let url = format!("{}/api/tags", self.host);

        debug!("Checking Ollama health at {}", url);

        match self.http_client.get(&url).send().await {
            Ok(response) => {
                let is_healthy = response.status().is_success();
                if is_healthy {
                    info!("Ollama health check successful");
                } else {
                    warn!(
                        "Ollama health check failed with status: {}",
                        response.status()
                    );
                }
                Ok(is_healthy)
            }
            Err(e) => {
                if e.is_timeout() {
                    warn!("Ollama health check timed out");
                    Ok(false)
                } else if e.is_connect() {
                    warn!("Cannot connect to Ollama at {}", self.host);
                    Ok(false)
                } else {
                    error!("Ollama health check error: {}", e);
                    Err(ChatbotError::NetworkError {
                        message: format!("Health check failed: {}", e),
                    })
                }
            }
        }
    }

    /// Internal method to call the Ollama chat API
    async fn send_chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatbotError> {
        let url = format!("{}/api/chat", self.host);

        debug!(
            "Sending request to Ollama: model={}, messages={}",
            self.model,
            request.messages.len()
        );

        let start = Instant::now();

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Ollama request timed out after {:?}", self.timeout);
                    ChatbotError::TimeoutError {
                        seconds: self.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    error!("Cannot connect to Ollama at {}", self.host);
                    ChatbotError::NetworkError {
                        message: format!("Connection failed: {}", e),
                    }
                } else {
                    error!("Ollama request error: {}", e);
                    ChatbotError::NetworkError {
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let elapsed = start.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            error!("Ollama API returned error status {}: {}", status, body);

            if status.as_u16() == 404 && body.contains("model") {
                return Err(ChatbotError::ApiError {
                    message: format!(
                        "Model '{}' not found. Please pull it with: ollama pull {}",
                        self.model, self.model
                    ),
                    status_code: Some(404),
                });
            }

            return Err(ChatbotError::ApiError {
                message: format!("HTTP {}: {}", status, body),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Ollama response: {}", e);
            ChatbotError::InvalidResponse {
                message: format!("JSON parse error: {}", e),
                raw_response: None,
            }
        })?;

        if !chat_response.done {
            warn!("Ollama response indicates incomplete generation");
        }

        info!(
            "Ollama chat completed in {:.2}s (model={})",
            elapsed.as_secs_f64(),
            self.model
        );

        debug!(
            "Ollama stats: prompt_tokens={}, eval_tokens={}",
            chat_response.prompt_eval_count.unwrap_or(0),
            chat_response.eval_count.unwrap_or(0),
        );

        Ok(chat_response)
    }

    /// Derives the relevance decision from free-text model output
    ///
    /// An absent or empty response yields `false` rather than an error.
    fn relevance_from_text(text: Option<&str>) -> bool {
        text.map(|t| t.trim().to_lowercase().starts_with("yes"))
            .unwrap_or(false)
    }

    /// Extracts and post-processes the reply text from a chat response
    fn reply_from_response(response: &ChatResponse) -> Result<String, ChatbotError> {
        let message = response
            .message
            .as_ref()
            .map(|m| m.content.trim())
            .unwrap_or("");

        if message.is_empty() {
            return Err(ChatbotError::EmptyGeneration);
        }

        Ok(strip_wrapping_quotes(message).to_string())
    }
}

#[async_trait]
impl Chatbot for OllamaChatbot {
    /// Classifies a post with deterministic sampling and a yes/no prompt
    ///
    /// Unlike the Azure backend there is no empty-content guard: posts with
    /// an empty body still go to the model. The asymmetry mirrors the
    /// production behavior and is kept on purpose.
    async fn is_post_relevant(&self, post: &SocialMediaPost) -> Result<bool, ChatbotError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: PromptBuilder::relevance_prompt_strict(post),
                },
            ],
            stream: false,
            options: Some(SamplingOptions::deterministic()),
        };

        let response = self.send_chat(request).await?;
        let relevant =
            Self::relevance_from_text(response.message.as_ref().map(|m| m.content.as_str()));

        info!("Relevance decision for \"{}\": {}", post.title, relevant);

        Ok(relevant)
    }

    async fn generate_reply(&self, post: &SocialMediaPost) -> Result<String, ChatbotError> {
        let request = ChatRequest {
            model: self.model.clone(),
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
            stream: false,
            options: None,
        };

        let response = self.send_chat(request).await?;
        let reply = Self::reply_from_response(&response)?;

        debug!("Generated reply with {} characters", reply.len());

        Ok(reply)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model_info(&self) -> Option<String> {
        Some(format!("{} @ {}", self.model, self.host))
    }
}

impl fmt::Debug for OllamaChatbot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaChatbot")
            .field("host", &self.host)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Message structure for the Ollama chat API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    role: String,
    /// Message content
    content: String,
}

/// Sampling options for the Ollama chat API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SamplingOptions {
    /// Temperature for sampling (0.0 = deterministic)
    temperature: f32,
    /// Top-p (nucleus) sampling parameter
    top_p: f32,
    /// Frequency penalty
    frequency_penalty: f32,
    /// Presence penalty
    presence_penalty: f32,
}

impl SamplingOptions {
    /// Fully deterministic sampling for the relevance check
    fn deterministic() -> Self {
        Self {
            temperature: 0.0,
            top_p: 0.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// Request structure for the Ollama chat API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatRequest {
    /// Model name to use for generation
    model: String,

    /// Ordered conversation messages
    messages: Vec<ChatMessage>,

    /// Whether to stream the response (always false here)
    stream: bool,

    /// Optional sampling overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<SamplingOptions>,
}

/// Response structure from the Ollama chat API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatResponse {
    /// Model that was used
    model: Option<String>,

    /// Timestamp when the response was created
    created_at: Option<String>,

    /// Generated assistant message
    message: Option<ChatMessage>,

    /// Whether generation is complete
    done: bool,

    /// Total duration in nanoseconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    total_duration: Option<u64>,

    /// Number of tokens in the prompt (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_eval_count: Option<u32>,

    /// Number of tokens generated (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    eval_count: Option<u32>,
}
