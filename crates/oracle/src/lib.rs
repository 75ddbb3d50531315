//! Client for the text-generation service.
//!
//! The reading engines depend only on [`TextGenerator`]; the HTTP client
//! here is the production implementation, speaking the chat-completions
//! protocol over [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use arcana_core::prompt::GenerationPrompt;

/// Wall-clock limit for a single generation call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the generation-service client.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Generation service error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response parsed but did not contain usable text.
    #[error("Malformed generation response: {0}")]
    Malformed(String),
}

/// Anything that can turn a prompt into reading text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<String, OracleError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceContent,
}

#[derive(Debug, Deserialize)]
struct ChoiceContent {
    content: String,
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// HTTP client for a chat-completions generation endpoint.
pub struct OracleClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OracleClient {
    /// Create a client for the given endpoint.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `https://api.openai.com`.
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }

    /// Ensure the response has a success status code, or surface the
    /// status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, OracleError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(OracleError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OracleClient {
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<String, OracleError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
        };

        tracing::debug!(
            model = %self.model,
            max_tokens = prompt.max_tokens,
            "requesting text generation"
        );

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ChatResponse = Self::ensure_success(response).await?.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| OracleError::Malformed("response carried no choices".to_string()))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(OracleError::Malformed("response text was empty".to_string()));
        }
        Ok(text.to_string())
    }
}
