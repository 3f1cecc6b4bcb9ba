// OpenAI chat-completions adapter
// API Reference: https://platform.openai.com/docs/api-reference/chat/create
//
// The raw response body is read before decoding so that non-2xx answers can be
// forwarded to the caller untouched.

use crate::config::DEFAULT_OPENAI_API_BASE;
use crate::llm::provider::{LLMAdapter, LLMError, LLMResult};
use crate::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Model used for field extraction.
pub const EXTRACTION_MODEL: &str = "gpt-3.5-turbo";
/// Completion budget for the extracted JSON.
pub const EXTRACTION_MAX_TOKENS: u32 = 256;

pub struct OpenAIAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

// Only the path `choices[0].message.content` is consumed.
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAIAdapter {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_OPENAI_API_BASE)
    }

    /// Point the adapter at an OpenAI-compatible endpoint, e.g. a proxy or a test server.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn parse_content(body: &str) -> LLMResult<String> {
        let envelope: ChatCompletionResponse = serde_json::from_str(body)
            .map_err(|e| LLMError::MalformedResponse(format!("response is not JSON: {}", e)))?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                LLMError::MalformedResponse("missing choices[0].message.content".to_string())
            })
    }
}

#[async_trait]
impl LLMAdapter for OpenAIAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> LLMResult<LLMResponse> {
        let url = self.completions_url();
        debug!(model = %request.model, max_tokens = request.max_tokens, "Calling chat completions");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| LLMError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LLMError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(LLMError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let content = Self::parse_content(&body)?;
        Ok(LLMResponse { content })
    }
}
