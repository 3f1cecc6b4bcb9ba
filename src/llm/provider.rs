use async_trait::async_trait;
use crate::types::{LLMRequest, LLMResponse};

/// Failure modes of a single chat-completion call.
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    /// The provider answered with a non-2xx status; `body` is forwarded verbatim.
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    /// A 2xx answer whose envelope lacks `choices[0].message.content`.
    #[error("malformed LLM response: {0}")]
    MalformedResponse(String),
}

pub type LLMResult<T> = std::result::Result<T, LLMError>;

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> LLMResult<LLMResponse>;
}
