// Type definitions shared across the LLM layer and the HTTP edge

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::extraction::ExtractionError;
use crate::llm::LLMError;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Body of a chat-completion call. Field order matches the provider's wire format.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file uploaded")]
    NoFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Uploaded file exceeds the size limit")]
    UploadTooLarge,

    #[error("Failed to extract text from document")]
    Extraction(#[source] ExtractionError),

    #[error("OpenAI API key not set")]
    MissingApiKey,

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Error calling LLM: {0}")]
    LLMCall(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoFile | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UploadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Extraction(_)
            | AppError::MissingApiKey
            | AppError::LLMApi(_)
            | AppError::LLMCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Extraction(err)
    }
}

impl From<LLMError> for AppError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::Status { body, .. } => AppError::LLMApi(body),
            other @ (LLMError::Transport(_) | LLMError::MalformedResponse(_)) => {
                AppError::LLMCall(other.to_string())
            }
        }
    }
}

// Error bodies are plain strings; the Display text is the wire body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_bodies() {
        assert_eq!(AppError::NoFile.to_string(), "No file uploaded");
        assert_eq!(AppError::MissingApiKey.to_string(), "OpenAI API key not set");
        assert_eq!(
            AppError::Extraction(ExtractionError::UnsupportedFormat("image/png".into())).to_string(),
            "Failed to extract text from document"
        );
        assert_eq!(
            AppError::LLMApi("{\"error\":\"quota\"}".into()).to_string(),
            "LLM API error: {\"error\":\"quota\"}"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NoFile.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UploadTooLarge.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(AppError::MissingApiKey.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::LLMCall("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_llm_error_conversion() {
        let upstream = LLMError::Status {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(AppError::from(upstream).to_string(), "LLM API error: rate limited");

        let transport = LLMError::Transport("connection refused".into());
        assert_eq!(AppError::from(transport).to_string(), "Error calling LLM: connection refused");

        let malformed = LLMError::MalformedResponse("no choices".into());
        assert!(matches!(AppError::from(malformed), AppError::LLMCall(_)));
    }

    #[test]
    fn test_request_serializes_in_wire_order() {
        let request = LLMRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![LLMMessage::user("hi")],
            max_tokens: 256,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"model":"gpt-3.5-turbo","messages":[{"role":"user","content":"hi"}],"max_tokens":256}"#
        );
    }
}
