use std::sync::Arc;

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use crate::config::Config;
use crate::extraction::{DocumentTextExtractor, TextExtractor};
use crate::llm::{openai::OpenAIAdapter, LLMAdapter};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: Arc<dyn TextExtractor>,
    pub llm: Arc<dyn LLMAdapter>,
}

impl AppState {
    /// Production wiring: format-sniffing extractor and the OpenAI adapter.
    pub fn from_config(config: Config) -> Self {
        let llm = OpenAIAdapter::with_base_url(
            &config.llm.openai_api_key,
            &config.llm.openai_api_base,
        );
        Self {
            config,
            extractor: Arc::new(DocumentTextExtractor::new()),
            llm: Arc::new(llm),
        }
    }
}

/// The `file` part of an upload, held in memory for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// What the model answered: a JSON object when its content parses as one,
/// the raw text otherwise.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ExtractionOutcome {
    Json(serde_json::Map<String, serde_json::Value>),
    Text(String),
}

impl ExtractionOutcome {
    /// Strict JSON first, then JSON5 so that single-quoted keys and strings
    /// (the style the prompt's target shape is written in) still count.
    pub fn from_model_content(content: String) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(&content)
            .ok()
            .or_else(|| json5::from_str::<serde_json::Value>(&content).ok());

        match parsed {
            Some(serde_json::Value::Object(fields)) => ExtractionOutcome::Json(fields),
            _ => ExtractionOutcome::Text(content),
        }
    }
}

// The tag never reaches the wire: JSON objects go out as application/json,
// anything else as the raw text.
impl IntoResponse for ExtractionOutcome {
    fn into_response(self) -> Response {
        match self {
            ExtractionOutcome::Json(fields) => Json(fields).into_response(),
            ExtractionOutcome::Text(text) => (
                [(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref())],
                text,
            )
                .into_response(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub llm_configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_object_content_is_json() {
        let outcome = ExtractionOutcome::from_model_content(
            r#"{"First Name":"Jane","Last Name":"Doe"}"#.to_string(),
        );
        match outcome {
            ExtractionOutcome::Json(fields) => {
                assert_eq!(fields["First Name"], "Jane");
                assert_eq!(fields["Last Name"], "Doe");
            }
            other => panic!("expected json, got {:?}", other),
        }
    }

    #[test]
    fn test_single_quoted_object_is_json() {
        let outcome = ExtractionOutcome::from_model_content(
            "{'First Name': 'Jane', 'Spouse': { 'First Name': '', 'SSN': '' }, 'Dependents': []}"
                .to_string(),
        );
        match outcome {
            ExtractionOutcome::Json(fields) => {
                assert_eq!(fields["First Name"], "Jane");
                assert_eq!(fields["Spouse"]["SSN"], "");
                assert_eq!(fields["Dependents"], json!([]));
            }
            other => panic!("expected json, got {:?}", other),
        }
    }

    #[test]
    fn test_single_quoted_non_object_is_text() {
        let content = "['Jane', 'Doe']".to_string();
        assert_eq!(
            ExtractionOutcome::from_model_content(content.clone()),
            ExtractionOutcome::Text(content)
        );
    }

    #[test]
    fn test_non_object_content_is_text() {
        for content in [
            "Sorry, I could not extract fields.",
            "[1, 2, 3]",
            "\"just a string\"",
            "42",
            "",
        ] {
            assert_eq!(
                ExtractionOutcome::from_model_content(content.to_string()),
                ExtractionOutcome::Text(content.to_string())
            );
        }
    }

    #[test]
    fn test_tagged_serialization() {
        let outcome = ExtractionOutcome::Text("raw".to_string());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"kind": "text", "value": "raw"})
        );
    }

    #[test]
    fn test_response_content_types() {
        let json_response = ExtractionOutcome::from_model_content("{\"SSN\":\"\"}".to_string()).into_response();
        assert_eq!(json_response.status(), StatusCode::OK);
        assert_eq!(json_response.headers()[header::CONTENT_TYPE], "application/json");

        let text_response = ExtractionOutcome::Text("nope".to_string()).into_response();
        assert_eq!(text_response.status(), StatusCode::OK);
        assert_eq!(text_response.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
    }
}
