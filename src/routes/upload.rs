//! Document upload endpoint
//!
//! `POST /api/upload` takes a multipart form with a `file` part and runs it
//! through extract → prompt → chat completion. Each stage is a terminal failure
//! point; the first one that fails decides the response:
//!
//! | stage | failure | status |
//! |---|---|---|
//! | read `file` part | missing or empty | 400 |
//! | text extraction | any error | 500 |
//! | credential check | empty API key | 500 |
//! | chat completion | non-2xx / transport / malformed | 500 |

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        DefaultBodyLimit, State,
    },
    http::StatusCode,
    routing::post,
    Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::extraction::{ExtractionError, TextExtractor};
use crate::models::{AppState, ExtractionOutcome, UploadedFile};
use crate::prompt::build_extraction_request;
use crate::types::{AppError, AppResult};

/// Name of the multipart part carrying the document.
pub const FILE_FIELD: &str = "file";

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;
    Router::new()
        .route("/api/upload", post(upload_document))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[instrument(name = "upload", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<ExtractionOutcome> {
    let multipart = multipart.map_err(|rejection| {
        warn!(%rejection, "Rejected non-multipart upload");
        AppError::InvalidRequest(rejection.body_text())
    })?;

    let file = match read_file_part(multipart).await? {
        Some(file) if !file.is_empty() => file,
        _ => {
            warn!("Upload carried no file or an empty file");
            return Err(AppError::NoFile);
        }
    };

    info!(
        file_name = ?file.file_name,
        content_type = ?file.content_type,
        size = file.data.len(),
        "Document received"
    );

    let text = extract_text(Arc::clone(&state.extractor), file).await?;
    info!(chars = text.chars().count(), "Text extracted");

    if !state.config.llm.has_api_key() {
        error!("OPENAI_API_KEY is not configured, refusing to call the LLM");
        return Err(AppError::MissingApiKey);
    }

    let request = build_extraction_request(&text);
    let response = state
        .llm
        .create_chat_completion(&request)
        .await
        .map_err(|e| {
            error!(error = %e, "LLM call failed");
            AppError::from(e)
        })?;

    let outcome = ExtractionOutcome::from_model_content(response.content);
    match &outcome {
        ExtractionOutcome::Json(fields) => info!(fields = fields.len(), "LLM returned JSON"),
        ExtractionOutcome::Text(_) => warn!("LLM content is not a JSON object, returning raw text"),
    }

    Ok(outcome)
}

/// Pull the first `file` part out of the form; other parts are skipped.
async fn read_file_part(mut multipart: Multipart) -> AppResult<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            data,
        }));
    }

    Ok(None)
}

fn multipart_error(err: MultipartError) -> AppError {
    warn!(error = %err, "Failed to read multipart body");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge
    } else {
        AppError::InvalidRequest(err.body_text())
    }
}

// Parsers are CPU-bound, so they run on the blocking pool.
async fn extract_text(extractor: Arc<dyn TextExtractor>, file: UploadedFile) -> AppResult<String> {
    tokio::task::spawn_blocking(move || extractor.extract(&file))
        .await
        .unwrap_or_else(|join_error| Err(ExtractionError::Task(join_error.to_string())))
        .map_err(|e| {
            warn!(error = %e, "Text extraction failed");
            AppError::Extraction(e)
        })
}
