//! Document processing endpoint.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::document::DOCX_MIME_TYPE;
use crate::error::AppError;
use crate::processing::{content_disposition, ProcessRequest};
use crate::server::AppState;

pub const PROCESS_PATH: &str = "/process-word-document";

/// POST /process-word-document - Fill the template and return it as a download
#[tracing::instrument(
    name = "http.process_word_document",
    skip(state, body),
    fields(request_id = %uuid::Uuid::new_v4())
)]
pub async fn process_word_document(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    tracing::info!("Document processing started");

    let request = ProcessRequest::from_json(&body)?;
    let processed = state.processor.process(request).await?;

    let disposition = HeaderValue::from_str(&content_disposition(&processed.filename))
        .map_err(|e| AppError::Unexpected(format!("invalid download filename: {}", e)))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(DOCX_MIME_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(processed.bytes),
    )
        .into_response())
}
