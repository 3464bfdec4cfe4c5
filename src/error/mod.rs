use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::Serialize;
use thiserror::Error;

use crate::document::DocumentError;
use crate::template_source::TemplateSourceError;

#[derive(Error, Debug)]
pub enum AppError {
    /// A required input field is missing or the body is unreadable
    #[error("{0}")]
    Validation(String),

    /// The template store answered with a non-success status
    #[error("Could not download template. Status: {status}")]
    Download { status: u16 },

    #[error("Request body exceeds {max} bytes")]
    PayloadTooLarge { max: usize },

    #[error("Malformed document: {0}")]
    MalformedDocument(#[source] DocumentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Download { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MalformedDocument(_)
            | AppError::Io(_)
            | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TemplateSourceError> for AppError {
    fn from(err: TemplateSourceError) -> Self {
        match err {
            TemplateSourceError::Status { status } => AppError::Download { status },
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Io(e) => AppError::Io(e),
            other => AppError::MalformedDocument(other),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        // Always log the detailed error server-side
        tracing::error!(
            status = %status.as_u16(),
            message = %message,
            "API error"
        );

        let body = ErrorResponse {
            error: message,
            timestamp: Local::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
