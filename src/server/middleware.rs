use axum::{
    body::{Body, Bytes, HttpBody},
    extract::State,
    http::{Response, StatusCode},
    response::IntoResponse,
    BoxError,
};

use super::AppState;
use crate::error::AppError;

/// Render body-limit rejections in the same JSON error shape as every other
/// failure. Both the limit layer and the body extractor answer with a bare 413.
pub async fn json_payload_too_large<B>(
    State(state): State<AppState>,
    response: Response<B>,
) -> axum::response::Response
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge {
            max: state.settings.server.max_body_bytes,
        }
        .into_response();
    }
    response.map(Body::new)
}
