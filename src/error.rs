use crate::core::ExtractionError;
use crate::models::ErrorResponse;
use crate::services::CompletionError;
use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use thiserror::Error;

pub const QUERY_REQUIRED: &str = "Query is required";
pub const QUERY_TOO_LONG: &str = "Query is too long";
pub const INVALID_BODY: &str = "Invalid request body";
pub const INTERNAL_ERROR: &str = "An internal server error occurred.";

/// Everything that can end a search request early
///
/// Validation errors carry a client-facing message. Upstream and extraction
/// errors are logged where they happen and always render as the same generic
/// 500 body.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("completion call failed: {0}")]
    Upstream(#[from] CompletionError),

    #[error("could not extract results: {0}")]
    Extraction(#[from] ExtractionError),
}

impl error::ResponseError for SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            SearchError::Validation(_) => StatusCode::BAD_REQUEST,
            SearchError::Upstream(_) | SearchError::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            SearchError::Validation(message) => *message,
            SearchError::Upstream(_) | SearchError::Extraction(_) => INTERNAL_ERROR,
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(message))
    }
}

/// Handle JSON payload errors
///
/// Malformed bodies, wrong content types and non-string `query` fields all
/// end up here. They get a 400 with `"Invalid request body"` instead of
/// collapsing into the generic 500 used for downstream failures. No outbound
/// call is made for them.
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    SearchError::Validation(INVALID_BODY).into()
}
