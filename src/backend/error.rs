use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::budget::money::AmountError;
use crate::budget::AllocationError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad user input, caught at the boundary before it reaches the store.
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// A persistence call failed. Not retried; surfaced to the caller.
    #[error("storage unavailable")]
    Gateway(#[from] sqlx::Error),

    /// The allocator was handed a malformed shape. A programming error.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

impl From<AmountError> for ApiError {
    fn from(e: AmountError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Gateway(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            ApiError::Gateway(e) => {
                error!("persistence call failed: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Allocation(e) => {
                error!("allocator rejected its input: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
