use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors surfaced by the query and ingest handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unknown timeframe '{0}', expected one of 1h|6h|12h|1d|30d")]
    InvalidTimeframe(String),

    #[error("device not found")]
    DeviceNotFound,

    #[error("data store unavailable")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidTimeframe(_) => StatusCode::BAD_REQUEST,
            ApiError::DeviceNotFound => StatusCode::NOT_FOUND,
            ApiError::Database(e) => {
                // Store failures are transient from the caller's point of
                // view; the detail stays in the server log.
                tracing::error!("database error: {:?}", e);
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
