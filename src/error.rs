use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// ApiError
///
/// The error surface of the HTTP layer. Every variant maps to a status code
/// and a JSON body of the shape `{ "message": "..." }`, which is the response
/// contract clients already depend on.
#[derive(Debug)]
pub enum ApiError {
    /// Missing, malformed, or expired bearer token (401).
    Unauthorized,
    /// Valid token but insufficient role or identity mismatch (403).
    Forbidden,
    /// Missing required fields in the request payload (400).
    BadRequest(String),
    /// A store-layer failure. Logged in full, surfaced as a generic 500.
    Database(sqlx::Error),
    /// Any other internal failure (e.g. token signing) surfaced as 500.
    Internal,
}

/// JSON body carried by every error response.
#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized access".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden access".to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Database(e) => {
                // The caller gets a generic message; the operator gets the cause.
                tracing::error!("store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

// Lets repository calls in handlers use `?` directly.
impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}
