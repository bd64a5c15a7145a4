//! Error types and HTTP response conversion.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::query::QueryError;
use crate::serializer::ValidationErrors;
use crate::store::StoreError;

pub const NOT_FOUND_MESSAGE: &str = "User not found";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Failures a request handler reports to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No user with the requested id, or the id is not an integer.
    #[error("User not found")]
    NotFound,

    /// The body failed field validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// `page`, `limit` or `sort` could not be used.
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    /// The body could not be read as JSON.
    #[error("{detail}")]
    MalformedBody { status: StatusCode, detail: String },

    /// The database failed; the client only sees a generic 500.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let detail = match rejection {
            JsonRejection::JsonSyntaxError(err) => format!("JSON parse error - {}", err.body_text()),
            other => other.body_text(),
        };
        ApiError::MalformedBody { status, detail }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(QueryError::Malformed(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": NOT_FOUND_MESSAGE })),
            )
                .into_response(),
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::InvalidQuery(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response(),
            ApiError::MalformedBody { status, detail } => {
                (status, Json(json!({ "detail": detail }))).into_response()
            }
            ApiError::Store(err) => {
                tracing::error!(%err, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}

/// Failures that stop the server process.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to install tracing subscriber: {0}")]
    Telemetry(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
