use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use userbase_core::DomainError;
use userbase_infra::{DbError, RepoError};

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body failed shape validation; nothing was sent to the database.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::NotFound => Self::NotFound("not found".to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Repo(err) => repo_error_to_response(err),
        }
    }
}

/// Log a repository failure and map it to a status code.
///
/// Conflicts reported by the database keep their meaning; other remote and
/// transport failures are the upstream's fault (502); anything we could not
/// make sense of is ours (500).
pub fn repo_error_to_response(err: RepoError) -> Response {
    tracing::error!(error = %err, "users repository call failed");
    match err {
        RepoError::Db(DbError::Remote { status: 409, message, .. }) => {
            json_error(StatusCode::CONFLICT, "conflict", message)
        }
        RepoError::Db(DbError::Remote { message, .. }) => {
            json_error(StatusCode::BAD_GATEWAY, "upstream_error", message)
        }
        RepoError::Db(DbError::Transport(e)) => {
            json_error(StatusCode::BAD_GATEWAY, "upstream_error", e.to_string())
        }
        RepoError::Db(e @ (DbError::Decode(_) | DbError::Config(_))) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string())
        }
        RepoError::InvalidRow(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
