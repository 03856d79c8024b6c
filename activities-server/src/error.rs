use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures that map onto a specific HTTP status instead of a 500.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("bad request: {0}")]
    BadRequest(Value),
    #[error("unauthorized")]
    Unauthorized,
}

impl RestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RestError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn errors(&self) -> Value {
        match self {
            RestError::NotFound(what) => json!({ *what: "Not found" }),
            RestError::BadRequest(errors) => errors.clone(),
            RestError::Unauthorized => json!({ "user": "Unknown or missing user" }),
        }
    }

    pub fn bad_request(field: &str, message: &str) -> Self {
        RestError::BadRequest(json!({ field: message }))
    }
}

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn rest(&self) -> Option<&RestError> {
        self.0.downcast_ref::<RestError>()
    }
}

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.rest() {
            Some(rest) => (rest.status(), Json(json!({ "errors": rest.errors() }))).into_response(),
            None => {
                tracing::error!(error = %self.0, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "errors": { "server": format!("Something went wrong: {}", self.0) } })),
                )
                    .into_response()
            }
        }
    }
}

// This enables using `?` on functions that return `Result<_, anyhow::Error>` to turn them into
// `Result<_, AppError>`.
impl<E> From<E> for AppError
    where
        E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
