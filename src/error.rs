// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{
    models::{question::QuestionId, quiz::QuizId},
    store::StoreError,
};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Typed failures raised by the attempt ledger and the question set manager.
///
/// The engine never logs or formats responses; the HTTP boundary decides how
/// each kind is reported.
#[derive(Debug)]
pub enum EngineError {
    /// The referenced quiz does not exist.
    QuizNotFound(QuizId),

    /// The quiz exists but holds no question with this id.
    QuestionNotFound {
        quiz_id: QuizId,
        question_id: QuestionId,
    },

    /// Reserved for payload checks beyond the store's own constraints.
    InvalidState(String),

    /// The store could not complete the operation. Never retried here.
    StoreUnavailable(StoreError),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::QuizNotFound(_) | EngineError::QuestionNotFound { .. }
        )
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::QuizNotFound(id) => write!(f, "Quiz not found: {}", id),
            EngineError::QuestionNotFound {
                quiz_id,
                question_id,
            } => write!(
                f,
                "Question {} not found in quiz {}",
                question_id, quiz_id
            ),
            EngineError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            EngineError::StoreUnavailable(err) => write!(f, "Store unavailable: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::StoreUnavailable(err)
    }
}

/// Maps engine failures onto HTTP status codes.
impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::QuizNotFound(_) => AppError::NotFound("Quiz not found".to_string()),
            EngineError::QuestionNotFound { .. } => {
                AppError::NotFound("Question not found".to_string())
            }
            EngineError::InvalidState(msg) => AppError::Conflict(msg),
            EngineError::StoreUnavailable(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}
