// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    engine::{attempts, quizzes},
    error::AppError,
    models::quiz::{AttemptResponse, CreateQuizRequest, UpdateQuizRequest},
    store::QuizStore,
    utils::{ids::parse_id, jwt::Claims},
};

/// Lists the quizzes of a course, oldest first.
pub async fn list_course_quizzes(
    State(store): State<Arc<dyn QuizStore>>,
    Path(cid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let course_id = parse_id("course", &cid)?;

    let quizzes = quizzes::find_quizzes_for_course(store.as_ref(), course_id).await?;
    tracing::debug!("Found {} quizzes for course {}", quizzes.len(), course_id);

    Ok(Json(quizzes))
}

/// Creates a quiz under the course in the path.
pub async fn create_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    Path(cid): Path<String>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let course_id = parse_id("course", &cid)?;
    payload.validate()?;

    let quiz = quizzes::create_quiz(store.as_ref(), course_id, payload).await?;
    tracing::info!("Created quiz {} for course {}", quiz.id, course_id);

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Lists every quiz.
pub async fn list_quizzes(
    State(store): State<Arc<dyn QuizStore>>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = quizzes::find_all_quizzes(store.as_ref()).await?;
    Ok(Json(quizzes))
}

pub async fn get_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    Path(qid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id("quiz", &qid)?;
    let quiz = quizzes::find_quiz(store.as_ref(), quiz_id).await?;
    Ok(Json(quiz))
}

/// Updates the fields present in the body; everything else is left as stored.
pub async fn update_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    Path(qid): Path<String>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id("quiz", &qid)?;
    payload.validate()?;

    let quiz = quizzes::update_quiz(store.as_ref(), quiz_id, payload.into()).await?;
    Ok(Json(quiz))
}

/// Deletes a quiz together with its questions and attempt records.
pub async fn delete_quiz(
    State(store): State<Arc<dyn QuizStore>>,
    Path(qid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id("quiz", &qid)?;

    quizzes::delete_quiz(store.as_ref(), quiz_id).await?;
    tracing::info!("Deleted quiz {}", quiz_id);

    Ok(StatusCode::NO_CONTENT)
}

/// Records an attempt by the authenticated user.
pub async fn record_attempt(
    State(store): State<Arc<dyn QuizStore>>,
    Extension(claims): Extension<Claims>,
    Path(qid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id("quiz", &qid)?;

    let count = attempts::record_attempt(store.as_ref(), quiz_id, &claims.sub).await?;
    tracing::info!(
        "User {} recorded attempt {} on quiz {}",
        claims.sub,
        count,
        quiz_id
    );

    Ok(Json(AttemptResponse {
        message: Some("Attempt recorded successfully"),
        quiz_id,
        user_id: claims.sub,
        attempt_count: count,
    }))
}

/// Returns how many attempts the authenticated user has made.
pub async fn get_attempt_count(
    State(store): State<Arc<dyn QuizStore>>,
    Extension(claims): Extension<Claims>,
    Path(qid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id("quiz", &qid)?;

    let count = attempts::get_attempt_count(store.as_ref(), quiz_id, &claims.sub).await?;

    Ok(Json(AttemptResponse {
        message: None,
        quiz_id,
        user_id: claims.sub,
        attempt_count: count,
    }))
}
