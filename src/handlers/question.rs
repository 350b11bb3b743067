// src/handlers/question.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    engine::questions,
    error::AppError,
    models::question::QuestionRequest,
    store::QuizStore,
    utils::ids::parse_id,
};

/// Appends a question to a quiz.
/// Responds with the whole question list; the new question is last.
pub async fn add_question(
    State(store): State<Arc<dyn QuizStore>>,
    Path(qid): Path<String>,
    Json(payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id("quiz", &qid)?;
    payload.validate()?;

    let questions = questions::add_question(store.as_ref(), quiz_id, payload).await?;

    Ok((StatusCode::CREATED, Json(questions)))
}

/// Replaces a question in place, keeping its id and position.
pub async fn update_question(
    State(store): State<Arc<dyn QuizStore>>,
    Path((qid, question_id)): Path<(String, String)>,
    Json(payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id("quiz", &qid)?;
    let question_id = parse_id("question", &question_id)?;
    payload.validate()?;

    let quiz = questions::update_question(store.as_ref(), quiz_id, question_id, payload).await?;

    Ok(Json(quiz))
}

/// Removes a question. Deleting an unknown question id still succeeds.
pub async fn delete_question(
    State(store): State<Arc<dyn QuizStore>>,
    Path((qid, question_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let quiz_id = parse_id("quiz", &qid)?;
    let question_id = parse_id("question", &question_id)?;

    let quiz = questions::delete_question(store.as_ref(), quiz_id, question_id).await?;

    Ok(Json(quiz))
}
