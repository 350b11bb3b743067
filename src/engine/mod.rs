// src/engine/mod.rs

//! Attempt accounting and nested-question mutation over a [`QuizStore`].
//!
//! Every mutating operation here is exactly one `QuizStore::apply` call. Reads
//! that follow a miss only classify the error; they never feed a write.

pub mod attempts;
pub mod questions;
pub mod quizzes;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::{
    error::EngineError,
    models::quiz::{Quiz, QuizId},
    store::QuizStore,
};

/// Fetches a quiz, failing with `QuizNotFound` when it does not exist.
pub(crate) async fn require_quiz(store: &dyn QuizStore, id: QuizId) -> Result<Quiz, EngineError> {
    store
        .fetch(id)
        .await?
        .ok_or(EngineError::QuizNotFound(id))
}
