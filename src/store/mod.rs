// src/store/mod.rs

//! The aggregate store contract.
//!
//! A store keeps one document per quiz and applies each [`QuizUpdate`] as a
//! single atomic step, linearizable per document. Engines above it hold no
//! state and take no locks of their own.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::models::{
    quiz::{Quiz, QuizFilter, QuizId},
    update::QuizUpdate,
};

pub use memory::MemoryQuizStore;
pub use postgres::PgQuizStore;

#[derive(Debug)]
pub enum StoreError {
    /// The backing database failed or was unreachable.
    Database(sqlx::Error),

    /// A stored document could not be decoded into a `Quiz`.
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "database error: {}", e),
            StoreError::Decode(msg) => write!(f, "corrupt quiz document: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            StoreError::Decode(_) => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Stores a new document. The id is chosen by the caller.
    async fn insert(&self, quiz: Quiz) -> Result<Quiz, StoreError>;

    async fn fetch(&self, id: QuizId) -> Result<Option<Quiz>, StoreError>;

    /// Lists documents matching `filter`, oldest first.
    async fn fetch_many(&self, filter: QuizFilter) -> Result<Vec<Quiz>, StoreError>;

    /// Applies `update` atomically. Returns the post-update document, or `None`
    /// when no document matched (quiz missing, or the update's predicate failed).
    async fn apply(&self, id: QuizId, update: QuizUpdate) -> Result<Option<Quiz>, StoreError>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: QuizId) -> Result<bool, StoreError>;
}
