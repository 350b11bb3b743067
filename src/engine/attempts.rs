// src/engine/attempts.rs

//! Attempt Ledger: per-user attempt counters inside a quiz.

use crate::{
    engine::require_quiz,
    error::EngineError,
    models::{quiz::QuizId, update::QuizUpdate},
    store::QuizStore,
};

/// Records one attempt by `user_id` and returns the user's new count.
///
/// The store performs find-or-increment-or-insert as one atomic step, so N
/// concurrent calls for the same pair leave exactly one record with count N.
/// Not idempotent: a retried call after an applied one counts twice.
pub async fn record_attempt(
    store: &dyn QuizStore,
    quiz_id: QuizId,
    user_id: &str,
) -> Result<u32, EngineError> {
    let quiz = store
        .apply(
            quiz_id,
            QuizUpdate::RecordAttempt {
                user: user_id.to_string(),
            },
        )
        .await?
        .ok_or(EngineError::QuizNotFound(quiz_id))?;

    Ok(quiz.attempt_count(user_id))
}

/// Returns how many attempts `user_id` has recorded, 0 if none yet.
pub async fn get_attempt_count(
    store: &dyn QuizStore,
    quiz_id: QuizId,
    user_id: &str,
) -> Result<u32, EngineError> {
    let quiz = require_quiz(store, quiz_id).await?;
    Ok(quiz.attempt_count(user_id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::{
        engine::fixtures::seeded_store,
        store::MemoryQuizStore,
    };

    #[tokio::test]
    async fn counts_are_independent_per_user() {
        let (store, quiz_id) = seeded_store(&[]).await;

        assert_eq!(record_attempt(&store, quiz_id, "u1").await.unwrap(), 1);
        assert_eq!(record_attempt(&store, quiz_id, "u1").await.unwrap(), 2);
        assert_eq!(record_attempt(&store, quiz_id, "u2").await.unwrap(), 1);
        assert_eq!(get_attempt_count(&store, quiz_id, "u3").await.unwrap(), 0);
        assert_eq!(get_attempt_count(&store, quiz_id, "u1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn missing_quiz_is_not_found() {
        let store = MemoryQuizStore::new();
        let quiz_id = Uuid::new_v4();

        let err = record_attempt(&store, quiz_id, "u1").await.unwrap_err();
        assert!(matches!(err, EngineError::QuizNotFound(id) if id == quiz_id));

        let err = get_attempt_count(&store, quiz_id, "u1").await.unwrap_err();
        assert!(matches!(err, EngineError::QuizNotFound(id) if id == quiz_id));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_attempts_never_duplicate_records() {
        let (store, quiz_id) = seeded_store(&[]).await;
        let store = Arc::new(store);
        const N: u32 = 64;

        let mut handles = Vec::new();
        for _ in 0..N {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                record_attempt(&*store, quiz_id, "racer").await.unwrap()
            }));
        }

        let mut seen = Vec::new();
        for h in handles {
            seen.push(h.await.unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (1..=N).collect::<Vec<_>>());

        let quiz = store.fetch(quiz_id).await.unwrap().unwrap();
        let records: Vec<_> = quiz.attempts.iter().filter(|a| a.user == "racer").collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].count, N);
    }
}
