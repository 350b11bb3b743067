// src/engine/quizzes.rs

//! Whole-aggregate quiz operations. Thin pass-through over the store.

use crate::{
    engine::require_quiz,
    error::EngineError,
    models::{
        quiz::{CourseId, CreateQuizRequest, Quiz, QuizFilter, QuizId, QuizPatch},
        update::QuizUpdate,
    },
    store::QuizStore,
};

pub async fn create_quiz(
    store: &dyn QuizStore,
    course_id: CourseId,
    request: CreateQuizRequest,
) -> Result<Quiz, EngineError> {
    Ok(store.insert(request.into_quiz(course_id)).await?)
}

pub async fn find_quiz(store: &dyn QuizStore, quiz_id: QuizId) -> Result<Quiz, EngineError> {
    require_quiz(store, quiz_id).await
}

pub async fn find_quizzes_for_course(
    store: &dyn QuizStore,
    course_id: CourseId,
) -> Result<Vec<Quiz>, EngineError> {
    Ok(store
        .fetch_many(QuizFilter {
            course_id: Some(course_id),
        })
        .await?)
}

pub async fn find_all_quizzes(store: &dyn QuizStore) -> Result<Vec<Quiz>, EngineError> {
    Ok(store.fetch_many(QuizFilter::default()).await?)
}

/// Sets the fields present in `patch`. Absent fields, and the attempt
/// records, are left as stored.
pub async fn update_quiz(
    store: &dyn QuizStore,
    quiz_id: QuizId,
    patch: QuizPatch,
) -> Result<Quiz, EngineError> {
    store
        .apply(quiz_id, QuizUpdate::SetFields(patch))
        .await?
        .ok_or(EngineError::QuizNotFound(quiz_id))
}

/// Deletes the quiz and everything embedded in it.
pub async fn delete_quiz(store: &dyn QuizStore, quiz_id: QuizId) -> Result<(), EngineError> {
    if store.delete(quiz_id).await? {
        Ok(())
    } else {
        Err(EngineError::QuizNotFound(quiz_id))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::{
        engine::{attempts::record_attempt, fixtures::quiz_request},
        store::MemoryQuizStore,
    };

    #[tokio::test]
    async fn lists_by_course_in_creation_order() {
        let store = MemoryQuizStore::new();
        let (course, other) = (Uuid::new_v4(), Uuid::new_v4());

        let first = create_quiz(&store, course, quiz_request("First", &[])).await.unwrap();
        let second = create_quiz(&store, course, quiz_request("Second", &[])).await.unwrap();
        create_quiz(&store, other, quiz_request("Elsewhere", &[])).await.unwrap();

        let listed = find_quizzes_for_course(&store, course).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|q| q.id).collect();
        assert_eq!(ids, [first.id, second.id]);
        assert_eq!(find_all_quizzes(&store).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn partial_update_keeps_questions_and_attempts() {
        let store = MemoryQuizStore::new();
        let quiz = create_quiz(&store, Uuid::new_v4(), quiz_request("Q", &["A", "B"]))
            .await
            .unwrap();
        record_attempt(&store, quiz.id, "u1").await.unwrap();

        let updated = update_quiz(
            &store,
            quiz.id,
            QuizPatch {
                title: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.points, quiz.points);
        assert_eq!(updated.questions, quiz.questions);
        assert_eq!(updated.attempt_count("u1"), 1);
    }

    #[tokio::test]
    async fn delete_then_fetch_is_not_found() {
        let store = MemoryQuizStore::new();
        let quiz = create_quiz(&store, Uuid::new_v4(), quiz_request("Q", &[]))
            .await
            .unwrap();

        delete_quiz(&store, quiz.id).await.unwrap();
        assert!(find_quiz(&store, quiz.id).await.unwrap_err().is_not_found());
        assert!(delete_quiz(&store, quiz.id).await.unwrap_err().is_not_found());
    }
}
