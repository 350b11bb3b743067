// src/engine/questions.rs

//! Question Set Manager: questions embedded in a quiz, addressed by id.

use uuid::Uuid;

use crate::{
    error::EngineError,
    models::{
        question::{Question, QuestionId, QuestionRequest},
        quiz::{Quiz, QuizId},
        update::QuizUpdate,
    },
    store::QuizStore,
};

/// Appends a question under a fresh id.
/// Returns the quiz's full question sequence; the new entry is last.
pub async fn add_question(
    store: &dyn QuizStore,
    quiz_id: QuizId,
    request: QuestionRequest,
) -> Result<Vec<Question>, EngineError> {
    let question = request.into_question(Uuid::new_v4());

    let quiz = store
        .apply(quiz_id, QuizUpdate::PushQuestion(question))
        .await?
        .ok_or(EngineError::QuizNotFound(quiz_id))?;

    Ok(quiz.questions)
}

/// Replaces the content of `question_id` in place.
pub async fn update_question(
    store: &dyn QuizStore,
    quiz_id: QuizId,
    question_id: QuestionId,
    request: QuestionRequest,
) -> Result<Quiz, EngineError> {
    let question = request.into_question(question_id);

    match store
        .apply(quiz_id, QuizUpdate::ReplaceQuestion(question))
        .await?
    {
        Some(quiz) => Ok(quiz),
        // Classify the miss for the caller; nothing is written here.
        None => match store.fetch(quiz_id).await? {
            Some(_) => Err(EngineError::QuestionNotFound {
                quiz_id,
                question_id,
            }),
            None => Err(EngineError::QuizNotFound(quiz_id)),
        },
    }
}

/// Removes `question_id`. Removing an absent id succeeds unchanged.
pub async fn delete_question(
    store: &dyn QuizStore,
    quiz_id: QuizId,
    question_id: QuestionId,
) -> Result<Quiz, EngineError> {
    store
        .apply(quiz_id, QuizUpdate::PullQuestion(question_id))
        .await?
        .ok_or(EngineError::QuizNotFound(quiz_id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::fixtures::{question_request, seeded_store};

    fn titles(questions: &[Question]) -> Vec<&str> {
        questions.iter().map(|q| q.title.as_str()).collect()
    }

    #[tokio::test]
    async fn update_changes_only_the_target_entry() {
        let (store, quiz_id) = seeded_store(&["A", "B"]).await;

        let questions = add_question(&store, quiz_id, question_request("C"))
            .await
            .unwrap();
        assert_eq!(titles(&questions), ["A", "B", "C"]);
        let new_id = questions[2].id;

        let quiz = update_question(&store, quiz_id, new_id, question_request("C2"))
            .await
            .unwrap();

        assert_eq!(quiz.questions.len(), 3);
        assert_eq!(quiz.questions[..2], questions[..2]);
        assert_eq!(quiz.questions[2].id, new_id);
        assert_eq!(quiz.questions[2].title, "C2");
        assert_eq!(quiz.questions[2].choices[0].text, "C2 yes");
    }

    #[tokio::test]
    async fn delete_add_update_scenario_preserves_order() {
        let (store, quiz_id) = seeded_store(&["A", "B"]).await;
        let quiz = store.fetch(quiz_id).await.unwrap().unwrap();
        let (a, b) = (quiz.questions[0].clone(), quiz.questions[1].clone());

        let quiz = delete_question(&store, quiz_id, a.id).await.unwrap();
        assert_eq!(titles(&quiz.questions), ["B"]);

        let questions = add_question(&store, quiz_id, question_request("C"))
            .await
            .unwrap();
        assert_eq!(titles(&questions), ["B", "C"]);

        let quiz = update_question(&store, quiz_id, b.id, question_request("B'"))
            .await
            .unwrap();
        assert_eq!(titles(&quiz.questions), ["B'", "C"]);
        assert_eq!(quiz.questions[0].id, b.id);
        assert!(quiz.question(a.id).is_none());
    }

    #[tokio::test]
    async fn delete_twice_is_idempotent() {
        let (store, quiz_id) = seeded_store(&["A", "B"]).await;
        let a = store.fetch(quiz_id).await.unwrap().unwrap().questions[0].id;

        let first = delete_question(&store, quiz_id, a).await.unwrap();
        let second = delete_question(&store, quiz_id, a).await.unwrap();
        assert_eq!(first.questions, second.questions);
        assert_eq!(titles(&second.questions), ["B"]);
    }

    #[tokio::test]
    async fn update_distinguishes_missing_quiz_from_missing_question() {
        let (store, quiz_id) = seeded_store(&["A"]).await;
        let stray = Uuid::new_v4();

        let err = update_question(&store, quiz_id, stray, question_request("X"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::QuestionNotFound { quiz_id: q, question_id } if q == quiz_id && question_id == stray
        ));

        let missing = Uuid::new_v4();
        let err = update_question(&store, missing, stray, question_request("X"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::QuizNotFound(id) if id == missing));

        let err = add_question(&store, missing, question_request("X"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::QuizNotFound(_)));

        let err = delete_question(&store, missing, stray).await.unwrap_err();
        assert!(matches!(err, EngineError::QuizNotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_and_attempts_lose_nothing() {
        let (store, quiz_id) = seeded_store(&[]).await;
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for i in 0..20 {
            let adder = store.clone();
            handles.push(tokio::spawn(async move {
                add_question(&*adder, quiz_id, question_request(&format!("Q{}", i)))
                    .await
                    .map(|_| ())
            }));
            let taker = store.clone();
            handles.push(tokio::spawn(async move {
                crate::engine::attempts::record_attempt(&*taker, quiz_id, "u1")
                    .await
                    .map(|_| ())
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let quiz = store.fetch(quiz_id).await.unwrap().unwrap();
        assert_eq!(quiz.questions.len(), 20);
        assert_eq!(quiz.attempt_count("u1"), 20);
    }
}
