// src/engine/fixtures.rs

use uuid::Uuid;

use crate::{
    models::{
        question::{Choice, QuestionRequest, QuestionType},
        quiz::{CreateQuizRequest, QuizId, QuizType},
    },
    store::{MemoryQuizStore, QuizStore},
};

pub(crate) fn question_request(title: &str) -> QuestionRequest {
    QuestionRequest {
        title: title.to_string(),
        question_type: QuestionType::MultipleChoice,
        points: 5,
        text: format!("<p>{}?</p>", title),
        choices: vec![
            Choice { text: format!("{} yes", title), correct: true },
            Choice { text: format!("{} no", title), correct: false },
        ],
    }
}

pub(crate) fn quiz_request(title: &str, questions: &[&str]) -> CreateQuizRequest {
    CreateQuizRequest {
        title: title.to_string(),
        description: None,
        points: Some(10),
        quiz_type: QuizType::GradedQuiz,
        time_limit_minutes: Some(20),
        published: false,
        shuffle_answers: true,
        multiple_attempts: false,
        max_attempts: 1,
        due_date: None,
        available_from: None,
        available_until: None,
        questions: questions.iter().map(|t| question_request(t)).collect(),
    }
}

/// A memory store holding one quiz with the given question titles.
pub(crate) async fn seeded_store(questions: &[&str]) -> (MemoryQuizStore, QuizId) {
    let store = MemoryQuizStore::new();
    let quiz = store
        .insert(quiz_request("Fixture", questions).into_quiz(Uuid::new_v4()))
        .await
        .unwrap();
    (store, quiz.id)
}
