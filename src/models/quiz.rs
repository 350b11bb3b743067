// src/models/quiz.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::question::{Question, QuestionRequest, validate_no_nul};

pub type QuizId = Uuid;
pub type CourseId = Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizType {
    #[default]
    GradedQuiz,
    PracticeQuiz,
    GradedSurvey,
    UngradedSurvey,
}

impl QuizType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizType::GradedQuiz => "graded_quiz",
            QuizType::PracticeQuiz => "practice_quiz",
            QuizType::GradedSurvey => "graded_survey",
            QuizType::UngradedSurvey => "ungraded_survey",
        }
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "graded_quiz" => Ok(QuizType::GradedQuiz),
            "practice_quiz" => Ok(QuizType::PracticeQuiz),
            "graded_survey" => Ok(QuizType::GradedSurvey),
            "ungraded_survey" => Ok(QuizType::UngradedSurvey),
            other => Err(format!("unknown quiz type '{}'", other)),
        }
    }
}

/// Per-user attempt counter embedded in a quiz.
/// At most one record exists per `user` within a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub user: String,
    pub count: u32,
}

/// The quiz aggregate: one document, the unit of storage and of atomic update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub points: Option<i32>,
    pub quiz_type: QuizType,
    pub time_limit_minutes: Option<i32>,
    pub published: bool,
    pub shuffle_answers: bool,
    pub multiple_attempts: bool,
    pub max_attempts: i32,
    pub due_date: Option<DateTime<Utc>>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_until: Option<DateTime<Utc>>,
    pub questions: Vec<Question>,
    pub attempts: Vec<AttemptRecord>,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    /// Current count for `user`, or 0 when the user has not attempted yet.
    pub fn attempt_count(&self, user: &str) -> u32 {
        self.attempts
            .iter()
            .find(|a| a.user == user)
            .map(|a| a.count)
            .unwrap_or(0)
    }

    pub fn question(&self, id: Uuid) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> i32 {
    1
}

/// DTO for creating a quiz under a course.
/// The course comes from the path, not the body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200), custom(function = validate_no_nul))]
    pub title: String,
    #[validate(length(max = 10000), custom(function = validate_no_nul))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub points: Option<i32>,
    #[serde(default)]
    pub quiz_type: QuizType,
    #[validate(range(min = 1))]
    pub time_limit_minutes: Option<i32>,
    #[serde(default)]
    pub published: bool,
    #[serde(default = "default_true")]
    pub shuffle_answers: bool,
    #[serde(default)]
    pub multiple_attempts: bool,
    #[validate(range(min = 1))]
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i32,
    pub due_date: Option<DateTime<Utc>>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_until: Option<DateTime<Utc>>,
    #[validate(nested)]
    #[serde(default)]
    pub questions: Vec<QuestionRequest>,
}

impl CreateQuizRequest {
    pub fn into_quiz(self, course_id: CourseId) -> Quiz {
        Quiz {
            id: Uuid::new_v4(),
            course_id,
            title: self.title,
            description: self.description,
            points: self.points,
            quiz_type: self.quiz_type,
            time_limit_minutes: self.time_limit_minutes,
            published: self.published,
            shuffle_answers: self.shuffle_answers,
            multiple_attempts: self.multiple_attempts,
            max_attempts: self.max_attempts,
            due_date: self.due_date,
            available_from: self.available_from,
            available_until: self.available_until,
            questions: self
                .questions
                .into_iter()
                .map(|q| q.into_question(Uuid::new_v4()))
                .collect(),
            attempts: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// DTO for updating a quiz. Fields are optional.
///
/// An absent field leaves the stored value untouched. `questions`, when present,
/// replaces the whole sequence with freshly identified entries. Attempt records
/// are not part of this contract.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200), custom(function = validate_no_nul))]
    pub title: Option<String>,
    #[validate(length(max = 10000), custom(function = validate_no_nul))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub points: Option<i32>,
    pub quiz_type: Option<QuizType>,
    #[validate(range(min = 1))]
    pub time_limit_minutes: Option<i32>,
    pub published: Option<bool>,
    pub shuffle_answers: Option<bool>,
    pub multiple_attempts: Option<bool>,
    #[validate(range(min = 1))]
    pub max_attempts: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_until: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub questions: Option<Vec<QuestionRequest>>,
}

/// Named set of updatable quiz fields, each either set or left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub points: Option<i32>,
    pub quiz_type: Option<QuizType>,
    pub time_limit_minutes: Option<i32>,
    pub published: Option<bool>,
    pub shuffle_answers: Option<bool>,
    pub multiple_attempts: Option<bool>,
    pub max_attempts: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_until: Option<DateTime<Utc>>,
    pub questions: Option<Vec<Question>>,
}

impl QuizPatch {
    pub fn is_empty(&self) -> bool {
        *self == QuizPatch::default()
    }
}

impl From<UpdateQuizRequest> for QuizPatch {
    fn from(req: UpdateQuizRequest) -> Self {
        QuizPatch {
            title: req.title,
            description: req.description,
            points: req.points,
            quiz_type: req.quiz_type,
            time_limit_minutes: req.time_limit_minutes,
            published: req.published,
            shuffle_answers: req.shuffle_answers,
            multiple_attempts: req.multiple_attempts,
            max_attempts: req.max_attempts,
            due_date: req.due_date,
            available_from: req.available_from,
            available_until: req.available_until,
            questions: req.questions.map(|qs| {
                qs.into_iter()
                    .map(|q| q.into_question(Uuid::new_v4()))
                    .collect()
            }),
        }
    }
}

/// Selects which quizzes a listing returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizFilter {
    pub course_id: Option<CourseId>,
}

/// Response body for the attempt routes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub quiz_id: QuizId,
    pub user_id: String,
    pub attempt_count: u32,
}
