// src/models/update.rs

use crate::models::{
    question::{Question, QuestionId},
    quiz::{AttemptRecord, Quiz, QuizPatch},
};

/// A single atomic mutation of one quiz document.
///
/// Every variant is applied by the store as one indivisible step against the
/// current version of the document. `apply_to` is the reference semantics; the
/// Postgres adapter expresses the same effect as one `UPDATE` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizUpdate {
    /// Set every present field, leave the rest untouched.
    SetFields(QuizPatch),

    /// Increment the user's attempt record, or insert it with count 1.
    RecordAttempt { user: String },

    /// Append at the end of the question sequence.
    PushQuestion(Question),

    /// Replace the entry carrying the same id, in place.
    /// Matches nothing when no entry has that id.
    ReplaceQuestion(Question),

    /// Remove entries with this id. Absent id is a no-op, not a miss.
    PullQuestion(QuestionId),
}

impl QuizUpdate {
    /// Applies the mutation. Returns `false` when the document does not match
    /// the update's predicate, in which case `quiz` is left unchanged.
    pub fn apply_to(&self, quiz: &mut Quiz) -> bool {
        match self {
            QuizUpdate::SetFields(patch) => {
                apply_patch(quiz, patch);
                true
            }
            QuizUpdate::RecordAttempt { user } => {
                match quiz.attempts.iter_mut().find(|a| &a.user == user) {
                    Some(record) => record.count += 1,
                    None => quiz.attempts.push(AttemptRecord {
                        user: user.clone(),
                        count: 1,
                    }),
                }
                true
            }
            QuizUpdate::PushQuestion(question) => {
                quiz.questions.push(question.clone());
                true
            }
            QuizUpdate::ReplaceQuestion(question) => {
                match quiz.questions.iter_mut().find(|q| q.id == question.id) {
                    Some(slot) => {
                        *slot = question.clone();
                        true
                    }
                    None => false,
                }
            }
            QuizUpdate::PullQuestion(id) => {
                quiz.questions.retain(|q| q.id != *id);
                true
            }
        }
    }
}

fn apply_patch(quiz: &mut Quiz, patch: &QuizPatch) {
    fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
        if let Some(v) = value {
            *slot = v.clone();
        }
    }
    fn set_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
        if let Some(v) = value {
            *slot = Some(v.clone());
        }
    }

    set(&mut quiz.title, &patch.title);
    set_opt(&mut quiz.description, &patch.description);
    set_opt(&mut quiz.points, &patch.points);
    set(&mut quiz.quiz_type, &patch.quiz_type);
    set_opt(&mut quiz.time_limit_minutes, &patch.time_limit_minutes);
    set(&mut quiz.published, &patch.published);
    set(&mut quiz.shuffle_answers, &patch.shuffle_answers);
    set(&mut quiz.multiple_attempts, &patch.multiple_attempts);
    set(&mut quiz.max_attempts, &patch.max_attempts);
    set_opt(&mut quiz.due_date, &patch.due_date);
    set_opt(&mut quiz.available_from, &patch.available_from);
    set_opt(&mut quiz.available_until, &patch.available_until);
    set(&mut quiz.questions, &patch.questions);
}
