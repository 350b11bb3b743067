// src/models/question.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::html::clean_html;

/// Stable handle of a question inside its quiz.
/// Assigned once on creation and never reused or renumbered.
pub type QuestionId = Uuid;

/// The fixed set of question kinds a quiz may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    FillInTheBlank,
}

/// One answer option. Order inside `Question::choices` is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Choice {
    #[validate(length(min = 1, max = 1000), custom(function = validate_no_nul))]
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

/// A question embedded in a quiz document.
/// Stored as one element of the quiz's `questions` JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,

    pub title: String,

    /// Serialized as `type` to keep the stored document readable.
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    pub points: i32,

    /// Question body. May contain sanitized HTML from the editor.
    pub text: String,

    pub choices: Vec<Choice>,
}

/// DTO for creating or replacing a question.
/// The identifier never comes from the client; it is assigned or taken from the path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionRequest {
    #[validate(length(min = 1, max = 200), custom(function = validate_no_nul))]
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub points: i32,
    #[validate(length(max = 10000), custom(function = validate_no_nul))]
    #[serde(default)]
    pub text: String,
    #[validate(length(max = 50), nested)]
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// Postgres text and jsonb cannot hold U+0000.
pub(crate) fn validate_no_nul(value: &str) -> Result<(), validator::ValidationError> {
    if value.contains('\0') {
        return Err(validator::ValidationError::new("nul_character_not_allowed"));
    }
    Ok(())
}

impl QuestionRequest {
    /// Builds the stored question under the given handle, sanitizing rich text.
    pub fn into_question(self, id: QuestionId) -> Question {
        Question {
            id,
            title: self.title,
            question_type: self.question_type,
            points: self.points,
            text: clean_html(&self.text),
            choices: self
                .choices
                .into_iter()
                .map(|c| Choice {
                    text: clean_html(&c.text),
                    correct: c.correct,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> QuestionRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn question_serializes_type_key() {
        let q = request(serde_json::json!({
            "title": "Capital",
            "type": "fill_in_the_blank",
            "points": 2,
            "text": "Paris is the capital of ___"
        }))
        .into_question(Uuid::new_v4());

        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["type"], "fill_in_the_blank");
        assert_eq!(value["id"], q.id.to_string());
    }

    #[test]
    fn into_question_strips_scripts_and_keeps_choice_order() {
        let q = request(serde_json::json!({
            "title": "Pick",
            "type": "multiple_choice",
            "text": "<p>Which?</p><script>alert(1)</script>",
            "choices": [
                {"text": "first", "correct": false},
                {"text": "<b>second</b>", "correct": true},
                {"text": "third"}
            ]
        }))
        .into_question(Uuid::new_v4());

        assert_eq!(q.text, "<p>Which?</p>");
        let texts: Vec<&str> = q.choices.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["first", "<b>second</b>", "third"]);
        assert!(q.choices[1].correct);
        assert!(!q.choices[2].correct);
    }

    #[test]
    fn validation_rejects_empty_title_and_negative_points() {
        let q = request(serde_json::json!({
            "title": "",
            "type": "true_false",
            "points": -1
        }));
        let errors = q.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("points"));
    }

    #[test]
    fn validation_rejects_nul_in_title_text_and_choices() {
        let q = request(serde_json::json!({
            "title": "a\u{0000}b",
            "type": "multiple_choice",
            "text": "body\u{0000}",
            "choices": [{"text": "\u{0000}", "correct": true}]
        }));
        let errors = q.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("text"));
        assert!(errors.errors().contains_key("choices"));
    }
}
