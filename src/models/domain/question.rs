use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::validation::non_blank;

pub const OPTIONS_PER_QUESTION: usize = 4;

/// A single multiple-choice question. `correct_answer` indexes into `options`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    #[validate(custom(function = "non_blank"))]
    pub text: String,
    #[validate(length(equal = 4, message = "a question must have exactly 4 options"))]
    pub options: Vec<String>,
    #[validate(range(max = 3, message = "correctAnswer must index one of the 4 options"))]
    pub correct_answer: u32,
}

impl Question {
    pub fn new(
        id: u32,
        text: impl Into<String>,
        options: [String; OPTIONS_PER_QUESTION],
        correct_answer: u32,
    ) -> Self {
        Question {
            id,
            text: text.into(),
            options: options.into(),
            correct_answer,
        }
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options
            .get(self.correct_answer as usize)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; 4] {
        ["a", "b", "c", "d"].map(String::from)
    }

    #[test]
    fn question_serializes_with_camel_case_fields() {
        let question = Question::new(1, "What is Rust?", options(), 2);
        let json = serde_json::to_value(&question).expect("question should serialize");

        assert_eq!(json["correctAnswer"], 2);
        assert_eq!(json["options"].as_array().map(Vec::len), Some(4));
        assert!(json.get("correct_answer").is_none());
    }

    #[test]
    fn valid_question_passes_validation() {
        let question = Question::new(1, "What is Rust?", options(), 3);

        assert!(question.validate().is_ok());
        assert_eq!(question.correct_option(), Some("d"));
    }

    #[test]
    fn question_with_three_options_fails_validation() {
        let mut question = Question::new(1, "What is Rust?", options(), 0);
        question.options.pop();

        assert!(question.validate().is_err());
    }

    #[test]
    fn question_with_out_of_range_answer_fails_validation() {
        let question = Question::new(1, "What is Rust?", options(), 4);

        assert!(question.validate().is_err());
        assert_eq!(question.correct_option(), None);
    }

    #[test]
    fn question_with_blank_text_fails_validation() {
        let question = Question::new(1, "   ", options(), 0);

        assert!(question.validate().is_err());
    }
}
