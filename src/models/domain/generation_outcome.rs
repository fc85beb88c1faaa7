use async_graphql::{Enum, SimpleObject};
use serde::Serialize;

use crate::models::domain::Question;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum QuestionOrigin {
    Cache,
    Generated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
pub struct GenerationOutcome {
    pub questions: Vec<Question>,
    pub origin: QuestionOrigin,
}

impl GenerationOutcome {
    pub fn cached(questions: Vec<Question>) -> Self {
        Self {
            questions,
            origin: QuestionOrigin::Cache,
        }
    }

    pub fn generated(questions: Vec<Question>) -> Self {
        Self {
            questions,
            origin: QuestionOrigin::Generated,
        }
    }
}
