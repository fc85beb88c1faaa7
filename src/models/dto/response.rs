use async_graphql::SimpleObject;
use serde::Serialize;

use crate::models::domain::IndexMatch;

/// A stored source text that is semantically close to a search query.
#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct SourceMatchDto {
    pub id: String,
    pub score: f32,
    pub source_text: Option<String>,
    pub has_questions: bool,
}

impl From<IndexMatch> for SourceMatchDto {
    fn from(m: IndexMatch) -> Self {
        let (source_text, has_questions) = match m.metadata {
            Some(metadata) => (Some(metadata.content), metadata.questions.is_some()),
            None => (None, false),
        };

        SourceMatchDto {
            id: m.id,
            score: m.score,
            source_text,
            has_questions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchSourcesResponse {
    pub matches: Vec<SourceMatchDto>,
}
