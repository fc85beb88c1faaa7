use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Question,
};

pub type EmbeddingVector = Vec<f32>;

/// Flat metadata stored next to each vector. Vector databases only accept
/// scalar metadata values, so the question set travels as a JSON string.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct EntryMetadata {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<String>,
}

impl EntryMetadata {
    pub fn for_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            questions: None,
        }
    }

    /// Decodes and validates the cached question set, if the entry has one.
    pub fn decode_questions(&self) -> AppResult<Option<Vec<Question>>> {
        let Some(raw) = self.questions.as_deref() else {
            return Ok(None);
        };

        let questions: Vec<Question> = serde_json::from_str(raw).map_err(|e| {
            AppError::IndexError(format!("cached questions are not valid JSON: {}", e))
        })?;

        for question in &questions {
            question.validate().map_err(|e| {
                AppError::IndexError(format!("cached question {} is malformed: {}", question.id, e))
            })?;
        }

        Ok(Some(questions))
    }
}

/// A stored generation result. Entries are written once and never updated in
/// place; re-caching the same text produces a new entry under a new id.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry {
    pub id: String,
    pub vector: EmbeddingVector,
    pub source_text: String,
    pub questions: Option<Vec<Question>>,
}

/// Wire shape of an upsert: id, vector values and flat metadata.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndexRecord {
    pub id: String,
    pub values: EmbeddingVector,
    pub metadata: EntryMetadata,
}

impl TryFrom<CacheEntry> for IndexRecord {
    type Error = AppError;

    fn try_from(entry: CacheEntry) -> Result<Self, Self::Error> {
        let questions = entry
            .questions
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AppError::IndexError(format!("failed to encode questions: {}", e)))?;

        Ok(IndexRecord {
            id: entry.id,
            values: entry.vector,
            metadata: EntryMetadata {
                content: entry.source_text,
                questions,
            },
        })
    }
}

/// One result of a nearest-neighbour query, best match first.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct IndexMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<EntryMetadata>,
}
