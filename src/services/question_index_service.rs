use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    errors::AppResult,
    models::domain::{CacheEntry, EmbeddingVector, EntryMetadata, IndexMatch, IndexRecord, Question},
    repositories::VectorIndex,
    services::{embedder::Embedder, entry_id::EntryIdGenerator},
};

/// The cache-facing half of the question index: what the question cache
/// needs to look up and remember generated question sets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Embeds `source_text` and stores `questions` under a fresh entry id.
    async fn store_questions(&self, source_text: &str, questions: &[Question]) -> AppResult<String>;

    /// Returns the question set of the closest stored text, or an empty
    /// vector on a miss.
    async fn search_questions(&self, source_text: &str) -> AppResult<Vec<Question>>;
}

/// Composes an [`Embedder`] and a [`VectorIndex`] into question storage and
/// semantic search.
pub struct QuestionIndexService {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    ids: EntryIdGenerator,
    min_score: Option<f32>,
}

impl QuestionIndexService {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>, ids: EntryIdGenerator) -> Self {
        Self {
            embedder,
            index,
            ids,
            min_score: None,
        }
    }

    /// Matches scoring below `min_score` are treated as misses.
    pub fn with_min_score(mut self, min_score: Option<f32>) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn embedder_name(&self) -> &'static str {
        self.embedder.embedder_name()
    }

    pub fn index_name(&self) -> &'static str {
        self.index.provider_name()
    }

    /// Embeds `source_text` and stores it without questions. Returns the vector.
    pub async fn index_text(&self, source_text: &str) -> AppResult<EmbeddingVector> {
        let vector = self.embedder.embed(source_text).await?;
        let record = IndexRecord {
            id: self.ids.next_id(),
            values: vector.clone(),
            metadata: EntryMetadata::for_content(source_text),
        };
        self.index.upsert(record).await?;
        Ok(vector)
    }

    /// Stored texts closest to `query`, best first.
    pub async fn search(&self, query: &str, top_k: usize) -> AppResult<Vec<IndexMatch>> {
        let vector = self.embedder.embed(query).await?;
        self.index.query(&vector, top_k).await
    }
}

#[async_trait]
impl QuestionStore for QuestionIndexService {
    async fn store_questions(&self, source_text: &str, questions: &[Question]) -> AppResult<String> {
        let vector = self.embedder.embed(source_text).await?;
        let entry = CacheEntry {
            id: self.ids.next_id(),
            vector,
            source_text: source_text.to_string(),
            questions: Some(questions.to_vec()),
        };
        let id = entry.id.clone();

        self.index.upsert(IndexRecord::try_from(entry)?).await?;
        log::debug!("Stored {} questions under entry {}", questions.len(), id);
        Ok(id)
    }

    async fn search_questions(&self, source_text: &str) -> AppResult<Vec<Question>> {
        let vector = self.embedder.embed(source_text).await?;
        let matches = self.index.query(&vector, 1).await?;

        let Some(top) = matches.into_iter().next() else {
            return Ok(Vec::new());
        };

        if let Some(min_score) = self.min_score {
            if top.score < min_score {
                log::debug!(
                    "Closest entry {} scored {:.3}, below the {:.3} threshold",
                    top.id,
                    top.score,
                    min_score
                );
                return Ok(Vec::new());
            }
        }

        let questions = match top.metadata {
            Some(metadata) => metadata.decode_questions()?.unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(questions)
    }
}
