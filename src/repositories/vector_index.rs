use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{IndexMatch, IndexRecord},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Writes or replaces the record stored under `record.id`.
    async fn upsert(&self, record: IndexRecord) -> AppResult<()>;

    /// Nearest neighbours of `vector`, best match first, at most `top_k`.
    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<IndexMatch>>;

    fn provider_name(&self) -> &'static str;
}

pub(crate) fn ensure_top_k(top_k: usize) -> AppResult<()> {
    if top_k == 0 {
        return Err(AppError::ValidationError(
            "top_k must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Process-local index used when no vector database is configured and in
/// tests. Enforces a single dimensionality, fixed by the first upsert.
pub struct InMemoryVectorIndex {
    records: RwLock<Vec<IndexRecord>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_dimensions(records: &[IndexRecord], vector: &[f32]) -> AppResult<()> {
        match records.first() {
            Some(existing) if existing.values.len() != vector.len() => {
                Err(AppError::IndexError(format!(
                    "dimension mismatch: index holds {}-dimensional vectors, got {}",
                    existing.values.len(),
                    vector.len()
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for InMemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, record: IndexRecord) -> AppResult<()> {
        if record.values.is_empty() {
            return Err(AppError::IndexError("cannot store an empty vector".to_string()));
        }

        let mut records = self.records.write().await;
        Self::check_dimensions(&records, &record.values)?;

        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<IndexMatch>> {
        ensure_top_k(top_k)?;

        let records = self.records.read().await;
        Self::check_dimensions(&records, vector)?;

        let mut matches: Vec<IndexMatch> = records
            .iter()
            .map(|r| IndexMatch {
                id: r.id.clone(),
                score: cosine_similarity(vector, &r.values),
                metadata: Some(r.metadata.clone()),
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);
        Ok(matches)
    }

    fn provider_name(&self) -> &'static str {
        "in_memory"
    }
}
