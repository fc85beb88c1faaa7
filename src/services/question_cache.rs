use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{GenerationOutcome, GenerationRequest, Question},
    services::{question_generator::QuestionGenerator, question_index_service::QuestionStore},
};

/// Decides between reusing a cached question set and generating a new one.
///
/// Cached sets are served as-is with no freshness check. Index trouble never
/// blocks generation: a failed lookup counts as a miss, and a failed store is
/// logged while the fresh questions are still returned. Generator failures
/// reach the caller unchanged.
pub struct QuestionCache {
    generator: Arc<dyn QuestionGenerator>,
    store: Arc<dyn QuestionStore>,
}

impl QuestionCache {
    pub fn new(generator: Arc<dyn QuestionGenerator>, store: Arc<dyn QuestionStore>) -> Self {
        Self { generator, store }
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.generator_name()
    }

    pub async fn get_or_generate(&self, source_text: &str) -> AppResult<Vec<Question>> {
        self.resolve(source_text).await.map(|outcome| outcome.questions)
    }

    pub async fn resolve(&self, source_text: &str) -> AppResult<GenerationOutcome> {
        let request = GenerationRequest::new(source_text)?;

        match self.store.search_questions(request.source_text()).await {
            Ok(cached) if !cached.is_empty() => {
                log::info!("Serving {} cached questions", cached.len());
                return Ok(GenerationOutcome::cached(cached));
            }
            Ok(_) => log::debug!("No cached questions for this text"),
            Err(e) => log::warn!("Question cache lookup failed, generating instead: {}", e),
        }

        let questions = self.generator.generate(&request).await?;

        if let Err(e) = self
            .store
            .store_questions(request.source_text(), &questions)
            .await
        {
            log::error!("Failed to cache {} generated questions: {}", questions.len(), e);
        }

        Ok(GenerationOutcome::generated(questions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::AppError,
        models::domain::QuestionOrigin,
        services::{
            question_generator::MockQuestionGenerator, question_index_service::MockQuestionStore,
        },
        test_utils::fixtures::sample_questions,
    };

    fn cache(generator: MockQuestionGenerator, store: MockQuestionStore) -> QuestionCache {
        QuestionCache::new(Arc::new(generator), Arc::new(store))
    }

    #[tokio::test]
    async fn blank_text_is_rejected_before_any_call() {
        let mut generator = MockQuestionGenerator::new();
        generator.expect_generate().never();
        let mut store = MockQuestionStore::new();
        store.expect_search_questions().never();
        store.expect_store_questions().never();

        let result = cache(generator, store).get_or_generate("   ").await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn cache_hit_skips_generation() {
        let mut generator = MockQuestionGenerator::new();
        generator.expect_generate().never();
        let mut store = MockQuestionStore::new();
        store
            .expect_search_questions()
            .times(1)
            .returning(|_| Ok(sample_questions()));
        store.expect_store_questions().never();

        let outcome = cache(generator, store).resolve("cells").await.unwrap();

        assert_eq!(outcome.origin, QuestionOrigin::Cache);
        assert_eq!(outcome.questions, sample_questions());
    }

    #[tokio::test]
    async fn cache_miss_generates_then_stores() {
        let mut generator = MockQuestionGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Ok(sample_questions()));
        let mut store = MockQuestionStore::new();
        store.expect_search_questions().returning(|_| Ok(Vec::new()));
        store
            .expect_store_questions()
            .withf(|text, questions| text == "cells" && questions == sample_questions().as_slice())
            .times(1)
            .returning(|_, _| Ok("entry-1".to_string()));

        let outcome = cache(generator, store).resolve("cells").await.unwrap();

        assert_eq!(outcome.origin, QuestionOrigin::Generated);
        assert_eq!(outcome.questions, sample_questions());
    }

    #[tokio::test]
    async fn lookup_failure_degrades_to_generation() {
        let mut generator = MockQuestionGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Ok(sample_questions()));
        let mut store = MockQuestionStore::new();
        store
            .expect_search_questions()
            .returning(|_| Err(AppError::IndexError("index unavailable".to_string())));
        store
            .expect_store_questions()
            .returning(|_, _| Ok("entry-1".to_string()));

        let questions = cache(generator, store).get_or_generate("cells").await.unwrap();

        assert_eq!(questions, sample_questions());
    }

    #[tokio::test]
    async fn store_failure_still_returns_questions() {
        let mut generator = MockQuestionGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok(sample_questions()));
        let mut store = MockQuestionStore::new();
        store.expect_search_questions().returning(|_| Ok(Vec::new()));
        store
            .expect_store_questions()
            .times(1)
            .returning(|_, _| Err(AppError::IndexError("write rejected".to_string())));

        let questions = cache(generator, store).get_or_generate("cells").await.unwrap();

        assert_eq!(questions, sample_questions());
    }

    #[tokio::test]
    async fn generator_failure_propagates_and_skips_store() {
        let mut generator = MockQuestionGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(AppError::GenerationError("not json".to_string())));
        let mut store = MockQuestionStore::new();
        store.expect_search_questions().returning(|_| Ok(Vec::new()));
        store.expect_store_questions().never();

        let result = cache(generator, store).get_or_generate("cells").await;

        assert!(matches!(result, Err(AppError::GenerationError(_))));
    }
}
