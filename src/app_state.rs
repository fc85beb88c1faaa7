use std::sync::Arc;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    repositories::{InMemoryVectorIndex, PineconeVectorIndex, VectorIndex},
    services::{
        embedder::{Embedder, HashEmbedder, OpenAiEmbedder},
        entry_id::EntryIdGenerator,
        question_cache::QuestionCache,
        question_generator::{HeuristicQuestionGenerator, ModelQuestionGenerator, QuestionGenerator},
        question_index_service::QuestionIndexService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub question_cache: Arc<QuestionCache>,
    pub question_index: Arc<QuestionIndexService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        let (generator, embedder): (Arc<dyn QuestionGenerator>, Arc<dyn Embedder>) =
            match &config.openai {
                Some(openai) => (
                    Arc::new(ModelQuestionGenerator::new(openai, config.request_timeout)),
                    Arc::new(OpenAiEmbedder::new(http.clone(), openai)),
                ),
                None => {
                    log::warn!("OPENAI_API_KEY not set; using the heuristic generator and hash embedder");
                    let generator = match config.random_seed {
                        Some(seed) => HeuristicQuestionGenerator::with_seed(seed),
                        None => HeuristicQuestionGenerator::new(),
                    };
                    (Arc::new(generator), Arc::new(HashEmbedder::default()))
                }
            };

        let index: Arc<dyn VectorIndex> = match &config.pinecone {
            Some(pinecone) => Arc::new(PineconeVectorIndex::connect(http, pinecone).await?),
            None => {
                log::warn!("PINECONE_API_KEY not set; cached questions live in process memory");
                Arc::new(InMemoryVectorIndex::new())
            }
        };

        let ids = match config.random_seed {
            Some(seed) => EntryIdGenerator::with_seed(seed),
            None => EntryIdGenerator::new(),
        };

        let question_index = Arc::new(
            QuestionIndexService::new(embedder, index, ids).with_min_score(config.cache_min_score),
        );

        Ok(Self::from_parts(config, generator, question_index))
    }

    pub fn from_parts(
        config: Config,
        generator: Arc<dyn QuestionGenerator>,
        question_index: Arc<QuestionIndexService>,
    ) -> Self {
        let question_cache = Arc::new(QuestionCache::new(generator, question_index.clone()));

        Self {
            question_cache,
            question_index,
            config: Arc::new(config),
        }
    }
}
