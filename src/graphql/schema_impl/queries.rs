use async_graphql::{Context, ErrorExtensions, Object, Result};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{
        domain::{GenerationRequest, Question},
        dto::{request::SearchSourcesRequest, response::SourceMatchDto},
    },
    services::question_index_service::QuestionStore,
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Questions cached for the closest stored study text, if any.
    async fn cached_questions(&self, ctx: &Context<'_>, text: String) -> Result<Vec<Question>> {
        let state = ctx.data::<AppState>()?;

        let request = GenerationRequest::new(text).map_err(|e| e.extend())?;

        state
            .question_index
            .search_questions(request.source_text())
            .await
            .map_err(|e| e.extend())
    }

    async fn similar_sources(
        &self,
        ctx: &Context<'_>,
        text: String,
        top_k: Option<u32>,
    ) -> Result<Vec<SourceMatchDto>> {
        let state = ctx.data::<AppState>()?;

        let request = SearchSourcesRequest { text, top_k };
        request
            .validate()
            .map_err(|e| AppError::from(e).extend())?;

        let matches = state
            .question_index
            .search(&request.text, request.top_k())
            .await
            .map_err(|e| e.extend())?;

        Ok(matches.into_iter().map(SourceMatchDto::from).collect())
    }
}
