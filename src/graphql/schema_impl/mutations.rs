use async_graphql::{Context, ErrorExtensions, Object, Result};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{domain::GenerationOutcome, dto::request::GenerateQuestionsRequest},
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn generate_questions(
        &self,
        ctx: &Context<'_>,
        input: GenerateQuestionsRequest,
    ) -> Result<GenerationOutcome> {
        let state = ctx.data::<AppState>()?;

        input
            .validate()
            .map_err(|e| AppError::from(e).extend())?;

        state
            .question_cache
            .resolve(&input.text)
            .await
            .map_err(|e| e.extend())
    }
}
