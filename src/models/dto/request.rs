use async_graphql::InputObject;
use serde::Deserialize;
use validator::Validate;

use crate::models::validation::non_blank;

pub const DEFAULT_SEARCH_TOP_K: u32 = 5;

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct GenerateQuestionsRequest {
    #[validate(custom(function = "non_blank"))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
pub struct SearchSourcesRequest {
    #[validate(custom(function = "non_blank"))]
    pub text: String,

    #[validate(range(min = 1, max = 100))]
    pub top_k: Option<u32>,
}

impl SearchSourcesRequest {
    pub fn top_k(&self) -> usize {
        self.top_k.unwrap_or(DEFAULT_SEARCH_TOP_K) as usize
    }
}
