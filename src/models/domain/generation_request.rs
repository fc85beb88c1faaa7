use crate::errors::{AppError, AppResult};

/// Study text that has passed input validation. Holding one of these means
/// the text contains at least one word, so no generator or index call is
/// ever made for blank input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    source_text: String,
}

impl GenerationRequest {
    pub fn new(source_text: impl Into<String>) -> AppResult<Self> {
        let source_text = source_text.into();
        if source_text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Please enter some text to generate questions.".to_string(),
            ));
        }
        Ok(Self { source_text })
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn words(&self) -> Vec<&str> {
        self.source_text.split_whitespace().collect()
    }
}
