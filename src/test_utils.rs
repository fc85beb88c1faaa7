#[cfg(test)]
pub mod fixtures {
    use secrecy::SecretString;

    use crate::{
        config::{OpenAiSettings, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL},
        models::domain::Question,
    };

    /// Two well-formed questions about photosynthesis
    pub fn sample_questions() -> Vec<Question> {
        vec![
            Question::new(
                1,
                "What does photosynthesis produce?",
                ["Glucose", "Salt", "Iron", "Helium"].map(String::from),
                0,
            ),
            Question::new(
                2,
                "Where does photosynthesis happen?",
                ["Nucleus", "Chloroplast", "Ribosome", "Vacuole"].map(String::from),
                1,
            ),
        ]
    }

    /// "The cat sat on the mat. " repeated 40 times (240 words)
    pub fn cat_text() -> String {
        "The cat sat on the mat. ".repeat(40)
    }

    pub fn openai_settings(api_base: &str) -> OpenAiSettings {
        OpenAiSettings {
            api_key: SecretString::from("sk-test".to_string()),
            api_base: api_base.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            temperature: 0.7,
            question_count: 3,
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_sample_questions_are_valid() {
        use validator::Validate;

        let questions = sample_questions();
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.validate().is_ok()));
    }

    #[test]
    fn test_fixtures_cat_text_word_count() {
        assert_eq!(cat_text().split_whitespace().count(), 240);
    }
}
