use std::{env, time::Duration};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_PINECONE_CONTROL_PLANE: &str = "https://api.pinecone.io";

/// Settings for the OpenAI-compatible chat and embedding endpoints.
#[derive(Clone, Debug)]
pub struct OpenAiSettings {
    pub api_key: SecretString,
    pub api_base: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f32,
    pub question_count: u32,
}

#[derive(Clone, Debug)]
pub struct PineconeSettings {
    pub api_key: SecretString,
    pub index_name: String,
    pub index_host: Option<String>,
    pub namespace: Option<String>,
    pub control_plane_url: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub request_timeout: Duration,
    pub openai: Option<OpenAiSettings>,
    pub pinecone: Option<PineconeSettings>,
    pub cache_min_score: Option<f32>,
    pub random_seed: Option<u64>,
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    optional_var(name).and_then(|v| v.trim().parse().ok())
}

impl Config {
    pub fn from_env() -> Self {
        let openai = optional_var("OPENAI_API_KEY").map(|key| OpenAiSettings {
            api_key: SecretString::from(key),
            api_base: optional_var("OPENAI_API_BASE")
                .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
            chat_model: optional_var("OPENAI_CHAT_MODEL")
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            embedding_model: optional_var("OPENAI_EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            temperature: parsed_var("GENERATION_TEMPERATURE").unwrap_or(0.7),
            question_count: parsed_var("GENERATION_QUESTION_COUNT").unwrap_or(3),
        });

        let pinecone = optional_var("PINECONE_API_KEY").map(|key| PineconeSettings {
            api_key: SecretString::from(key),
            index_name: optional_var("PINECONE_INDEX_NAME").unwrap_or_default(),
            index_host: optional_var("PINECONE_INDEX_HOST"),
            namespace: optional_var("PINECONE_NAMESPACE"),
            control_plane_url: optional_var("PINECONE_CONTROL_PLANE_URL")
                .unwrap_or_else(|| DEFAULT_PINECONE_CONTROL_PLANE.to_string()),
        });

        Self {
            web_server_host: optional_var("WEB_SERVER_HOST")
                .unwrap_or_else(|| "localhost".to_string()),
            web_server_port: parsed_var("WEB_SERVER_PORT").unwrap_or(8080),
            request_timeout: Duration::from_secs(parsed_var("REQUEST_TIMEOUT_SECS").unwrap_or(30)),
            openai,
            pinecone,
            cache_min_score: parsed_var("CACHE_MIN_SCORE"),
            random_seed: parsed_var("RANDOM_SEED"),
        }
    }

    /// Reject settings that would only fail later, on the first request.
    pub fn validate(&self) -> AppResult<()> {
        if self.request_timeout.is_zero() {
            return Err(AppError::ConfigError(
                "REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        if let Some(openai) = &self.openai {
            if openai.api_key.expose_secret().trim().is_empty() {
                return Err(AppError::ConfigError("OPENAI_API_KEY is blank".to_string()));
            }
            if !(0.0..=2.0).contains(&openai.temperature) {
                return Err(AppError::ConfigError(format!(
                    "GENERATION_TEMPERATURE must be within 0.0..=2.0, got {}",
                    openai.temperature
                )));
            }
            if openai.question_count == 0 {
                return Err(AppError::ConfigError(
                    "GENERATION_QUESTION_COUNT must be at least 1".to_string(),
                ));
            }
        }

        if let Some(pinecone) = &self.pinecone {
            if pinecone.index_host.is_none() && pinecone.index_name.is_empty() {
                return Err(AppError::ConfigError(
                    "PINECONE_API_KEY is set but neither PINECONE_INDEX_HOST nor PINECONE_INDEX_NAME is"
                        .to_string(),
                ));
            }
        }

        if let Some(score) = self.cache_min_score {
            if !(-1.0..=1.0).contains(&score) {
                return Err(AppError::ConfigError(format!(
                    "CACHE_MIN_SCORE must be within -1.0..=1.0, got {}",
                    score
                )));
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }

    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            request_timeout: Duration::from_secs(5),
            openai: None,
            pinecone: None,
            cache_min_score: None,
            random_seed: Some(7),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai_settings() -> OpenAiSettings {
        OpenAiSettings {
            api_key: SecretString::from("sk-test".to_string()),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            temperature: 0.7,
            question_count: 3,
        }
    }

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        // Should use env vars if set, or fall back to defaults
        assert!(!config.web_server_host.is_empty());
        assert!(!config.request_timeout.is_zero());
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.web_server_host, "127.0.0.1");
        assert!(config.openai.is_none());
        assert!(config.pinecone.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let mut config = Config::test_config();
        config.openai = Some(OpenAiSettings {
            temperature: 3.5,
            ..openai_settings()
        });

        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_validate_requires_pinecone_index_location() {
        let mut config = Config::test_config();
        config.pinecone = Some(PineconeSettings {
            api_key: SecretString::from("pc-test".to_string()),
            index_name: String::new(),
            index_host: None,
            namespace: None,
            control_plane_url: DEFAULT_PINECONE_CONTROL_PLANE.to_string(),
        });

        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_validate_accepts_complete_openai_settings() {
        let mut config = Config::test_config();
        config.openai = Some(openai_settings());
        config.cache_min_score = Some(0.85);

        assert!(config.validate().is_ok());
    }
}
