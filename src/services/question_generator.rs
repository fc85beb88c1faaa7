use std::{sync::Mutex, time::Duration};

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use rand::{rngs::StdRng, Rng, SeedableRng};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    config::OpenAiSettings,
    constants::question_prompt::{question_user_prompt, QUESTION_SYSTEM_PROMPT},
    errors::{AppError, AppResult},
    models::domain::{GenerationRequest, Question},
};

const WORDS_PER_QUESTION: usize = 30;
const MIN_HEURISTIC_QUESTIONS: usize = 3;
const MAX_HEURISTIC_QUESTIONS: usize = 5;

/// Anything that can turn validated study text into a question set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Vec<Question>>;

    fn generator_name(&self) -> &'static str;
}

// Only the fields we read from a chat completion response.
#[derive(Debug, Deserialize)]
struct ChatCompletionBody {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedQuestion {
    text: String,
    options: Vec<String>,
    correct_answer: u32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeneratedPayload {
    List(Vec<GeneratedQuestion>),
    Wrapped { questions: Vec<GeneratedQuestion> },
}

/// Generator backed by an OpenAI-compatible chat completion endpoint.
pub struct ModelQuestionGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    question_count: u32,
    timeout: Duration,
}

impl ModelQuestionGenerator {
    pub fn new(settings: &OpenAiSettings, timeout: Duration) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(settings.api_key.expose_secret())
            .with_api_base(settings.api_base.clone());

        // One attempt per call; the client otherwise retries 429 and 5xx replies.
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Self {
            client: Client::with_config(openai_config).with_backoff(no_retry),
            model: settings.chat_model.clone(),
            temperature: settings.temperature,
            question_count: settings.question_count,
            timeout,
        }
    }
}

#[async_trait]
impl QuestionGenerator for ModelQuestionGenerator {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Vec<Question>> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": QUESTION_SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": question_user_prompt(self.question_count, request.source_text())
                }
            ],
            "temperature": self.temperature,
        });

        log::debug!("Requesting {} questions from model {}", self.question_count, self.model);

        let completion: ChatCompletionBody =
            tokio::time::timeout(self.timeout, self.client.chat().create_byot(body))
                .await
                .map_err(|_| {
                    AppError::GenerationError(format!(
                        "model call timed out after {:?}",
                        self.timeout
                    ))
                })?
                .map_err(|e| AppError::GenerationError(format!("model call failed: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                AppError::GenerationError("the model response content is empty".to_string())
            })?;

        let questions = parse_model_questions(&content)?;
        log::info!("Model {} produced {} questions", self.model, questions.len());
        Ok(questions)
    }

    fn generator_name(&self) -> &'static str {
        "model"
    }
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses and validates the raw text of a model reply. Ids are assigned in
/// reply order starting at 1.
pub fn parse_model_questions(content: &str) -> AppResult<Vec<Question>> {
    let payload: GeneratedPayload = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| AppError::GenerationError(format!("model returned malformed JSON: {}", e)))?;

    let generated = match payload {
        GeneratedPayload::List(list) => list,
        GeneratedPayload::Wrapped { questions } => questions,
    };

    if generated.is_empty() {
        return Err(AppError::GenerationError(
            "model returned no questions".to_string(),
        ));
    }

    generated
        .into_iter()
        .zip(1u32..)
        .map(|(g, id)| {
            let question = Question {
                id,
                text: g.text,
                options: g.options,
                correct_answer: g.correct_answer,
            };
            question.validate().map_err(|e| {
                AppError::GenerationError(format!("question {} is invalid: {}", id, e))
            })?;
            Ok(question)
        })
        .collect()
}

/// Deterministic, content-derived generator for environments without a model.
/// Only the correct-answer position is random, drawn from a seedable source.
pub struct HeuristicQuestionGenerator {
    rng: Mutex<StdRng>,
}

impl HeuristicQuestionGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn question_count(word_count: usize) -> usize {
        (word_count / WORDS_PER_QUESTION).clamp(MIN_HEURISTIC_QUESTIONS, MAX_HEURISTIC_QUESTIONS)
    }

    fn pick_correct_answer(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(0..4)
    }

    pub fn build_questions(&self, request: &GenerationRequest) -> Vec<Question> {
        let words = request.words();
        let word_count = words.len();
        let word_at = |offset: usize| words[offset % word_count];

        (0..Self::question_count(word_count))
            .map(|i| {
                let base = i * WORDS_PER_QUESTION;
                Question {
                    id: i as u32 + 1,
                    text: format!(
                        "What is the significance of \"{}\" in the given context?",
                        word_at(base)
                    ),
                    options: vec![
                        format!("It relates to {}", word_at(base + 5)),
                        format!("It exemplifies {}", word_at(base + 10)),
                        format!("It contrasts with {}", word_at(base + 15)),
                        format!("It defines {}", word_at(base + 20)),
                    ],
                    correct_answer: self.pick_correct_answer(),
                }
            })
            .collect()
    }
}

impl Default for HeuristicQuestionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionGenerator for HeuristicQuestionGenerator {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Vec<Question>> {
        let questions = self.build_questions(request);
        log::debug!("Heuristic generator produced {} questions", questions.len());
        Ok(questions)
    }

    fn generator_name(&self) -> &'static str {
        "heuristic"
    }
}
