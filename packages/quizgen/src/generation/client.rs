//! The generation client: prompt, invoke, parse, validate, retry.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{parse, prompts, GenerationTaskResult};
use crate::error::{AttemptError, GenerationError, TaskKind};
use crate::text::truncate_by_budget;
use crate::traits::inference::InferenceBackend;
use crate::types::config::{GenerationConfig, OnExhausted};
use crate::types::quiz::{KeyEntities, Question};

/// Structured generation over an [`InferenceBackend`].
///
/// Every task follows the same loop: invoke, parse, validate shape, and
/// retry immediately on any failure until the retry policy's attempts run
/// out. What happens then is decided per task by [`OnExhausted`].
pub struct GenerationClient<I: InferenceBackend> {
    backend: I,
    config: GenerationConfig,
}

impl<I: InferenceBackend> GenerationClient<I> {
    pub fn new(backend: I) -> Self {
        Self {
            backend,
            config: GenerationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// 2-4 sentence summary. Degrades to an empty string.
    pub async fn generate_summary(&self, title: &str, text: &str) -> GenerationTaskResult<String> {
        let content = truncate_by_budget(text, self.config.content_token_budget);
        let prompt = prompts::format_summary_prompt(title, &content);
        self.run_task(TaskKind::Summary, &prompt, parse::summary).await
    }

    /// People, organizations and locations, each capped. Degrades to empty
    /// lists.
    pub async fn extract_entities(&self, title: &str, text: &str) -> GenerationTaskResult<KeyEntities> {
        let content = truncate_by_budget(text, self.config.content_token_budget);
        let prompt = prompts::format_entities_prompt(title, &content);
        let cap = self.config.max_entities_per_kind;
        self.run_task(TaskKind::Entities, &prompt, |value| parse::entities(value, cap))
            .await
    }

    /// At most `count` validated questions. Fatal on exhaustion.
    pub async fn generate_questions(
        &self,
        title: &str,
        text: &str,
        count: usize,
    ) -> GenerationTaskResult<Vec<Question>> {
        let content = truncate_by_budget(text, self.config.content_token_budget);
        let prompt = prompts::format_questions_prompt(title, &content, count);
        self.run_task(TaskKind::Questions, &prompt, |value| parse::questions(value, count))
            .await
    }

    /// Further-reading topics informed by the extracted entities. Degrades to
    /// an empty list.
    pub async fn generate_related_topics(
        &self,
        title: &str,
        text: &str,
        entities: &KeyEntities,
    ) -> GenerationTaskResult<Vec<String>> {
        let content = truncate_by_budget(text, self.config.related_topics_token_budget);
        let prompt = prompts::format_related_topics_prompt(
            title,
            &content,
            entities,
            self.config.entities_in_topics_prompt,
        );
        let cap = self.config.max_related_topics;
        self.run_task(TaskKind::RelatedTopics, &prompt, |value| {
            parse::related_topics(value, cap)
        })
        .await
    }

    async fn run_task<T, P>(&self, task: TaskKind, prompt: &str, validate: P) -> GenerationTaskResult<T>
    where
        T: Default,
        P: Fn(&Value) -> Result<T, AttemptError>,
    {
        let max_attempts = self.config.retry.max_attempts.max(1);
        let mut attempt = 1;

        let last = loop {
            match self.attempt(prompt, &validate).await {
                Ok(value) => {
                    debug!(task = %task, attempt, backend = self.backend.name(), "Generation succeeded");
                    return GenerationTaskResult::Success(value);
                }
                Err(e) if attempt < max_attempts => {
                    warn!(task = %task, attempt, max_attempts, error = %e, "Generation attempt failed, retrying");
                    attempt += 1;
                }
                Err(e) => {
                    warn!(task = %task, attempt, max_attempts, error = %e, "Generation attempt failed");
                    break e;
                }
            }
        };

        let error = GenerationError {
            task,
            attempts: max_attempts,
            last,
        };
        match self.config.retry.on_exhausted(task) {
            OnExhausted::Degrade => {
                info!(task = %task, error = %error, "Using default value after exhausted attempts");
                GenerationTaskResult::Degraded(T::default())
            }
            OnExhausted::Fail => GenerationTaskResult::Fatal(error),
        }
    }

    async fn attempt<T, P>(&self, prompt: &str, validate: &P) -> Result<T, AttemptError>
    where
        P: Fn(&Value) -> Result<T, AttemptError>,
    {
        let text = self.backend.invoke(prompt).await?;
        let value = parse::parse_structured(&text)?;
        validate(&value)
    }
}
