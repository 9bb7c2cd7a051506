//! Configuration types for extraction, generation and the pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TaskKind;

/// Browser user agent sent with article fetches.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Configuration for the content extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Minimum words of cleaned text an article must have.
    ///
    /// Default: 300.
    pub min_content_words: usize,

    /// Timeout for the single article fetch.
    ///
    /// Default: 30 seconds.
    pub request_timeout: Duration,

    /// User-Agent header value.
    pub user_agent: String,

    /// Accept header value.
    pub accept: String,

    /// Accept-Language header value.
    pub accept_language: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_content_words: 300,
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Set the minimum word count.
    pub fn with_min_content_words(mut self, words: usize) -> Self {
        self.min_content_words = words;
        self
    }

    /// Set the fetch timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// What a task does once every attempt has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnExhausted {
    /// Return the task's default value
    Degrade,
    /// Surface a `GenerationError`
    Fail,
}

/// Retry policy applied uniformly to every generation task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts per task, including the first. Default: 3.
    pub max_attempts: u32,
    pub summary: OnExhausted,
    pub entities: OnExhausted,
    pub questions: OnExhausted,
    pub related_topics: OnExhausted,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            summary: OnExhausted::Degrade,
            entities: OnExhausted::Degrade,
            questions: OnExhausted::Fail,
            related_topics: OnExhausted::Degrade,
        }
    }
}

impl RetryPolicy {
    /// Set total attempts (at least one).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Override the exhaustion behavior for one task.
    pub fn with_on_exhausted(mut self, task: TaskKind, action: OnExhausted) -> Self {
        match task {
            TaskKind::Summary => self.summary = action,
            TaskKind::Entities => self.entities = action,
            TaskKind::Questions => self.questions = action,
            TaskKind::RelatedTopics => self.related_topics = action,
        }
        self
    }

    pub fn on_exhausted(&self, task: TaskKind) -> OnExhausted {
        match task {
            TaskKind::Summary => self.summary,
            TaskKind::Entities => self.entities,
            TaskKind::Questions => self.questions,
            TaskKind::RelatedTopics => self.related_topics,
        }
    }
}

/// Configuration for the generation client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Token budget for article text in summary, entity and question prompts.
    ///
    /// Default: 3500.
    pub content_token_budget: usize,

    /// Token budget for article text in the related-topics prompt.
    ///
    /// Default: 2000.
    pub related_topics_token_budget: usize,

    /// Maximum items kept per entity kind. Default: 10.
    pub max_entities_per_kind: usize,

    /// Entities per kind rendered into the related-topics prompt. Default: 5.
    pub entities_in_topics_prompt: usize,

    /// Maximum related topics kept. Default: 8.
    pub max_related_topics: usize,

    pub retry: RetryPolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            content_token_budget: 3500,
            related_topics_token_budget: 2000,
            max_entities_per_kind: 10,
            entities_in_topics_prompt: 5,
            max_related_topics: 8,
            retry: RetryPolicy::default(),
        }
    }
}

impl GenerationConfig {
    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the main content token budget.
    pub fn with_content_token_budget(mut self, tokens: usize) -> Self {
        self.content_token_budget = tokens;
        self
    }
}

/// Configuration for the orchestrating pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fewest questions a caller may request. Default: 5.
    pub min_questions: usize,

    /// Most questions a caller may request. Default: 10.
    pub max_questions: usize,

    /// Question count used when the caller does not specify one. Default: 8.
    pub default_questions: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_questions: 5,
            max_questions: 10,
            default_questions: 8,
        }
    }
}

impl PipelineConfig {
    /// Set the upper question bound.
    pub fn with_max_questions(mut self, max: usize) -> Self {
        self.max_questions = max.max(self.min_questions);
        self.default_questions = self.default_questions.min(self.max_questions);
        self
    }

    pub fn accepts_question_count(&self, count: usize) -> bool {
        (self.min_questions..=self.max_questions).contains(&count)
    }
}
