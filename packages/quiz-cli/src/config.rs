use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use quizgen::inference::openai::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT,
};
use quizgen::{ApiKey, ExtractorConfig, PipelineConfig};

const DEFAULT_DATABASE_URL: &str = "sqlite://quizgen.db?mode=rwc";

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<ApiKey>,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_timeout: Duration,
    pub database_url: String,
    pub request_timeout: Duration,
    pub user_agent: Option<String>,
    pub min_content_words: usize,
    pub max_questions: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            openai_api_key: non_empty("OPENAI_API_KEY").map(ApiKey::from),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_model: non_empty("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_temperature: parse_or("LLM_TEMPERATURE", non_empty("LLM_TEMPERATURE"), DEFAULT_TEMPERATURE)?,
            llm_timeout: Duration::from_secs(parse_or(
                "LLM_TIMEOUT",
                non_empty("LLM_TIMEOUT"),
                DEFAULT_TIMEOUT.as_secs(),
            )?),
            database_url: non_empty("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT",
                non_empty("REQUEST_TIMEOUT"),
                30u64,
            )?),
            user_agent: non_empty("USER_AGENT"),
            min_content_words: parse_or("MIN_CONTENT_WORDS", non_empty("MIN_CONTENT_WORDS"), 300)?,
            max_questions: parse_or("MAX_QUESTIONS", non_empty("MAX_QUESTIONS"), 10)?,
        })
    }

    /// The API key, required only by commands that generate.
    pub fn require_api_key(&self) -> Result<&ApiKey> {
        self.openai_api_key
            .as_ref()
            .context("OPENAI_API_KEY must be set to generate quizzes")
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        let config = ExtractorConfig::default()
            .with_min_content_words(self.min_content_words)
            .with_request_timeout(self.request_timeout);
        match &self.user_agent {
            Some(agent) => config.with_user_agent(agent.clone()),
            None => config,
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default().with_max_questions(self.max_questions)
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a valid number, got {value:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.llm_model, DEFAULT_MODEL);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.llm_timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.min_content_words, 300);
        assert_eq!(config.max_questions, 10);
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("LLM_MODEL", "gpt-4o"),
            ("LLM_TEMPERATURE", "0.7"),
            ("REQUEST_TIMEOUT", "10"),
            ("LLM_TIMEOUT", "45"),
            ("MIN_CONTENT_WORDS", "150"),
            ("USER_AGENT", "QuizBot/2.0"),
        ])
        .unwrap();
        assert_eq!(config.require_api_key().unwrap().expose(), "sk-test");
        assert_eq!(config.llm_timeout, Duration::from_secs(45));
        assert_eq!(config.llm_model, "gpt-4o");
        assert!((config.llm_temperature - 0.7).abs() < f32::EPSILON);

        let extractor = config.extractor_config();
        assert_eq!(extractor.request_timeout, Duration::from_secs(10));
        assert_eq!(extractor.min_content_words, 150);
        assert_eq!(extractor.user_agent, "QuizBot/2.0");
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-live-SECRET")]).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-live-SECRET"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config_from(&[("OPENAI_API_KEY", "  "), ("DATABASE_URL", "")]).unwrap();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_invalid_number_is_error() {
        let err = config_from(&[("MAX_QUESTIONS", "lots")]).unwrap_err();
        assert!(err.to_string().contains("MAX_QUESTIONS"));
    }
}
