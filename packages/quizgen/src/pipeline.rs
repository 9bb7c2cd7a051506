//! The quiz pipeline: URL in, persisted quiz out.
//!
//! One run is strictly sequential: an optional store lookup, one fetch, then
//! summary, entities, questions and related topics, then an idempotent
//! insert. Only extraction and question generation can abort a run; the
//! other three tasks degrade to empty values.
//!
//! # Example
//!
//! ```rust,ignore
//! use quizgen::{ContentExtractor, GenerationClient, MemoryStore, QuizPipeline};
//!
//! let pipeline = QuizPipeline::new(
//!     ContentExtractor::new(fetcher),
//!     GenerationClient::new(backend),
//!     MemoryStore::new(),
//! );
//! let record = pipeline.run("https://en.wikipedia.org/wiki/Rust", 8).await?.into_record();
//! ```

use tracing::{info, instrument};

use crate::error::{QuizError, Result};
use crate::extractors::ContentExtractor;
use crate::generation::GenerationClient;
use crate::traits::fetcher::PageFetcher;
use crate::traits::inference::InferenceBackend;
use crate::traits::store::QuizStore;
use crate::types::config::PipelineConfig;
use crate::types::quiz::{QuizDocument, QuizRecord};

/// Canonical form of a URL for duplicate detection: trimmed, without
/// fragment, without trailing slashes.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    let url = match url.find('#') {
        Some(idx) => &url[..idx],
        None => url,
    };
    url.trim_end_matches('/').to_string()
}

/// How a successful run obtained its record.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// A new quiz was generated and stored
    Generated(QuizRecord),
    /// A quiz for this URL already existed
    AlreadyStored(QuizRecord),
}

impl PipelineOutcome {
    pub fn record(&self) -> &QuizRecord {
        match self {
            PipelineOutcome::Generated(record) | PipelineOutcome::AlreadyStored(record) => record,
        }
    }

    pub fn into_record(self) -> QuizRecord {
        match self {
            PipelineOutcome::Generated(record) | PipelineOutcome::AlreadyStored(record) => record,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, PipelineOutcome::Generated(_))
    }
}

/// Orchestrates extraction, generation and storage for one URL at a time.
///
/// Holds no per-run state, so one instance may serve concurrent runs.
pub struct QuizPipeline<F, I, S>
where
    F: PageFetcher,
    I: InferenceBackend,
    S: QuizStore,
{
    extractor: ContentExtractor<F>,
    client: GenerationClient<I>,
    store: S,
    config: PipelineConfig,
}

impl<F, I, S> QuizPipeline<F, I, S>
where
    F: PageFetcher,
    I: InferenceBackend,
    S: QuizStore,
{
    pub fn new(extractor: ContentExtractor<F>, client: GenerationClient<I>, store: S) -> Self {
        Self {
            extractor,
            client,
            store,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run with the configured default question count.
    pub async fn run_default(&self, url: &str) -> Result<PipelineOutcome> {
        self.run(url, self.config.default_questions).await
    }

    /// Produce the quiz for `url`, generating it unless one is stored.
    #[instrument(skip(self, url), fields(url = %url.trim()))]
    pub async fn run(&self, url: &str, num_questions: usize) -> Result<PipelineOutcome> {
        if !self.config.accepts_question_count(num_questions) {
            return Err(QuizError::InvalidQuestionCount {
                requested: num_questions,
                min: self.config.min_questions,
                max: self.config.max_questions,
            });
        }

        let url = normalize_url(url);

        if let Some(existing) = self.store.find_by_url(&url).await? {
            info!(id = existing.id, "Quiz already stored");
            return Ok(PipelineOutcome::AlreadyStored(existing));
        }

        let article = self.extractor.extract(&url).await?;
        let (title, text) = (article.title(), article.full_text());

        let summary = self.client.generate_summary(title, text).await;
        let entities = self.client.extract_entities(title, text).await;
        let questions = self
            .client
            .generate_questions(title, text, num_questions)
            .await
            .into_result()?;

        let summary = summary.into_result()?;
        let key_entities = entities.into_result()?;
        let related_topics = self
            .client
            .generate_related_topics(title, text, &key_entities)
            .await
            .into_result()?;

        let document = QuizDocument {
            url: url.clone(),
            title: title.to_string(),
            summary,
            key_entities,
            sections: article.section_headings(),
            quiz: questions,
            related_topics,
        };

        let record = self.store.insert_if_absent(document).await?;
        info!(
            id = record.id,
            questions = record.question_count(),
            "Quiz stored"
        );
        Ok(PipelineOutcome::Generated(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskKind;
    use crate::stores::MemoryStore;
    use crate::testing::{MockFetcher, MockInference, MockReply};

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url(" https://a.com/x/ "), "https://a.com/x");
        assert_eq!(normalize_url("https://a.com/x#history"), "https://a.com/x");
        assert_eq!(normalize_url("https://a.com/x/#top"), "https://a.com/x");
        assert_eq!(normalize_url("https://a.com/x//"), "https://a.com/x");
        assert_eq!(normalize_url("https://a.com/x?q=1"), "https://a.com/x?q=1");
    }

    #[tokio::test]
    async fn test_rejects_question_count_before_any_work() {
        let fetcher = MockFetcher::new();
        let backend = MockInference::new();
        let pipeline = QuizPipeline::new(
            ContentExtractor::new(fetcher.clone()),
            GenerationClient::new(backend.clone()),
            MemoryStore::new(),
        );

        for count in [4, 11] {
            let err = pipeline.run("https://example.com/a", count).await.unwrap_err();
            assert!(matches!(err, QuizError::InvalidQuestionCount { .. }));
            assert_eq!(err.code(), "INVALID_REQUEST");
        }
        assert_eq!(fetcher.call_count(), 0);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extraction_failure_skips_generation() {
        let fetcher = MockFetcher::new().with_status("https://example.com/missing", 404);
        let backend = MockInference::new().on_task(TaskKind::Summary, MockReply::text(r#"{"summary": "s"}"#));
        let store = MemoryStore::new();
        let pipeline = QuizPipeline::new(
            ContentExtractor::new(fetcher),
            GenerationClient::new(backend.clone()),
            store.clone(),
        );

        let err = pipeline.run("https://example.com/missing", 5).await.unwrap_err();
        assert_eq!(err.code(), "SCRAPING_FAILED");
        assert_eq!(backend.call_count(), 0);
        assert_eq!(store.len().await, 0);
    }
}
