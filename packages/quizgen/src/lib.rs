//! Article-to-Quiz Generation Library
//!
//! Turns a public article URL into a persisted multiple-choice quiz: the page
//! is fetched and cleaned into sections, a text-generation backend writes a
//! summary, named entities, questions and related topics, and the result is
//! stored once per normalized URL.
//!
//! # Failure model
//!
//! - A blocked URL, failed fetch or too-short article aborts the run
//! - Question generation aborts the run after its attempts are exhausted
//! - Summary, entities and related topics degrade to empty values instead
//!
//! # Usage
//!
//! ```rust,ignore
//! use quizgen::{ContentExtractor, GenerationClient, HttpFetcher, MemoryStore, QuizPipeline};
//! use quizgen::inference::OpenAIBackend;
//!
//! let pipeline = QuizPipeline::new(
//!     ContentExtractor::new(HttpFetcher::new()),
//!     GenerationClient::new(OpenAIBackend::from_env()?),
//!     MemoryStore::new(),
//! );
//!
//! let record = pipeline
//!     .run("https://en.wikipedia.org/wiki/Alan_Turing", 8)
//!     .await?
//!     .into_record();
//! println!("{} questions", record.question_count());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator abstractions (PageFetcher, InferenceBackend, QuizStore)
//! - [`types`] - Configuration, extracted documents and quiz records
//! - [`extractors`] - URL policy, fetch and the two extraction strategies
//! - [`generation`] - Prompts, response parsing and the retrying client
//! - [`pipeline`] - The end-to-end orchestrator
//! - [`stores`] - Storage implementations (MemoryStore, SqliteStore)
//! - [`security`] - SSRF protection and API key handling
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod generation;
pub mod html;
pub mod inference;
pub mod pipeline;
pub mod security;
pub mod stores;
pub mod testing;
pub mod text;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    AttemptError, ExtractionError, GenerationError, InferenceError, NetworkError, QuizError,
    Result, SecurityError, TaskKind,
};
pub use traits::{
    fetcher::{FetchRequest, FetchResponse, PageFetcher},
    inference::InferenceBackend,
    store::{ListQuery, Page, QuizStore},
};
pub use types::{
    config::{ExtractorConfig, GenerationConfig, OnExhausted, PipelineConfig, RetryPolicy},
    document::{ExtractedDocument, Section, SourceKind},
    quiz::{AnswerKey, Difficulty, KeyEntities, Question, QuizDocument, QuizRecord},
};

pub use extractors::ContentExtractor;
pub use fetchers::HttpFetcher;
pub use generation::{GenerationClient, GenerationTaskResult};
pub use pipeline::{normalize_url, PipelineOutcome, QuizPipeline};
pub use security::{ApiKey, UrlValidator};

// Re-export stores
pub use stores::MemoryStore;

#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;

#[cfg(feature = "openai")]
pub use inference::OpenAIBackend;

// Re-export testing utilities
pub use testing::{MockFetcher, MockInference, MockReply};
