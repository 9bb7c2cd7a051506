//! Structured generation: summary, entities, questions and related topics.
//!
//! # Example
//!
//! ```rust,ignore
//! use quizgen::generation::GenerationClient;
//! use quizgen::inference::OpenAIBackend;
//!
//! let client = GenerationClient::new(OpenAIBackend::new(api_key));
//! let questions = client
//!     .generate_questions(doc.title(), doc.full_text(), 8)
//!     .await
//!     .into_result()?;
//! ```

mod client;
pub mod parse;
pub mod prompts;

pub use client::GenerationClient;

use crate::error::GenerationError;

/// Outcome of one generation task after the retry policy ran.
#[derive(Debug)]
#[must_use]
pub enum GenerationTaskResult<T> {
    /// An attempt produced a valid value
    Success(T),
    /// Every attempt failed; the task's default value stands in
    Degraded(T),
    /// Every attempt failed and the task has no acceptable default
    Fatal(GenerationError),
}

impl<T> GenerationTaskResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationTaskResult::Success(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, GenerationTaskResult::Degraded(_))
    }

    /// Collapse to a `Result`, treating a degraded value as usable.
    pub fn into_result(self) -> Result<T, GenerationError> {
        match self {
            GenerationTaskResult::Success(value) | GenerationTaskResult::Degraded(value) => Ok(value),
            GenerationTaskResult::Fatal(error) => Err(error),
        }
    }
}
