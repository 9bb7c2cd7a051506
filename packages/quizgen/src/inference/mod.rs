//! Inference backend implementations.
//!
//! Available backends:
//! - `OpenAIBackend` - OpenAI chat completions (requires `openai` feature, on by default)

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::OpenAIBackend;
