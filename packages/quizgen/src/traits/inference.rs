//! Text-generation backend collaborator.

use async_trait::async_trait;

use crate::error::InferenceResult;

/// Turns a rendered prompt into response text.
///
/// No structure is assumed of the response; the generation client imposes
/// all structure when parsing it.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn invoke(&self, prompt: &str) -> InferenceResult<String>;

    /// Backend name for logging.
    fn name(&self) -> &str {
        "inference"
    }
}

#[async_trait]
impl<T: InferenceBackend + ?Sized> InferenceBackend for std::sync::Arc<T> {
    async fn invoke(&self, prompt: &str) -> InferenceResult<String> {
        (**self).invoke(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
