//! OpenAI chat-completions implementation of [`InferenceBackend`].
//!
//! # Example
//!
//! ```rust,ignore
//! use quizgen::inference::OpenAIBackend;
//!
//! let backend = OpenAIBackend::new("sk-...").with_model("gpt-4o-mini");
//! let client = GenerationClient::new(backend);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{InferenceError, InferenceResult};
use crate::security::ApiKey;
use crate::traits::inference::InferenceBackend;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// OpenAI-based inference backend.
#[derive(Clone)]
pub struct OpenAIBackend {
    client: Client,
    api_key: ApiKey,
    model: String,
    temperature: f32,
    base_url: String,
    timeout: Duration,
}

impl OpenAIBackend {
    /// Create a new OpenAI backend with the given API key.
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> InferenceResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| InferenceError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature (default: 0.3).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound each completion request (default: 120 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn transport_error(&self, e: reqwest::Error) -> InferenceError {
        if e.is_timeout() {
            warn!(model = %self.model, timeout_secs = self.timeout.as_secs_f32(), "Chat completion timed out");
            InferenceError::Network(format!("request timed out after {:?}", self.timeout))
        } else {
            InferenceError::Network(e.to_string())
        }
    }

    fn request_body(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl InferenceBackend for OpenAIBackend {
    async fn invoke(&self, prompt: &str) -> InferenceResult<String> {
        if self.api_key.is_empty() {
            return Err(InferenceError::Config("OpenAI API key is empty".into()));
        }

        debug!(model = %self.model, prompt_len = prompt.len(), "Chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose())
            .json(&self.request_body(prompt))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(InferenceError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
