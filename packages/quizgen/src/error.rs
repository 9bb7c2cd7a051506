//! Typed errors for the quiz pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match on
//! the failure category instead of parsing messages.

use std::fmt;

use thiserror::Error;

/// Errors surfaced by the quiz pipeline to its caller.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Requested question count outside the accepted range
    #[error("invalid question count {requested}: must be between {min} and {max}")]
    InvalidQuestionCount {
        requested: usize,
        min: usize,
        max: usize,
    },

    /// Fetching or extracting the article failed
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// Question generation exhausted its attempts
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl QuizError {
    /// Stable category code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            QuizError::InvalidQuestionCount { .. } => "INVALID_REQUEST",
            QuizError::Extraction(ExtractionError::Security(_))
            | QuizError::Extraction(ExtractionError::Network(NetworkError::RedirectBlocked {
                ..
            })) => "URL_BLOCKED",
            QuizError::Extraction(ExtractionError::InsufficientContent { .. }) => {
                "CONTENT_TOO_SHORT"
            }
            QuizError::Extraction(_) => "SCRAPING_FAILED",
            QuizError::Generation(_) => "LLM_GENERATION_FAILED",
            QuizError::Storage(_) => "STORAGE_ERROR",
        }
    }

    pub(crate) fn storage(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        QuizError::Storage(e.into())
    }
}

/// Errors raised while turning a URL into an extracted document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// URL rejected by the network-safety policy
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// Fetch failed
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Too little text survived extraction
    #[error("article is too short ({observed} words, minimum required: {required})")]
    InsufficientContent { observed: usize, required: usize },

    /// No usable content container in the page
    #[error("could not find main content area: {reason}")]
    MissingContent { reason: String },
}

/// Fetch failures, distinguished by kind.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Request exceeded the configured timeout
    #[error("request timed out: {url}")]
    Timeout { url: String },

    /// HTTP 404
    #[error("page not found (404): {url}")]
    NotFound { url: String },

    /// HTTP 403
    #[error("access forbidden (403): {url}")]
    Forbidden { url: String },

    /// Any other non-2xx status
    #[error("HTTP error {status}: {url}")]
    Http { url: String, status: u16 },

    /// A redirect pointed somewhere the URL policy rejects
    #[error("redirect from {url} refused: {reason}")]
    RedirectBlocked { url: String, reason: String },

    /// DNS, TLS or connection failure
    #[error("failed to fetch {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl NetworkError {
    /// Map a non-2xx status to its error kind.
    pub fn from_status(url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        match status {
            404 => NetworkError::NotFound { url },
            403 => NetworkError::Forbidden { url },
            _ => NetworkError::Http { url, status },
        }
    }
}

/// Security-related errors, primarily for SSRF protection.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, metadata endpoints)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Errors an inference backend can raise.
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    /// Missing API key or invalid settings
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection failed or timed out
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response from the backend
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Backend answered without any content
    #[error("empty response from backend")]
    EmptyResponse,
}

/// Why a single generation attempt failed.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The backend call itself failed
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    /// No parse strategy produced structured data
    #[error("could not parse structured data: {0}")]
    Parse(String),

    /// Structured data had the wrong shape
    #[error("invalid response shape: {0}")]
    Shape(String),
}

/// The four structured generation tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Summary,
    Entities,
    Questions,
    RelatedTopics,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Summary => "summary",
            TaskKind::Entities => "entities",
            TaskKind::Questions => "questions",
            TaskKind::RelatedTopics => "related_topics",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generation task exhausted its attempts with no acceptable fallback.
#[derive(Debug, Error)]
#[error("{task} generation failed after {attempts} attempts: {last}")]
pub struct GenerationError {
    pub task: TaskKind,
    pub attempts: u32,
    #[source]
    pub last: AttemptError,
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Result type alias for extraction operations.
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for fetch operations.
pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;

/// Result type alias for inference operations.
pub type InferenceResult<T> = std::result::Result<T, InferenceError>;
