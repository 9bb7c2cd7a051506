//! Content extraction: URL in, cleaned and sectioned article out.
//!
//! Two strategies share one contract. Encyclopedia hosts get the
//! [`specialized`] walk; everything else falls back to [`generic`].
//!
//! # Example
//!
//! ```rust,ignore
//! use quizgen::extractors::ContentExtractor;
//! use quizgen::fetchers::HttpFetcher;
//!
//! let extractor = ContentExtractor::new(HttpFetcher::new());
//! let doc = extractor.extract("https://en.wikipedia.org/wiki/Rust").await?;
//! println!("{} words", doc.word_count());
//! ```

pub mod generic;
pub mod specialized;

use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ExtractionError, ExtractionResult, NetworkError};
use crate::html::ParsedDocument;
use crate::security::UrlValidator;
use crate::text::word_count;
use crate::traits::fetcher::{FetchRequest, PageFetcher};
use crate::types::config::ExtractorConfig;
use crate::types::document::{ExtractedDocument, SourceKind};

/// Title used when a page offers none.
pub(crate) const UNTITLED: &str = "Untitled Article";

pub(crate) fn enforce_min_words(full_text: &str, min_words: usize) -> ExtractionResult<()> {
    let observed = word_count(full_text);
    if observed < min_words {
        return Err(ExtractionError::InsufficientContent {
            observed,
            required: min_words,
        });
    }
    Ok(())
}

/// Strategy for a URL, chosen by host.
pub fn strategy_for(url: &Url) -> SourceKind {
    match url.host_str() {
        Some(host) if specialized::handles_host(host) => SourceKind::Specialized,
        _ => SourceKind::Generic,
    }
}

/// Fetches an article and extracts its text and sections.
///
/// No retries happen here: a blocked URL, failed fetch or short article is
/// surfaced immediately.
pub struct ContentExtractor<F: PageFetcher> {
    fetcher: F,
    validator: UrlValidator,
    config: ExtractorConfig,
}

impl<F: PageFetcher> ContentExtractor<F> {
    /// Create an extractor with default security rules and settings.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            validator: UrlValidator::new(),
            config: ExtractorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the URL validator.
    pub fn with_validator(mut self, validator: UrlValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Validate, fetch and extract `url`.
    pub async fn extract(&self, url: &str) -> ExtractionResult<ExtractedDocument> {
        let parsed = self.validator.validate(url)?;

        let request = FetchRequest {
            url: parsed.to_string(),
            user_agent: self.config.user_agent.clone(),
            accept: self.config.accept.clone(),
            accept_language: self.config.accept_language.clone(),
            timeout: self.config.request_timeout,
        };

        debug!(url = %parsed, fetcher = self.fetcher.name(), "Fetching article");
        let response = self.fetcher.get(&request).await?;

        if !response.is_success() {
            warn!(url = %parsed, status = response.status, "Article fetch returned error status");
            return Err(NetworkError::from_status(url, response.status).into());
        }

        // Redirects may land somewhere the original URL would not be allowed.
        if response.final_url != request.url {
            self.validator.validate(&response.final_url)?;
        }

        let document = self.extract_from_html(&parsed, &response.body)?;
        info!(
            url = %parsed,
            title = %document.title(),
            word_count = document.word_count(),
            sections = document.sections().len(),
            "Article extracted"
        );
        Ok(document)
    }

    /// Run the host-appropriate strategy over already-fetched HTML.
    pub fn extract_from_html(&self, url: &Url, html: &str) -> ExtractionResult<ExtractedDocument> {
        let doc = ParsedDocument::parse(html);
        let min_words = self.config.min_content_words;

        let strategy = strategy_for(url);
        debug!(url = %url, strategy = ?strategy, "Selected extraction strategy");

        match strategy {
            SourceKind::Specialized => specialized::extract(&doc, min_words),
            SourceKind::Generic => generic::extract(&doc, min_words),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SecurityError;
    use crate::testing::MockFetcher;
    use crate::traits::fetcher::FetchResponse;

    fn article(words: usize) -> String {
        format!(
            "<html><head><title>Essay</title></head><body><article><p>{}</p></article></body></html>",
            vec!["word"; words].join(" ")
        )
    }

    #[test]
    fn test_strategy_for_host() {
        let wiki = Url::parse("https://en.wikipedia.org/wiki/Rust").unwrap();
        let blog = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(strategy_for(&wiki), SourceKind::Specialized);
        assert_eq!(strategy_for(&blog), SourceKind::Generic);
    }

    #[tokio::test]
    async fn test_word_count_boundary() {
        let fetcher = MockFetcher::new()
            .with_page("https://example.com/ok", article(300))
            .with_page("https://example.com/short", article(299));
        let extractor = ContentExtractor::new(fetcher);

        let doc = extractor.extract("https://example.com/ok").await.unwrap();
        assert_eq!(doc.word_count(), 300);
        assert_eq!(doc.title(), "Essay");

        let err = extractor.extract("https://example.com/short").await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::InsufficientContent {
                observed: 299,
                required: 300
            }
        ));
    }

    #[tokio::test]
    async fn test_blocked_urls_never_fetch() {
        let fetcher = MockFetcher::new();
        let extractor = ContentExtractor::new(fetcher.clone());

        for url in [
            "http://127.0.0.1/admin",
            "http://10.0.0.5/",
            "http://localhost:8080/",
            "file:///etc/passwd",
        ] {
            let err = extractor.extract(url).await.unwrap_err();
            assert!(matches!(err, ExtractionError::Security(_)), "{url} not blocked");
        }
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_status_errors() {
        let fetcher = MockFetcher::new()
            .with_status("https://example.com/gone", 404)
            .with_status("https://example.com/private", 403)
            .with_status("https://example.com/broken", 500);
        let extractor = ContentExtractor::new(fetcher);

        assert!(matches!(
            extractor.extract("https://example.com/gone").await,
            Err(ExtractionError::Network(NetworkError::NotFound { .. }))
        ));
        assert!(matches!(
            extractor.extract("https://example.com/private").await,
            Err(ExtractionError::Network(NetworkError::Forbidden { .. }))
        ));
        assert!(matches!(
            extractor.extract("https://example.com/broken").await,
            Err(ExtractionError::Network(NetworkError::Http { status: 500, .. }))
        ));
    }

    #[tokio::test]
    async fn test_timeout_surfaces() {
        let fetcher = MockFetcher::new().with_timeout("https://slow.example.com/");
        let extractor = ContentExtractor::new(fetcher);
        assert!(matches!(
            extractor.extract("https://slow.example.com/").await,
            Err(ExtractionError::Network(NetworkError::Timeout { .. }))
        ));
    }

    #[tokio::test]
    async fn test_redirect_into_private_range_is_blocked() {
        let fetcher = MockFetcher::new().with_response(
            "https://example.com/jump",
            FetchResponse {
                status: 200,
                body: article(400),
                final_url: "http://169.254.169.254/latest/meta-data".into(),
            },
        );
        let extractor = ContentExtractor::new(fetcher);
        assert!(matches!(
            extractor.extract("https://example.com/jump").await,
            Err(ExtractionError::Security(SecurityError::BlockedCidr(_)))
        ));
    }

    #[tokio::test]
    async fn test_request_carries_configured_headers() {
        let fetcher = MockFetcher::new().with_page("https://example.com/a", article(5));
        let extractor = ContentExtractor::new(fetcher.clone()).with_config(
            ExtractorConfig::default()
                .with_min_content_words(1)
                .with_user_agent("TestAgent/1.0"),
        );
        extractor.extract("https://example.com/a").await.unwrap();

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user_agent, "TestAgent/1.0");
        assert_eq!(requests[0].timeout, std::time::Duration::from_secs(30));
    }
}
