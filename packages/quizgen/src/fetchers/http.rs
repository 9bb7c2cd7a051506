//! HTTP page fetcher backed by `reqwest`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::redirect::{Attempt, Policy};
use tracing::{debug, warn};

use crate::error::{NetworkError, NetworkResult};
use crate::security::UrlValidator;
use crate::traits::fetcher::{FetchRequest, FetchResponse, PageFetcher};

const MAX_REDIRECTS: usize = 10;

/// Redirect policy that runs every hop through `validator` before it is
/// requested.
fn redirect_policy(validator: UrlValidator) -> Policy {
    Policy::custom(move |attempt: Attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        match validator.validate(attempt.url().as_str()) {
            Ok(_) => attempt.follow(),
            Err(e) => {
                warn!(target_url = %attempt.url(), error = %e, "Refusing redirect");
                attempt.error(e)
            }
        }
    })
}

/// Fetches article pages over HTTP.
///
/// Redirects are followed only to targets the URL policy allows; the
/// response carries the final URL.
///
/// # Example
///
/// ```rust,ignore
/// use quizgen::fetchers::HttpFetcher;
/// use quizgen::ContentExtractor;
///
/// let extractor = ContentExtractor::new(HttpFetcher::new());
/// ```
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a fetcher that checks redirects with the default URL policy.
    pub fn new() -> Self {
        Self::with_validator(UrlValidator::new())
    }

    /// Create a fetcher that checks redirects with `validator`.
    pub fn with_validator(validator: UrlValidator) -> Self {
        Self {
            client: reqwest::Client::builder()
                .redirect(redirect_policy(validator))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Set a custom HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, request: &FetchRequest) -> NetworkResult<FetchResponse> {
        debug!(url = %request.url, timeout_secs = request.timeout.as_secs(), "HTTP fetch starting");

        let response = self
            .client
            .get(&request.url)
            .header(USER_AGENT, &request.user_agent)
            .header(ACCEPT, &request.accept)
            .header(ACCEPT_LANGUAGE, &request.accept_language)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| transport_error(&request.url, e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&request.url, e))?;

        debug!(url = %request.url, status, final_url = %final_url, bytes = body.len(), "HTTP fetch finished");

        Ok(FetchResponse {
            status,
            body,
            final_url,
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> NetworkError {
    if e.is_redirect() {
        NetworkError::RedirectBlocked {
            url: url.to_string(),
            reason: e.to_string(),
        }
    } else if e.is_timeout() {
        warn!(url = %url, "HTTP request timed out");
        NetworkError::Timeout {
            url: url.to_string(),
        }
    } else {
        warn!(url = %url, error = %e, "HTTP request failed");
        NetworkError::Connection {
            url: url.to_string(),
            source: Box::new(e),
        }
    }
}
