//! HTTP fetch collaborator.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::NetworkResult;

/// A single GET request for an article page.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub timeout: Duration,
}

/// Raw response to a [`FetchRequest`].
///
/// Any HTTP status is returned here; interpreting non-2xx statuses is the
/// caller's job.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
    /// URL after redirects.
    pub final_url: String,
}

impl FetchResponse {
    pub fn ok(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            final_url: url.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the article GET.
///
/// Implementations raise `NetworkError::Timeout` when the request exceeds
/// `request.timeout`, `NetworkError::RedirectBlocked` when a redirect target
/// fails the URL policy, and `NetworkError::Connection` for transport failures.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(&self, request: &FetchRequest) -> NetworkResult<FetchResponse>;

    /// Fetcher name for logging.
    fn name(&self) -> &str {
        "fetcher"
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for std::sync::Arc<T> {
    async fn get(&self, request: &FetchRequest) -> NetworkResult<FetchResponse> {
        (**self).get(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
