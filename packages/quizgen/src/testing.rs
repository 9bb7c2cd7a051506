//! Testing utilities including mock implementations.
//!
//! These let applications exercise the pipeline without real HTTP or
//! inference calls. Mocks share their state across clones, so a test can
//! hand one clone to the pipeline and keep another for assertions.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::error::{InferenceError, InferenceResult, NetworkError, NetworkResult, TaskKind};
use crate::generation::prompts::task_marker;
use crate::traits::{
    fetcher::{FetchRequest, FetchResponse, PageFetcher},
    inference::InferenceBackend,
};

#[derive(Debug, Clone)]
enum FetchOutcome {
    Response(FetchResponse),
    Timeout,
    Connection(String),
}

/// A mock fetcher serving canned pages by URL.
///
/// Unknown URLs answer with a 404 response.
#[derive(Default, Clone)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, FetchOutcome>>>,
    requests: Arc<RwLock<Vec<FetchRequest>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_outcome(self, url: impl Into<String>, outcome: FetchOutcome) -> Self {
        self.pages.write().unwrap().insert(url.into(), outcome);
        self
    }

    /// Serve `html` with status 200 for `url`.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        let url = url.into();
        let response = FetchResponse::ok(url.clone(), html);
        self.with_outcome(url, FetchOutcome::Response(response))
    }

    /// Serve an arbitrary response for `url`.
    pub fn with_response(self, url: impl Into<String>, response: FetchResponse) -> Self {
        self.with_outcome(url, FetchOutcome::Response(response))
    }

    /// Answer `url` with an empty body and the given status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        let response = FetchResponse {
            status,
            body: String::new(),
            final_url: url.clone(),
        };
        self.with_outcome(url, FetchOutcome::Response(response))
    }

    /// Make requests for `url` time out.
    pub fn with_timeout(self, url: impl Into<String>) -> Self {
        self.with_outcome(url, FetchOutcome::Timeout)
    }

    /// Make requests for `url` fail to connect.
    pub fn with_connection_failure(self, url: impl Into<String>, reason: impl Into<String>) -> Self {
        self.with_outcome(url, FetchOutcome::Connection(reason.into()))
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.read().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn get(&self, request: &FetchRequest) -> NetworkResult<FetchResponse> {
        self.requests.write().unwrap().push(request.clone());

        let outcome = self.pages.read().unwrap().get(&request.url).cloned();
        match outcome {
            Some(FetchOutcome::Response(response)) => Ok(response),
            Some(FetchOutcome::Timeout) => Err(NetworkError::Timeout {
                url: request.url.clone(),
            }),
            Some(FetchOutcome::Connection(reason)) => Err(NetworkError::Connection {
                url: request.url.clone(),
                source: reason.into(),
            }),
            None => Ok(FetchResponse {
                status: 404,
                body: String::new(),
                final_url: request.url.clone(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// One scripted inference reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Error(InferenceError),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }

    pub fn error(error: InferenceError) -> Self {
        MockReply::Error(error)
    }
}

/// A mock inference backend with replies scripted per generation task.
///
/// The task is recognized from the prompt. A task's replies are consumed in
/// order and the last one repeats. Unscripted tasks fail with
/// `InferenceError::EmptyResponse`.
#[derive(Default, Clone)]
pub struct MockInference {
    scripts: Arc<RwLock<HashMap<TaskKind, VecDeque<MockReply>>>>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl MockInference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `task` with `reply`.
    pub fn on_task(self, task: TaskKind, reply: MockReply) -> Self {
        self.on_task_sequence(task, vec![reply])
    }

    /// Answer `task` with `replies` in order, repeating the last.
    pub fn on_task_sequence(self, task: TaskKind, replies: Vec<MockReply>) -> Self {
        self.scripts
            .write()
            .unwrap()
            .insert(task, replies.into_iter().collect());
        self
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.read().unwrap().len()
    }

    /// Prompts received for one task.
    pub fn calls_for(&self, task: TaskKind) -> usize {
        let marker = task_marker(task);
        self.prompts
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.contains(marker))
            .count()
    }

    fn task_of(prompt: &str) -> Option<TaskKind> {
        [
            TaskKind::Summary,
            TaskKind::Entities,
            TaskKind::Questions,
            TaskKind::RelatedTopics,
        ]
        .into_iter()
        .find(|task| prompt.contains(task_marker(*task)))
    }
}

#[async_trait]
impl InferenceBackend for MockInference {
    async fn invoke(&self, prompt: &str) -> InferenceResult<String> {
        self.prompts.write().unwrap().push(prompt.to_string());

        let reply = Self::task_of(prompt).and_then(|task| {
            let mut scripts = self.scripts.write().unwrap();
            let queue = scripts.get_mut(&task)?;
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        });

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(error)) => Err(error),
            None => Err(InferenceError::EmptyResponse),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::prompts::{format_entities_prompt, format_summary_prompt};
    use std::time::Duration;

    fn request(url: &str) -> FetchRequest {
        FetchRequest {
            url: url.to_string(),
            user_agent: "test".into(),
            accept: "*/*".into(),
            accept_language: "en".into(),
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_mock_fetcher_serves_and_tracks() {
        let fetcher = MockFetcher::new().with_page("https://a.com/", "<p>hi</p>");
        let observer = fetcher.clone();

        let response = fetcher.get(&request("https://a.com/")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<p>hi</p>");

        let missing = fetcher.get(&request("https://b.com/")).await.unwrap();
        assert_eq!(missing.status, 404);
        assert_eq!(observer.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_fetcher_failures() {
        let fetcher = MockFetcher::new()
            .with_timeout("https://slow.com/")
            .with_connection_failure("https://down.com/", "dns");
        assert!(matches!(
            fetcher.get(&request("https://slow.com/")).await,
            Err(NetworkError::Timeout { .. })
        ));
        assert!(matches!(
            fetcher.get(&request("https://down.com/")).await,
            Err(NetworkError::Connection { .. })
        ));
    }

    #[tokio::test]
    async fn test_mock_inference_routes_by_task() {
        let mock = MockInference::new()
            .on_task_sequence(
                TaskKind::Summary,
                vec![MockReply::text("first"), MockReply::text("second")],
            )
            .on_task(TaskKind::Entities, MockReply::text("entities"));

        let summary = format_summary_prompt("T", "C");
        assert_eq!(mock.invoke(&summary).await.unwrap(), "first");
        assert_eq!(mock.invoke(&summary).await.unwrap(), "second");
        assert_eq!(mock.invoke(&summary).await.unwrap(), "second");
        assert_eq!(
            mock.invoke(&format_entities_prompt("T", "C")).await.unwrap(),
            "entities"
        );
        assert!(matches!(
            mock.invoke("unrelated prompt").await,
            Err(InferenceError::EmptyResponse)
        ));
        assert_eq!(mock.calls_for(TaskKind::Summary), 3);
        assert_eq!(mock.call_count(), 5);
    }
}
