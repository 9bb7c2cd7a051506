//! Quiz storage boundary.
//!
//! The store's unique URL key is the only guard against duplicate quizzes:
//! `insert_if_absent` must be atomic and return whichever record won.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::quiz::{QuizDocument, QuizRecord};

/// Most records a single listing page may hold.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Listing request: 1-based page, page size and optional search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: usize,
    pub limit: usize,
    /// Case-insensitive substring matched against title or URL.
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            search: None,
        }
    }
}

impl ListQuery {
    /// Build a query, clamping page to >= 1 and limit to 1..=100.
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            search: None,
        }
    }

    /// Filter by search text. Blank text means no filter.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search.trim().to_string())
        };
        self
    }

    /// Rows to skip; saturates instead of overflowing on huge pages.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.limit)
    }

    /// Whether a record matches the search filter.
    pub fn matches(&self, record: &QuizRecord) -> bool {
        match &self.search {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                record.title().to_lowercase().contains(&term)
                    || record.url().to_lowercase().contains(&term)
            }
        }
    }
}

/// One page of listed quizzes.
#[derive(Debug, Clone)]
pub struct Page {
    pub records: Vec<QuizRecord>,
    /// Matching records across all pages.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

impl Page {
    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }
}

/// Idempotent quiz persistence keyed by normalized URL.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Look up a quiz by its normalized URL.
    async fn find_by_url(&self, url: &str) -> Result<Option<QuizRecord>>;

    /// Look up a quiz by store id.
    async fn find_by_id(&self, id: i64) -> Result<Option<QuizRecord>>;

    /// Insert unless a quiz for the same URL exists; return the stored record
    /// either way.
    async fn insert_if_absent(&self, document: QuizDocument) -> Result<QuizRecord>;

    /// List quizzes newest first.
    async fn list(&self, query: &ListQuery) -> Result<Page>;

    /// Delete a quiz. Returns whether anything was deleted.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
impl<T: QuizStore + ?Sized> QuizStore for std::sync::Arc<T> {
    async fn find_by_url(&self, url: &str) -> Result<Option<QuizRecord>> {
        (**self).find_by_url(url).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<QuizRecord>> {
        (**self).find_by_id(id).await
    }

    async fn insert_if_absent(&self, document: QuizDocument) -> Result<QuizRecord> {
        (**self).insert_if_absent(document).await
    }

    async fn list(&self, query: &ListQuery) -> Result<Page> {
        (**self).list(query).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        (**self).delete(id).await
    }
}
