//! In-memory quiz store for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::traits::store::{ListQuery, Page, QuizStore};
use crate::types::quiz::{QuizDocument, QuizRecord};

#[derive(Default)]
struct Inner {
    records: BTreeMap<i64, QuizRecord>,
    /// Unique URL index; authoritative for duplicate detection.
    by_url: HashMap<String, i64>,
    last_id: i64,
}

/// In-memory quiz storage.
///
/// Clones share the same data. Not suitable for production as data is lost
/// on restart.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored quizzes.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Clear all stored data.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.records.clear();
        inner.by_url.clear();
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<QuizRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_url
            .get(url)
            .and_then(|id| inner.records.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<QuizRecord>> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn insert_if_absent(&self, document: QuizDocument) -> Result<QuizRecord> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner
            .by_url
            .get(&document.url)
            .and_then(|id| inner.records.get(id))
        {
            return Ok(existing.clone());
        }

        inner.last_id += 1;
        let record = QuizRecord {
            id: inner.last_id,
            document,
            created_at: Utc::now(),
        };
        inner.by_url.insert(record.document.url.clone(), record.id);
        inner.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self, query: &ListQuery) -> Result<Page> {
        let inner = self.inner.read().await;

        // Ids increase with insertion, so reverse id order is newest first.
        let matching: Vec<&QuizRecord> = inner
            .records
            .values()
            .rev()
            .filter(|r| query.matches(r))
            .collect();

        let records = matching
            .iter()
            .skip(query.offset())
            .take(query.limit)
            .map(|r| (*r).clone())
            .collect();

        Ok(Page {
            records,
            total: matching.len(),
            page: query.page,
            limit: query.limit,
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.records.remove(&id) {
            Some(record) => {
                inner.by_url.remove(record.url());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
