//! SQLite storage implementation.
//!
//! Each quiz is one row holding the JSON document. The `url` column's unique
//! constraint is the only guard against duplicate quizzes.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::error::{QuizError, Result};
use crate::traits::store::{ListQuery, Page, QuizStore};
use crate::types::quiz::{QuizDocument, QuizRecord};

/// SQLite-based quiz store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite://quizgen.db?mode=rwc` - File-based, create if missing
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::connect(database_url, 5).await
    }

    /// Create an in-memory SQLite store (for testing).
    ///
    /// Uses a single connection: each in-memory connection is its own
    /// database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(QuizError::storage)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quizzes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT UNIQUE NOT NULL,
                title TEXT NOT NULL,
                quiz_data TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_quizzes_created_at ON quizzes(created_at);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(QuizError::storage)?;

        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct QuizRow {
    id: i64,
    quiz_data: String,
    created_at: String,
}

impl QuizRow {
    fn into_record(self) -> Result<QuizRecord> {
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| QuizError::storage(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        let document: QuizDocument = serde_json::from_str(&self.quiz_data)
            .map_err(|e| QuizError::storage(format!("Invalid quiz JSON: {}", e)))?;

        Ok(QuizRecord {
            id: self.id,
            document,
            created_at,
        })
    }
}

/// Escape LIKE wildcards so search text matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl QuizStore for SqliteStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<QuizRecord>> {
        let row = sqlx::query_as::<_, QuizRow>(
            "SELECT id, quiz_data, created_at FROM quizzes WHERE url = ?",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(QuizError::storage)?;

        row.map(QuizRow::into_record).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<QuizRecord>> {
        let row = sqlx::query_as::<_, QuizRow>(
            "SELECT id, quiz_data, created_at FROM quizzes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(QuizError::storage)?;

        row.map(QuizRow::into_record).transpose()
    }

    async fn insert_if_absent(&self, document: QuizDocument) -> Result<QuizRecord> {
        let quiz_data = serde_json::to_string(&document).map_err(QuizError::storage)?;

        sqlx::query(
            r#"
            INSERT INTO quizzes (url, title, quiz_data, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(url) DO NOTHING
            "#,
        )
        .bind(&document.url)
        .bind(&document.title)
        .bind(&quiz_data)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(QuizError::storage)?;

        // Either our row or the one that beat us to the unique key.
        self.find_by_url(&document.url)
            .await?
            .ok_or_else(|| QuizError::storage(format!("quiz for {} vanished after insert", document.url)))
    }

    async fn list(&self, query: &ListQuery) -> Result<Page> {
        let pattern = query.search.as_deref().map(like_pattern);

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM quizzes
            WHERE ?1 IS NULL
               OR LOWER(title) LIKE LOWER(?1) ESCAPE '\'
               OR LOWER(url) LIKE LOWER(?1) ESCAPE '\'
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(QuizError::storage)?;

        let rows = sqlx::query_as::<_, QuizRow>(
            r#"
            SELECT id, quiz_data, created_at FROM quizzes
            WHERE ?1 IS NULL
               OR LOWER(title) LIKE LOWER(?1) ESCAPE '\'
               OR LOWER(url) LIKE LOWER(?1) ESCAPE '\'
            ORDER BY created_at DESC, id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(pattern.as_deref())
        .bind(query.limit as i64)
        .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(QuizError::storage)?;

        let records = rows
            .into_iter()
            .map(QuizRow::into_record)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            records,
            total: total.0 as usize,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(QuizError::storage)?;

        Ok(result.rows_affected() > 0)
    }
}
