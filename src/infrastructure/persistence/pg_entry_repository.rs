//! PostgreSQL implementation of the entry repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewEntry, ShortUrlEntry};
use crate::domain::repositories::EntryRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: String,
    url: String,
    access_count: i64,
    created_at: DateTime<Utc>,
}

impl From<EntryRow> for ShortUrlEntry {
    fn from(row: EntryRow) -> Self {
        ShortUrlEntry::new(row.id, row.url, row.access_count, row.created_at)
    }
}

/// PostgreSQL repository for short URL entries.
///
/// Uniqueness of identifiers is enforced by the `short_urls_id_key`
/// constraint; inserts use `ON CONFLICT DO NOTHING` so a taken identifier is
/// reported instead of overwritten.
pub struct PgEntryRepository {
    pool: Arc<PgPool>,
}

impl PgEntryRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn insert(&self, new_entry: NewEntry) -> Result<ShortUrlEntry, AppError> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            INSERT INTO short_urls (id, url)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, url, access_count, created_at
            "#,
        )
        .bind(&new_entry.id)
        .bind(&new_entry.url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortUrlEntry::from)
            .ok_or_else(|| AppError::conflict(format!("identifier already exists: {}", new_entry.id)))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ShortUrlEntry>, AppError> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, url, access_count, created_at
            FROM short_urls
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortUrlEntry::from))
    }

    async fn record_access(&self, id: &str) -> Result<Option<ShortUrlEntry>, AppError> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            UPDATE short_urls
            SET access_count = access_count + 1
            WHERE id = $1
            RETURNING id, url, access_count, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortUrlEntry::from))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
