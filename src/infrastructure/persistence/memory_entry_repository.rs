//! Process-local entry repository.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! Contents are lost when the process exits.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::{NewEntry, ShortUrlEntry};
use crate::domain::repositories::EntryRepository;
use crate::error::AppError;

/// Entry repository backed by a `HashMap` behind an async `RwLock`.
#[derive(Default)]
pub struct InMemoryEntryRepository {
    entries: RwLock<HashMap<String, ShortUrlEntry>>,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        debug!("Using in-memory entry repository");
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn insert(&self, new_entry: NewEntry) -> Result<ShortUrlEntry, AppError> {
        let mut entries = self.entries.write().await;

        match entries.entry(new_entry.id.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "identifier already exists: {}",
                new_entry.id
            ))),
            Entry::Vacant(slot) => Ok(slot.insert(new_entry.into_entry(Utc::now())).clone()),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ShortUrlEntry>, AppError> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn record_access(&self, id: &str) -> Result<Option<ShortUrlEntry>, AppError> {
        let mut entries = self.entries.write().await;

        Ok(entries.get_mut(id).map(|entry| {
            entry.access_count += 1;
            entry.clone()
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_entry(id: &str, url: &str) -> NewEntry {
        NewEntry {
            id: id.to_string(),
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryEntryRepository::new();

        let created = repo
            .insert(new_entry("abcdef123", "https://example.com"))
            .await
            .unwrap();
        assert_eq!(created.access_count, 0);

        let found = repo.find_by_id("abcdef123").await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_insert_conflict_keeps_original() {
        let repo = InMemoryEntryRepository::new();
        repo.insert(new_entry("taken1234", "https://first.com"))
            .await
            .unwrap();

        let result = repo
            .insert(new_entry("taken1234", "https://second.com"))
            .await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));

        let stored = repo.find_by_id("taken1234").await.unwrap().unwrap();
        assert_eq!(stored.url, "https://first.com");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repo = InMemoryEntryRepository::new();
        assert!(repo.find_by_id("nothing00").await.unwrap().is_none());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_record_access_increments() {
        let repo = InMemoryEntryRepository::new();
        repo.insert(new_entry("counted01", "https://example.com"))
            .await
            .unwrap();

        let first = repo.record_access("counted01").await.unwrap().unwrap();
        let second = repo.record_access("counted01").await.unwrap().unwrap();

        assert_eq!(first.access_count, 1);
        assert_eq!(second.access_count, 2);
        assert_eq!(
            repo.find_by_id("counted01")
                .await
                .unwrap()
                .unwrap()
                .access_count,
            2
        );
    }

    #[tokio::test]
    async fn test_record_access_missing() {
        let repo = InMemoryEntryRepository::new();
        assert!(repo.record_access("missing01").await.unwrap().is_none());
    }
}
