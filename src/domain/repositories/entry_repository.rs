//! Repository trait for short URL entry storage.

use crate::domain::entities::{NewEntry, ShortUrlEntry};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for short URL entries.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgEntryRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryEntryRepository`] - Process-local map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Inserts a new entry only if its identifier is not taken.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if an entry with the same identifier
    /// already exists. The existing entry is left untouched.
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_entry: NewEntry) -> Result<ShortUrlEntry, AppError>;

    /// Finds an entry by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: &str) -> Result<Option<ShortUrlEntry>, AppError>;

    /// Atomically increments the access count of an entry.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(entry))` with the incremented count if found
    /// - `Ok(None)` if no entry has this identifier
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn record_access(&self, id: &str) -> Result<Option<ShortUrlEntry>, AppError>;

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
