//! Entry creation and resolution service.

use std::sync::Arc;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{debug, info, warn};

use crate::domain::entities::{NewEntry, ShortUrlEntry};
use crate::domain::repositories::EntryRepository;
use crate::error::AppError;
use crate::utils::id_generator::IdGenerator;
use crate::utils::url_validator::validate_url;

/// Default number of identifiers tried before giving up on a shortening request.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Service for shortening URLs and resolving identifiers.
///
/// Identifier uniqueness is decided by the repository's conditional insert.
/// On a conflict the service draws a fresh identifier and tries again, up to
/// `max_attempts` times.
pub struct EntryService {
    repository: Arc<dyn EntryRepository>,
    generator: IdGenerator,
    max_attempts: usize,
}

impl EntryService {
    /// Creates a new entry service.
    ///
    /// `max_attempts` is clamped to at least one.
    pub fn new(
        repository: Arc<dyn EntryRepository>,
        generator: IdGenerator,
        max_attempts: usize,
    ) -> Self {
        Self {
            repository,
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn generator(&self) -> &IdGenerator {
        &self.generator
    }

    /// Stores `url` under a freshly generated identifier.
    ///
    /// The URL is stored exactly as submitted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL does not parse or its scheme
    /// is not `http`, `https` or `ftp`.
    ///
    /// Returns [`AppError::Internal`] if every attempt collided with an
    /// existing identifier, or on storage errors.
    pub async fn shorten(&self, url: &str) -> Result<ShortUrlEntry, AppError> {
        validate_url(url).map_err(|e| AppError::bad_request(e.to_string()))?;

        let strategy = ExponentialBackoff::from_millis(2)
            .max_delay(Duration::from_millis(50))
            .take(self.max_attempts - 1);

        let result = RetryIf::start(
            strategy,
            || self.try_insert(url),
            |e: &AppError| {
                let collided = matches!(e, AppError::Conflict { .. });
                if collided {
                    warn!("Identifier collision, regenerating: {}", e);
                }
                collided
            },
        )
        .await;

        match result {
            Ok(entry) => {
                info!(id = %entry.id, url = %entry.url, "Created short URL");
                Ok(entry)
            }
            Err(AppError::Conflict { .. }) => Err(AppError::internal(format!(
                "failed to generate a unique identifier after {} attempts",
                self.max_attempts
            ))),
            Err(e) => Err(e),
        }
    }

    /// Resolves an identifier and counts the access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no entry has this identifier.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, id: &str) -> Result<ShortUrlEntry, AppError> {
        let entry = self
            .repository
            .record_access(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("short URL not found: {}", id)))?;

        debug!(id = %entry.id, count = entry.access_count, "Resolved short URL");
        Ok(entry)
    }

    /// Looks up an entry without counting an access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no entry has this identifier.
    pub async fn get(&self, id: &str) -> Result<ShortUrlEntry, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("short URL not found: {}", id)))
    }

    /// Checks that the backing store responds.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    async fn try_insert(&self, url: &str) -> Result<ShortUrlEntry, AppError> {
        let id = self
            .generator
            .generate()
            .map_err(|e| AppError::internal(format!("identifier generation failed: {}", e)))?;

        self.repository
            .insert(NewEntry {
                id,
                url: url.to_string(),
            })
            .await
    }
}
