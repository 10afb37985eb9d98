//! Repository trait definitions for the domain layer.
//!
//! - [`EntryRepository`] - Short URL entry storage
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod entry_repository;

pub use entry_repository::EntryRepository;

#[cfg(test)]
pub use entry_repository::MockEntryRepository;
