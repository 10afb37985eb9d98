//! Entry repository implementations.
//!
//! - [`PgEntryRepository`] - PostgreSQL storage via SQLx
//! - [`InMemoryEntryRepository`] - Process-local map, used when no database is configured

pub mod memory_entry_repository;
pub mod pg_entry_repository;

pub use memory_entry_repository::InMemoryEntryRepository;
pub use pg_entry_repository::PgEntryRepository;
