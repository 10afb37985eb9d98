//! Application layer services implementing business logic.
//!
//! Services coordinate identifier generation, validation and repository
//! calls, and expose a small API to the HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::entry_service::EntryService`] - Shortening and resolution of URLs

pub mod services;
