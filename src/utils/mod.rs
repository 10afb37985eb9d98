//! Utility functions for identifier generation and URL validation.
//!
//! - [`id_generator`] - Time-ordered short identifiers
//! - [`url_validator`] - Scheme and format checks for submitted URLs

pub mod id_generator;
pub mod url_validator;
