//! Core domain entities.
//!
//! - [`ShortUrlEntry`] - A stored mapping from identifier to URL
//! - [`NewEntry`] - Input for creating a mapping

pub mod entry;

pub use entry::{NewEntry, ShortUrlEntry};
