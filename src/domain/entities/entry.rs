//! Short URL entry linking an identifier to its original URL.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored mapping from a short identifier to a long URL.
///
/// `id` and `url` never change after creation. `access_count` is only ever
/// incremented, once per successful resolution.
///
/// Serializes as `{"ID": ..., "URL": ..., "Count": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortUrlEntry {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Count")]
    pub access_count: i64,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

impl ShortUrlEntry {
    /// Creates a new entry instance.
    pub fn new(id: String, url: String, access_count: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            url,
            access_count,
            created_at,
        }
    }
}

/// Input data for creating a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub id: String,
    pub url: String,
}

impl NewEntry {
    /// Converts into a stored entry with a zero access count.
    pub fn into_entry(self, created_at: DateTime<Utc>) -> ShortUrlEntry {
        ShortUrlEntry::new(self.id, self.url, 0, created_at)
    }
}
