//! DTOs for the shortening endpoint.

use serde::Deserialize;

/// Request body of `POST /shortener/v1`.
///
/// The response is the created [`crate::domain::entities::ShortUrlEntry`].
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    /// The original URL to shorten (`http`, `https` or `ftp`).
    pub url: String,
}
