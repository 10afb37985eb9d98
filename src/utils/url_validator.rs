//! Validation of URLs submitted for shortening.
//!
//! The submitted string is stored exactly as received; parsing only decides
//! whether it is acceptable. Strings the parser would silently rewrite
//! (surrounding whitespace, embedded tabs or newlines) are rejected, so every
//! accepted string is also a valid `Location` header value.

use url::Url;

/// Schemes accepted as shortening targets.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp"];

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidFormat(String),

    #[error("Scheme is not supported: {0}")]
    UnsupportedScheme(String),
}

/// Checks that `input` is an absolute URL with an allowed scheme.
///
/// Rejects `javascript:`, `data:`, `file:` and every other scheme outside
/// [`ALLOWED_SCHEMES`].
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] for strings that do not parse,
/// have surrounding whitespace, or contain control characters.
/// Returns [`UrlValidationError::UnsupportedScheme`] for disallowed schemes.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com").is_ok());
/// assert!(validate_url("ftp://files.example.com/a.txt").is_ok());
/// assert!(validate_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<Url, UrlValidationError> {
    if input != input.trim() || input.chars().any(|c| c.is_control()) {
        return Err(UrlValidationError::InvalidFormat(input.to_string()));
    }

    let url = Url::parse(input)
        .map_err(|_| UrlValidationError::InvalidFormat(input.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlValidationError::UnsupportedScheme(input.to_string()));
    }

    Ok(url)
}
