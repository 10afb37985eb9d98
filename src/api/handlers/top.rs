//! Static endpoints.

/// Placeholder front page.
///
/// `ANY /`
pub async fn top_handler() -> &'static str {
    "hello"
}

/// Service version string.
///
/// `ANY /version`
pub async fn version_handler() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
