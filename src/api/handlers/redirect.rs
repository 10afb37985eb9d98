//! Handler for short URL resolution.

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects an identifier to its original URL.
///
/// # Endpoint
///
/// `ANY /{id}`
///
/// The identifier is the last segment of the request path. Each successful
/// resolution increments the entry's access count before redirecting.
///
/// # Responses
///
/// - 302 Found with `Location` set to the stored URL
/// - 404 Not Found with `Location: /` for unknown identifiers
/// - 500 Internal Server Error on storage failures
pub async fn redirect_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let id = last_segment(uri.path());

    match state.entry_service.resolve(id).await {
        Ok(entry) => match HeaderValue::from_str(&entry.url) {
            Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
            Err(e) => AppError::internal(format!(
                "stored URL for {} is not a valid Location header: {}",
                entry.id, e
            ))
            .into_response(),
        },
        Err(AppError::NotFound { .. }) => (
            StatusCode::NOT_FOUND,
            [(header::LOCATION, "/")],
            "Not Found",
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}
