//! Handler for the shortening endpoint.

use axum::{Json, body::Bytes, extract::State, http::Method};

use crate::api::dto::shorten::ShortenRequest;
use crate::domain::entities::ShortUrlEntry;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL.
///
/// # Endpoint
///
/// `POST /shortener/v1`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// { "ID": "1bqPzWl3xUQa", "URL": "https://example.com", "Count": 0 }
/// ```
///
/// # Errors
///
/// - 405 Method Not Allowed for any method other than `POST`
/// - 400 Bad Request if the body is not valid JSON, the URL does not parse,
///   or its scheme is not `http`, `https` or `ftp`
/// - 500 Internal Server Error on storage failures or when no unique
///   identifier could be found
pub async fn shorten_handler(
    method: Method,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ShortUrlEntry>, AppError> {
    if method != Method::POST {
        return Err(AppError::method_not_allowed(
            "Methods but for POST are not allowed",
        ));
    }

    let payload: ShortenRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("JSON decode error: {}", e)))?;

    let entry = state.entry_service.shorten(&payload.url).await?;

    Ok(Json(entry))
}
