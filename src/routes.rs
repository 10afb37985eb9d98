//! Route table and top-level router.
//!
//! # Route Table
//!
//! Routes are matched against the whole request path in this order; the
//! first match wins.
//!
//! | Pattern                  | Handler                                   |
//! |--------------------------|-------------------------------------------|
//! | `/`                      | [`top_handler`] - placeholder body         |
//! | `/version`               | [`version_handler`] - crate version        |
//! | `/health`                | [`health_handler`] - store check           |
//! | `/shortener/v1`          | [`shorten_handler`] - create a short URL   |
//! | `/[0-9A-Za-z_\-]{6,}`    | [`redirect_handler`] - resolve identifier  |
//!
//! Anything else is answered with `404 Not Found` by the dispatcher.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging

use crate::api::handlers::{
    health_handler, redirect_handler, shorten_handler, top_handler, version_handler,
};
use crate::api::middleware::tracing;
use crate::dispatcher::{Dispatcher, RouteError};
use crate::state::AppState;
use axum::Router;

/// Pattern for identifier paths: at least six URL-safe alphabet symbols.
pub const IDENTIFIER_PATTERN: &str = r"/[0-9A-Za-z_\-]{6,}";

/// Builds the ordered route table.
///
/// # Errors
///
/// Returns [`RouteError`] if a pattern fails to compile.
pub fn dispatcher() -> Result<Dispatcher<AppState>, RouteError> {
    Dispatcher::new()
        .route("/", top_handler)?
        .route("/version", version_handler)?
        .route("/health", health_handler)?
        .route("/shortener/v1", shorten_handler)?
        .route(IDENTIFIER_PATTERN, redirect_handler)
}

/// Constructs the application router around the dispatcher.
///
/// # Errors
///
/// Returns [`RouteError`] if the route table cannot be built.
pub fn app_router(state: AppState) -> Result<Router, RouteError> {
    let dispatch = dispatcher()?.with_state(state);

    Ok(Router::new()
        .fallback_service(dispatch)
        .layer(tracing::layer()))
}
