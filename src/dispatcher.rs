//! Ordered, regex-based request dispatch.
//!
//! A [`Dispatcher`] holds a fixed list of `(pattern, handler)` routes built
//! at startup. Each pattern is a regular expression body that must match the
//! **whole** request path; it is anchored and compiled when registered, so a
//! malformed pattern is reported before the server starts.
//!
//! Dispatch walks the routes in registration order and calls the first
//! handler whose pattern matches. Specificity plays no part: an earlier,
//! broader pattern shadows a later, narrower one. When nothing matches the
//! response is `404 Not Found`.
//!
//! Handlers are ordinary Axum handlers, so they can use any extractor
//! (`State`, `Json`, `Method`, `Uri`, ...).
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new()
//!     .route("/", top_handler)?
//!     .route(r"/[0-9A-Za-z]{6,}", redirect_handler)?;
//!
//! let app = Router::new().fallback_service(dispatcher.with_state(state));
//! ```

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::handler::Handler;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use regex::Regex;
use tracing::debug;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

type BoxedHandler<S> = Arc<dyn Fn(Request, S) -> BoxFuture<Response> + Send + Sync>;

/// Errors raised while building the route table.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A registered route: the original pattern, its anchored regex and handler.
pub struct Route<S> {
    pattern: String,
    regex: Regex,
    handler: BoxedHandler<S>,
}

impl<S> Route<S> {
    /// The pattern as registered, without anchors.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns true if the pattern matches the entire `path`.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// First-match-wins route table over request paths.
pub struct Dispatcher<S> {
    routes: Vec<Route<S>>,
}

impl<S> Default for Dispatcher<S> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<S> Dispatcher<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route.
    ///
    /// `pattern` is a regex body without anchors; it is wrapped as
    /// `^(?:pattern)$` so only full-path matches succeed.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if the pattern does not compile.
    pub fn route<H, T>(mut self, pattern: &str, handler: H) -> Result<Self, RouteError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
            RouteError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        let handler: BoxedHandler<S> = Arc::new(move |request: Request, state: S| {
            Box::pin(handler.clone().call(request, state)) as BoxFuture<Response>
        });

        self.routes.push(Route {
            pattern: pattern.to_string(),
            regex,
            handler,
        });

        Ok(self)
    }

    /// Registered routes in precedence order.
    pub fn routes(&self) -> &[Route<S>] {
        &self.routes
    }

    /// Returns the first route whose pattern matches the whole `path`.
    pub fn find(&self, path: &str) -> Option<&Route<S>> {
        self.routes.iter().find(|route| route.matches(path))
    }

    /// Runs the handler of the first matching route, or responds `404`.
    pub async fn dispatch(&self, request: Request, state: S) -> Response {
        let matched = self.find(request.uri().path()).map(|route| {
            debug!(
                path = %request.uri().path(),
                pattern = %route.pattern,
                "Route matched"
            );
            route.handler.clone()
        });

        match matched {
            Some(handler) => handler(request, state).await,
            None => {
                debug!(path = %request.uri().path(), "No route matched");
                StatusCode::NOT_FOUND.into_response()
            }
        }
    }

    /// Binds the dispatcher to application state, producing a `tower::Service`.
    pub fn with_state(self, state: S) -> DispatchService<S> {
        DispatchService {
            dispatcher: Arc::new(self),
            state,
        }
    }
}

/// A [`Dispatcher`] bound to its state, usable as an Axum fallback service.
pub struct DispatchService<S> {
    dispatcher: Arc<Dispatcher<S>>,
    state: S,
}

impl<S: Clone> Clone for DispatchService<S> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S> DispatchService<S> {
    pub fn dispatcher(&self) -> &Dispatcher<S> {
        &self.dispatcher
    }
}

impl<S> tower::Service<Request> for DispatchService<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let dispatcher = self.dispatcher.clone();
        let state = self.state.clone();

        Box::pin(async move { Ok(dispatcher.dispatch(request, state).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::State;
    use tower::ServiceExt;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn request(path: &str) -> Request {
        axum::http::Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_invalid_pattern_fails_at_registration() {
        let result = Dispatcher::<()>::new().route("/(unclosed", || async { "never" });

        match result {
            Err(RouteError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "/(unclosed"),
            Ok(_) => panic!("pattern should not compile"),
        }
    }

    #[test]
    fn test_patterns_are_anchored() {
        let dispatcher = Dispatcher::<()>::new()
            .route("/version", || async { "version" })
            .unwrap();

        assert!(dispatcher.find("/version").is_some());
        assert!(dispatcher.find("/version/extra").is_none());
        assert!(dispatcher.find("/api/version").is_none());
        assert!(dispatcher.find("/versions").is_none());
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let dispatcher = Dispatcher::<()>::new()
            .route("/a|/b", || async { "ab" })
            .unwrap();

        assert!(dispatcher.find("/a").is_some());
        assert!(dispatcher.find("/b").is_some());
        assert!(dispatcher.find("/a/trailing").is_none());
        assert!(dispatcher.find("/leading/b").is_none());
    }

    #[test]
    fn test_find_is_first_match_in_registration_order() {
        let dispatcher = Dispatcher::<()>::new()
            .route("/[a-z]+", || async { "broad" })
            .unwrap()
            .route("/exact", || async { "exact" })
            .unwrap();

        let route = dispatcher.find("/exact").unwrap();
        assert_eq!(route.pattern(), "/[a-z]+");
    }

    #[test]
    fn test_routes_keep_registration_order() {
        let dispatcher = Dispatcher::<()>::new()
            .route("/", || async { "top" })
            .unwrap()
            .route("/version", || async { "version" })
            .unwrap();

        let patterns: Vec<&str> = dispatcher.routes().iter().map(Route::pattern).collect();
        assert_eq!(patterns, vec!["/", "/version"]);
    }

    #[tokio::test]
    async fn test_dispatch_runs_first_matching_handler() {
        let dispatcher = Dispatcher::<()>::new()
            .route("/[a-z]+", || async { "broad" })
            .unwrap()
            .route("/exact", || async { "exact" })
            .unwrap()
            .route("/[0-9]+", || async { "digits" })
            .unwrap();

        let response = dispatcher.dispatch(request("/exact"), ()).await;
        assert_eq!(body_text(response).await, "broad");

        let response = dispatcher.dispatch(request("/123"), ()).await;
        assert_eq!(body_text(response).await, "digits");
    }

    #[tokio::test]
    async fn test_dispatch_no_match_is_not_found() {
        let dispatcher = Dispatcher::<()>::new()
            .route("/", || async { "top" })
            .unwrap();

        let response = dispatcher.dispatch(request("/missing"), ()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_empty_table_is_not_found() {
        let dispatcher = Dispatcher::<()>::new();

        let response = dispatcher.dispatch(request("/"), ()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_ignores_query_string() {
        let dispatcher = Dispatcher::<()>::new()
            .route("/version", || async { "version" })
            .unwrap();

        let response = dispatcher.dispatch(request("/version?verbose=1"), ()).await;
        assert_eq!(body_text(response).await, "version");
    }

    #[tokio::test]
    async fn test_handlers_receive_state() {
        async fn greet(State(name): State<String>) -> String {
            format!("hello {}", name)
        }

        let service = Dispatcher::<String>::new()
            .route("/greet", greet)
            .unwrap()
            .with_state("dispatcher".to_string());

        let response = service.oneshot(request("/greet")).await.unwrap();
        assert_eq!(body_text(response).await, "hello dispatcher");
    }

    #[tokio::test]
    async fn test_service_not_found() {
        let service = Dispatcher::<()>::new().with_state(());

        let response = service.oneshot(request("/anything")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
