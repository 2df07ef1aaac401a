//! HTTP routing.
//!
//! Routing is by path only: any method is accepted, and headers and body are
//! never inspected.

use std::sync::Arc;

use axum::{Router, body::Body, http::Request, routing::any};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::auth::{self, AppState};

/// Path that starts sign-in.
pub const LOGIN_PATH: &str = "/login";

/// Path GitHub redirects back to after authorization.
pub const CALLBACK_PATH: &str = "/github/callback";

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(LOGIN_PATH, any(auth::login))
        .route(CALLBACK_PATH, any(auth::callback))
        .fallback(auth::fallback)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

/// Span for one request. Records the path only: the callback query carries
/// the authorization code.
fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}
