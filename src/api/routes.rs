//! HTTP API route definitions.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_user, delete_user, get_user, health, list_users, render_metrics, update_user, AppState,
};
use crate::metrics;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and metrics endpoints
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        // User endpoints
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn(track_latency))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Record request latency under the matched route template.
async fn track_latency(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;
    metrics::record_http_latency(start, &endpoint);
    response
}
