//! HTTP API handlers.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::metrics;
use crate::store::{User, UserStore};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide user store.
    pub store: Arc<UserStore>,
    /// Whether creates may carry an empty id.
    pub allow_empty_id: bool,
    /// Prometheus handle, when an exporter is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around an empty store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(UserStore::new()),
            allow_empty_id: false,
            metrics: None,
        }
    }

    /// Accept or reject creates with an empty id.
    pub fn with_allow_empty_id(mut self, allow: bool) -> Self {
        self.allow_empty_id = allow;
        self
    }

    /// Serve `/metrics` from the given handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Decode a request body into a user.
///
/// The body is parsed as JSON whatever the request's `Content-Type` says.
fn decode(body: Result<Bytes, BytesRejection>) -> Result<User, ApiError> {
    let message = match body {
        Ok(bytes) => match serde_json::from_slice::<User>(&bytes) {
            Ok(user) => return Ok(user),
            Err(e) => e.to_string(),
        },
        Err(rejection) => rejection.body_text(),
    };

    metrics::inc_decode_errors();
    debug!(error = %message, "rejected request body");
    Err(ApiError::Decode(message))
}

/// Extract the path id. An id that does not decode cannot name a stored user.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            metrics::inc_users_not_found();
            debug!(error = %rejection.body_text(), "rejected user id");
            Err(ApiError::NotFound)
        }
    }
}

fn not_found(id: &str) -> ApiError {
    metrics::inc_users_not_found();
    debug!(user_id = %id, "user not found");
    ApiError::NotFound
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Prometheus scrape handler - 404 when no exporter is installed.
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// `GET /users` - every stored user.
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.store.get_all().await)
}

/// `GET /users/:id`.
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let id = path_id(path)?;

    match state.store.get_one(&id).await {
        Some(user) => Ok(Json(user)),
        None => Err(not_found(&id)),
    }
}

/// `POST /users` - insert or overwrite the user named by the body's id.
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = decode(body)?;

    if !user.has_id() && !state.allow_empty_id {
        metrics::inc_decode_errors();
        return Err(ApiError::Decode("missing or empty field `id`".to_string()));
    }

    let stored = state.store.put(user).await;
    metrics::inc_users_created();

    Ok((StatusCode::CREATED, Json(stored)))
}

/// `PUT /users/:id` - replace an existing user; the path id wins.
pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<User>, ApiError> {
    let id = path_id(path)?;
    let user = decode(body)?;

    match state.store.replace(&id, user).await {
        Some(stored) => {
            metrics::inc_users_updated();
            Ok(Json(stored))
        }
        None => Err(not_found(&id)),
    }
}

/// `DELETE /users/:id`.
pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(path)?;

    if state.store.delete(&id).await {
        metrics::inc_users_deleted();
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}
