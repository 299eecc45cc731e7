use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::app_state::AppState;

pub mod health;
pub mod metrics;
pub mod tryon;

/// Two inline reference photos as base64 data URIs.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// API routes that share [`AppState`]. `/metrics` is mounted separately by
/// the server binary because it owns the global recorder.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/try-on", post(tryon::submit_try_on))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
