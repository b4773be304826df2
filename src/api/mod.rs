pub mod auth;
pub mod internal;
pub mod portfolio;
pub mod quotes;
pub mod squareoff;

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", auth::router())
        .nest("/api/internal", internal::router())
        .nest("/api", portfolio::router())
        .merge(quotes::router())
        .merge(squareoff::router())
}

/// Standard wrapper for successful responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Standard body for machine-readable errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
