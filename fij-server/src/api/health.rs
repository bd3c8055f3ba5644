//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Whether the database has been opened yet (it opens on first use)
    pub database_ready: bool,
}

/// GET /health
///
/// Does not require a session and does not force database initialization.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "fij-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database_ready: state.db.is_initialized(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
