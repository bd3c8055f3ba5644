//! fij-server library - HTTP surface of the fixed-income journal
//!
//! Router, resource handlers, the session gate and the embedded UI. Exposed
//! as a library so integration tests can drive the router directly.

use axum::Router;
use fij_common::auth::AuthMode;
use fij_common::db::JournalDb;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Lazily-initialized database handle, one per process
    pub db: Arc<JournalDb>,
    /// Password gate configuration
    pub auth: AuthMode,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(db: JournalDb, auth: AuthMode, secure_cookies: bool) -> Self {
        Self {
            db: Arc::new(db),
            auth,
            secure_cookies,
        }
    }
}

/// Build application router
///
/// Every route sits behind the session gate; the gate itself lets the login
/// page, the login endpoint, static assets and /health through.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    Router::new()
        .route(
            "/api/instruments",
            get(api::list_instruments).post(api::upsert_instrument),
        )
        .route("/api/notes", get(api::list_notes).post(api::create_note))
        .route(
            "/api/notes/:id",
            get(api::get_note)
                .put(api::update_note)
                .delete(api::delete_note),
        )
        .route(
            "/api/study",
            get(api::list_study_notes).post(api::create_study_note),
        )
        .route(
            "/api/study/:id",
            get(api::get_study_note)
                .put(api::update_study_note)
                .delete(api::delete_study_note),
        )
        .route("/api/auth", post(api::login).delete(api::logout))
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::session_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
