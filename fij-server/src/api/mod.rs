//! HTTP API handlers

pub mod auth;
pub mod health;
pub mod instruments;
pub mod notes;
pub mod study;
pub mod ui;

pub use auth::{login, logout, session_gate};
pub use health::health_routes;
pub use instruments::{list_instruments, upsert_instrument};
pub use notes::{create_note, delete_note, get_note, list_notes, update_note};
pub use study::{
    create_study_note, delete_study_note, get_study_note, list_study_notes, update_study_note,
};
pub use ui::ui_routes;

use crate::{ApiError, ApiResult};

/// Parse a numeric path id
pub(crate) fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid id: {}", raw)))
}
