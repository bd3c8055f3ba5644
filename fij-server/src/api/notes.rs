//! Note endpoints
//!
//! Payloads are validated here before any storage access; a rejected payload
//! never touches the database.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use fij_common::db::{notes, Note, NoteFilter, NotePayload};
use tracing::debug;

use super::parse_id;
use crate::{ApiResult, AppState};

/// GET /api/notes?sentiment=&instrumentId=
pub async fn list_notes(
    State(state): State<AppState>,
    filter: Result<Query<NoteFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Note>>> {
    let Query(filter) = filter?;
    let query = filter.parse()?;

    let pool = state.db.pool().await?;
    Ok(Json(notes::list(pool, &query).await?))
}

/// GET /api/notes/:id
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let id = parse_id(&id)?;

    let pool = state.db.pool().await?;
    Ok(Json(notes::get(pool, id).await?))
}

/// POST /api/notes
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<NotePayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let Json(payload) = payload?;
    let fields = payload.validate()?;

    let pool = state.db.pool().await?;
    let note = notes::create(pool, &fields).await?;
    debug!("Created note {} for {}", note.id, note.instrument_name);

    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/notes/:id
///
/// Replaces every field, including the instrument (resolved by name).
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NotePayload>, JsonRejection>,
) -> ApiResult<Json<Note>> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let fields = payload.validate()?;

    let pool = state.db.pool().await?;
    Ok(Json(notes::update(pool, id, &fields).await?))
}

/// DELETE /api/notes/:id
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;

    let pool = state.db.pool().await?;
    notes::delete(pool, id).await?;
    debug!("Deleted note {}", id);

    Ok(StatusCode::NO_CONTENT)
}
