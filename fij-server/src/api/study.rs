//! Study note endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use fij_common::db::{study_notes, StudyNote, StudyNotePayload};
use serde_json::{json, Value};

use super::parse_id;
use crate::{ApiResult, AppState};

/// GET /api/study
pub async fn list_study_notes(State(state): State<AppState>) -> ApiResult<Json<Vec<StudyNote>>> {
    let pool = state.db.pool().await?;
    Ok(Json(study_notes::list(pool).await?))
}

/// GET /api/study/:id
pub async fn get_study_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StudyNote>> {
    let id = parse_id(&id)?;

    let pool = state.db.pool().await?;
    Ok(Json(study_notes::get(pool, id).await?))
}

/// POST /api/study
pub async fn create_study_note(
    State(state): State<AppState>,
    payload: Result<Json<StudyNotePayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StudyNote>)> {
    let Json(payload) = payload?;
    let fields = payload.validate()?;

    let pool = state.db.pool().await?;
    let note = study_notes::create(pool, &fields).await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/study/:id
pub async fn update_study_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StudyNotePayload>, JsonRejection>,
) -> ApiResult<Json<StudyNote>> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let fields = payload.validate()?;

    let pool = state.db.pool().await?;
    Ok(Json(study_notes::update(pool, id, &fields).await?))
}

/// DELETE /api/study/:id
pub async fn delete_study_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;

    let pool = state.db.pool().await?;
    study_notes::delete(pool, id).await?;

    Ok(Json(json!({ "deleted": true })))
}
