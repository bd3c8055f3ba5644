//! Instrument endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use fij_common::db::{instruments, Instrument, InstrumentPayload};

use crate::{ApiResult, AppState};

/// GET /api/instruments
pub async fn list_instruments(State(state): State<AppState>) -> ApiResult<Json<Vec<Instrument>>> {
    let pool = state.db.pool().await?;
    Ok(Json(instruments::list(pool).await?))
}

/// POST /api/instruments
///
/// Creates the instrument, or touches it if the name already exists.
pub async fn upsert_instrument(
    State(state): State<AppState>,
    payload: Result<Json<InstrumentPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Instrument>)> {
    let Json(payload) = payload?;
    let name = payload.name.unwrap_or_default();

    let pool = state.db.pool().await?;
    let instrument = instruments::upsert(pool, &name).await?;

    Ok((StatusCode::CREATED, Json(instrument)))
}
