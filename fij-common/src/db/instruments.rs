//! Instrument queries
//!
//! Instruments are only ever created through [`upsert`], either directly or
//! as the first step of a note write.

use crate::db::models::Instrument;
use crate::{Error, Result};
use sqlx::{SqliteConnection, SqlitePool};

/// All instruments, ordered by name ascending
pub async fn list(pool: &SqlitePool) -> Result<Vec<Instrument>> {
    let rows = sqlx::query_as::<_, Instrument>(
        "SELECT id, name, created_at, updated_at FROM instruments ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert an instrument, or touch `updated_at` if the name already exists
pub async fn upsert(pool: &SqlitePool, name: &str) -> Result<Instrument> {
    let mut conn = pool.acquire().await?;
    upsert_in(&mut *conn, name).await
}

/// [`upsert`] on an existing connection, so callers can run it inside a
/// transaction
pub async fn upsert_in(conn: &mut SqliteConnection, name: &str) -> Result<Instrument> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Instrument name is required".to_string()));
    }

    let instrument = sqlx::query_as::<_, Instrument>(
        r#"
        INSERT INTO instruments (name, updated_at)
        VALUES (?, CURRENT_TIMESTAMP)
        ON CONFLICT(name) DO UPDATE SET updated_at = CURRENT_TIMESTAMP
        RETURNING id, name, created_at, updated_at
        "#,
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;

    Ok(instrument)
}
