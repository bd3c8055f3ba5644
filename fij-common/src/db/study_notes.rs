//! Study note queries

use crate::db::models::{StudyNote, StudyNoteFields};
use crate::{Error, Result};
use sqlx::SqlitePool;

fn not_found() -> Error {
    Error::NotFound("Study note not found".to_string())
}

/// All study notes, most recently updated first
pub async fn list(pool: &SqlitePool) -> Result<Vec<StudyNote>> {
    let rows = sqlx::query_as::<_, StudyNote>(
        r#"
        SELECT id, title, content, created_at, updated_at
        FROM study_notes
        ORDER BY updated_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<StudyNote> {
    sqlx::query_as::<_, StudyNote>(
        "SELECT id, title, content, created_at, updated_at FROM study_notes WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

pub async fn create(pool: &SqlitePool, fields: &StudyNoteFields) -> Result<StudyNote> {
    let row = sqlx::query_as::<_, StudyNote>(
        r#"
        INSERT INTO study_notes (title, content)
        VALUES (?, ?)
        RETURNING id, title, content, created_at, updated_at
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.content)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update(pool: &SqlitePool, id: i64, fields: &StudyNoteFields) -> Result<StudyNote> {
    sqlx::query_as::<_, StudyNote>(
        r#"
        UPDATE study_notes
        SET title = ?, content = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING id, title, content, created_at, updated_at
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.content)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM study_notes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found());
    }

    Ok(())
}
