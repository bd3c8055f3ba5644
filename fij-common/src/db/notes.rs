//! Note queries
//!
//! Notes are always returned joined with their instrument's name. Writes that
//! touch both tables (instrument upsert + note insert/update) run in a single
//! transaction so a failed note write never leaves an orphaned instrument.

use crate::db::instruments;
use crate::db::models::{Note, NoteFields, NoteQuery, Sentiment};
use crate::{Error, Result};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const SELECT_NOTE: &str = r#"
    SELECT
        n.id,
        n.instrument_id,
        i.name AS instrument_name,
        n.data_point,
        COALESCE(n.actual_value, '') AS actual_value,
        COALESCE(n.expected_value, '') AS expected_value,
        n.observed_on,
        n.sentiment,
        n.commentary,
        n.created_at,
        n.updated_at
    FROM notes n
    INNER JOIN instruments i ON i.id = n.instrument_id
"#;

#[derive(sqlx::FromRow)]
struct NoteRow {
    id: i64,
    instrument_id: i64,
    instrument_name: String,
    data_point: String,
    actual_value: String,
    expected_value: String,
    observed_on: String,
    sentiment: String,
    commentary: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<NoteRow> for Note {
    type Error = Error;

    fn try_from(row: NoteRow) -> Result<Self> {
        let sentiment = row.sentiment.parse::<Sentiment>().map_err(|_| {
            Error::Internal(format!(
                "Note {} has unexpected sentiment '{}'",
                row.id, row.sentiment
            ))
        })?;

        Ok(Note {
            id: row.id,
            instrument_id: row.instrument_id,
            instrument_name: row.instrument_name,
            data_point: row.data_point,
            actual_value: row.actual_value,
            expected_value: row.expected_value,
            observed_on: row.observed_on,
            sentiment,
            commentary: row.commentary,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Notes matching the filter, newest observation first
///
/// Same-day notes are ordered by id descending (most recently inserted first).
pub async fn list(pool: &SqlitePool, query: &NoteQuery) -> Result<Vec<Note>> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_NOTE);
    let mut has_where = false;

    if let Some(sentiment) = query.sentiment {
        builder.push(" WHERE n.sentiment = ");
        builder.push_bind(sentiment.as_str());
        has_where = true;
    }

    if let Some(instrument_id) = query.instrument_id {
        builder.push(if has_where { " AND " } else { " WHERE " });
        builder.push("n.instrument_id = ");
        builder.push_bind(instrument_id);
    }

    builder.push(" ORDER BY n.observed_on DESC, n.id DESC");

    let rows = builder
        .build_query_as::<NoteRow>()
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Note::try_from).collect()
}

/// One note by id
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Note> {
    let row = sqlx::query_as::<_, NoteRow>(&format!("{} WHERE n.id = ?", SELECT_NOTE))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound("Note not found".to_string()))?;

    Note::try_from(row)
}

/// Upsert the instrument and insert the note atomically
pub async fn create(pool: &SqlitePool, fields: &NoteFields) -> Result<Note> {
    let mut tx = pool.begin().await?;

    let instrument = instruments::upsert_in(&mut *tx, &fields.instrument_name).await?;

    let id = sqlx::query(
        r#"
        INSERT INTO notes (
            instrument_id, data_point, actual_value, expected_value,
            observed_on, sentiment, commentary, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(instrument.id)
    .bind(&fields.data_point)
    .bind(&fields.actual_value)
    .bind(&fields.expected_value)
    .bind(&fields.observed_on)
    .bind(fields.sentiment.as_str())
    .bind(&fields.commentary)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    tx.commit().await?;

    get(pool, id).await
}

/// Replace a note's fields, re-resolving its instrument by name
///
/// The instrument upsert is rolled back if the note does not exist.
pub async fn update(pool: &SqlitePool, id: i64, fields: &NoteFields) -> Result<Note> {
    let mut tx = pool.begin().await?;

    let instrument = instruments::upsert_in(&mut *tx, &fields.instrument_name).await?;

    let result = sqlx::query(
        r#"
        UPDATE notes
        SET instrument_id = ?,
            data_point = ?,
            actual_value = ?,
            expected_value = ?,
            observed_on = ?,
            sentiment = ?,
            commentary = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(instrument.id)
    .bind(&fields.data_point)
    .bind(&fields.actual_value)
    .bind(&fields.expected_value)
    .bind(&fields.observed_on)
    .bind(fields.sentiment.as_str())
    .bind(&fields.commentary)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(Error::NotFound("Note not found".to_string()));
    }

    tx.commit().await?;

    get(pool, id).await
}

/// Delete one note
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM notes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Note not found".to_string()));
    }

    Ok(())
}
