//! Expected column lists for the journal tables
//!
//! Adding a column here is enough for existing databases to pick it up on the
//! next start. Columns that are NOT NULL in CREATE TABLE but were added after
//! the first release are declared nullable here: SQLite cannot add them as NOT
//! NULL without a default, and migrations backfill their values.

use crate::db::schema_sync::{ColumnDefinition, SchemaSync, TableSchema};
use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

pub struct InstrumentsTableSchema;

impl TableSchema for InstrumentsTableSchema {
    fn table_name() -> &'static str {
        "instruments"
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", "INTEGER").primary_key(),
            ColumnDefinition::new("name", "TEXT").not_null().unique(),
            ColumnDefinition::new("created_at", "TEXT")
                .not_null()
                .default("CURRENT_TIMESTAMP"),
            ColumnDefinition::new("updated_at", "TEXT")
                .not_null()
                .default("CURRENT_TIMESTAMP"),
        ]
    }
}

pub struct NotesTableSchema;

impl TableSchema for NotesTableSchema {
    fn table_name() -> &'static str {
        "notes"
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", "INTEGER").primary_key(),
            ColumnDefinition::new("instrument_id", "INTEGER").not_null(),
            ColumnDefinition::new("data_point", "TEXT").not_null(),
            // Replaced the single legacy value_text column
            ColumnDefinition::new("actual_value", "TEXT"),
            ColumnDefinition::new("expected_value", "TEXT"),
            ColumnDefinition::new("observed_on", "TEXT").not_null(),
            ColumnDefinition::new("sentiment", "TEXT").not_null(),
            ColumnDefinition::new("commentary", "TEXT").not_null(),
            ColumnDefinition::new("created_at", "TEXT")
                .not_null()
                .default("CURRENT_TIMESTAMP"),
            ColumnDefinition::new("updated_at", "TEXT")
                .not_null()
                .default("CURRENT_TIMESTAMP"),
        ]
    }
}

pub struct StudyNotesTableSchema;

impl TableSchema for StudyNotesTableSchema {
    fn table_name() -> &'static str {
        "study_notes"
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", "INTEGER").primary_key(),
            ColumnDefinition::new("title", "TEXT").not_null(),
            ColumnDefinition::new("content", "TEXT").not_null().default("''"),
            ColumnDefinition::new("created_at", "TEXT")
                .not_null()
                .default("CURRENT_TIMESTAMP"),
            ColumnDefinition::new("updated_at", "TEXT")
                .not_null()
                .default("CURRENT_TIMESTAMP"),
        ]
    }
}

/// Add missing columns to every journal table
pub async fn sync_all_table_schemas(pool: &SqlitePool) -> Result<()> {
    let added = SchemaSync::sync_table::<InstrumentsTableSchema>(pool).await?
        + SchemaSync::sync_table::<NotesTableSchema>(pool).await?
        + SchemaSync::sync_table::<StudyNotesTableSchema>(pool).await?;

    if added > 0 {
        info!("Schema sync added {} column(s)", added);
    }

    Ok(())
}
