//! Versioned data migrations
//!
//! Column additions are handled by schema sync; migrations here transform
//! data. Each migration is idempotent and recorded in `schema_version`.
//!
//! Never modify an existing migration. Add a new one and bump
//! [`CURRENT_SCHEMA_VERSION`].

use crate::db::schema_sync::SchemaIntrospector;
use crate::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Latest applied version, 0 for a database that has never been migrated
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    if !SchemaIntrospector::table_exists(pool, "schema_version").await? {
        return Ok(0);
    }

    let version: Option<i32> = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("Migration v1 completed");
    }

    if current_version < 2 {
        migrate_v2(pool).await?;
        set_schema_version(pool, 2).await?;
        info!("Migration v2 completed");
    }

    Ok(())
}

/// Migration v1: split observation values
///
/// Early journals stored one `value_text` per note. Schema sync has already
/// added `actual_value` and `expected_value`; copy the legacy value into
/// `actual_value` and give `expected_value` an empty string where unset.
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    if SchemaIntrospector::column_exists(pool, "notes", "value_text").await? {
        let result =
            sqlx::query("UPDATE notes SET actual_value = COALESCE(actual_value, value_text)")
                .execute(pool)
                .await?;
        info!(
            "  Backfilled actual_value from value_text ({} rows)",
            result.rows_affected()
        );
    }

    sqlx::query("UPDATE notes SET expected_value = COALESCE(expected_value, '')")
        .execute(pool)
        .await?;

    Ok(())
}

/// Migration v2: drop the legacy `value_text` column
///
/// Nothing writes it any more, so a `NOT NULL` declaration on it would fail
/// every new insert. Its data was copied into `actual_value` by v1.
async fn migrate_v2(pool: &SqlitePool) -> Result<()> {
    if !SchemaIntrospector::column_exists(pool, "notes", "value_text").await? {
        return Ok(());
    }

    sqlx::query("ALTER TABLE notes DROP COLUMN value_text")
        .execute(pool)
        .await?;
    info!("  Dropped legacy notes.value_text");

    Ok(())
}
