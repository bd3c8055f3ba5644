//! Database initialization
//!
//! Startup sequence, run once per process:
//! 1. Open (or create) the SQLite file with foreign keys, WAL and busy timeout
//!    applied to every pooled connection
//! 2. CREATE TABLE / INDEX IF NOT EXISTS
//! 3. Automatic schema sync (add missing columns to legacy tables)
//! 4. Versioned migrations (data backfills)

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Lazily-initialized, process-wide database handle
///
/// The pool is created and the schema bootstrapped on first access.
/// Concurrent first requests await the same in-flight initialization; if it
/// fails, the next access tries again.
#[derive(Debug)]
pub struct JournalDb {
    db_path: PathBuf,
    pool: OnceCell<SqlitePool>,
}

impl JournalDb {
    /// Create a handle; nothing is opened until [`JournalDb::pool`] is called
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            pool: OnceCell::new(),
        }
    }

    /// Wrap an already-initialized pool
    pub fn from_pool(db_path: impl Into<PathBuf>, pool: SqlitePool) -> Self {
        Self {
            db_path: db_path.into(),
            pool: OnceCell::new_with(Some(pool)),
        }
    }

    /// Get the pool, initializing the database on first call
    pub async fn pool(&self) -> Result<&SqlitePool> {
        self.pool
            .get_or_try_init(|| init_database(&self.db_path))
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.initialized()
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

/// Open the database and bring its schema up to date
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema_version_table(&pool).await?;
    create_instruments_table(&pool).await?;
    create_notes_table(&pool).await?;
    create_study_notes_table(&pool).await?;

    // Legacy deployments: add columns introduced after their tables were created
    crate::db::table_schemas::sync_all_table_schemas(&pool).await?;

    crate::db::migrations::run_migrations(&pool).await?;

    Ok(pool)
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_instruments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS instruments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_notes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            instrument_id INTEGER NOT NULL,
            data_point TEXT NOT NULL,
            actual_value TEXT NOT NULL,
            expected_value TEXT NOT NULL,
            observed_on TEXT NOT NULL,
            sentiment TEXT NOT NULL CHECK (sentiment IN ('Bullish', 'Bearish', 'Neutral')),
            commentary TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (instrument_id) REFERENCES instruments(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_notes_instrument_id ON notes(instrument_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_notes_sentiment ON notes(sentiment)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_notes_observed_on ON notes(observed_on DESC)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_study_notes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS study_notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_study_notes_updated ON study_notes(updated_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
