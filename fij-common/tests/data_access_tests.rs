//! Data access tests for instruments, notes and study notes

use fij_common::db::models::{NoteFields, NoteQuery, Sentiment, StudyNoteFields};
use fij_common::db::{init_database, instruments, notes, study_notes};
use fij_common::Error;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn setup() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pool = init_database(&dir.path().join("journal.db"))
        .await
        .expect("init database");
    (dir, pool)
}

fn note(instrument: &str, observed_on: &str, sentiment: Sentiment) -> NoteFields {
    NoteFields {
        instrument_name: instrument.to_string(),
        data_point: "NFP".to_string(),
        actual_value: "275k".to_string(),
        expected_value: "200k".to_string(),
        observed_on: observed_on.to_string(),
        sentiment,
        commentary: "Strong labour market".to_string(),
    }
}

async fn instrument_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM instruments")
        .fetch_one(pool)
        .await
        .unwrap()
}

// =============================================================================
// Instruments
// =============================================================================

#[tokio::test]
async fn test_upsert_is_idempotent() {
    let (_dir, pool) = setup().await;

    let first = instruments::upsert(&pool, "UST 10Y").await.unwrap();
    let second = instruments::upsert(&pool, "  UST 10Y  ").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "UST 10Y");
    assert_eq!(instrument_count(&pool).await, 1);
    assert!(second.updated_at >= first.updated_at);
}

#[tokio::test]
async fn test_upsert_rejects_blank_name() {
    let (_dir, pool) = setup().await;

    let result = instruments::upsert(&pool, "   ").await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert_eq!(instrument_count(&pool).await, 0);
}

#[tokio::test]
async fn test_instruments_listed_by_name() {
    let (_dir, pool) = setup().await;

    for name in ["UST 30Y", "Bund 10Y", "JGB 10Y"] {
        instruments::upsert(&pool, name).await.unwrap();
    }

    let names: Vec<String> = instruments::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["Bund 10Y", "JGB 10Y", "UST 30Y"]);
}

// =============================================================================
// Notes
// =============================================================================

#[tokio::test]
async fn test_create_note_joins_instrument() {
    let (_dir, pool) = setup().await;

    let created = notes::create(&pool, &note("UST 2Y", "2024-03-08", Sentiment::Bearish))
        .await
        .unwrap();

    assert_eq!(created.instrument_name, "UST 2Y");
    assert_eq!(created.sentiment, Sentiment::Bearish);

    let filtered = notes::list(
        &pool,
        &NoteQuery {
            sentiment: None,
            instrument_id: Some(created.instrument_id),
        },
    )
    .await
    .unwrap();
    assert!(filtered.iter().any(|n| n.id == created.id));
}

#[tokio::test]
async fn test_same_instrument_shared_between_notes() {
    let (_dir, pool) = setup().await;

    let a = notes::create(&pool, &note("Bund 10Y", "2024-01-02", Sentiment::Neutral))
        .await
        .unwrap();
    let b = notes::create(&pool, &note("Bund 10Y", "2024-01-03", Sentiment::Bullish))
        .await
        .unwrap();

    assert_eq!(a.instrument_id, b.instrument_id);
    assert_eq!(instrument_count(&pool).await, 1);

    let for_instrument = notes::list(
        &pool,
        &NoteQuery {
            sentiment: None,
            instrument_id: Some(a.instrument_id),
        },
    )
    .await
    .unwrap();
    assert_eq!(for_instrument.len(), 2);
}

#[tokio::test]
async fn test_list_orders_by_date_then_id() {
    let (_dir, pool) = setup().await;

    let first = notes::create(&pool, &note("UST 5Y", "2024-01-01", Sentiment::Neutral))
        .await
        .unwrap();
    let second = notes::create(&pool, &note("UST 5Y", "2024-01-01", Sentiment::Neutral))
        .await
        .unwrap();
    let newer = notes::create(&pool, &note("UST 5Y", "2024-02-01", Sentiment::Neutral))
        .await
        .unwrap();

    let ids: Vec<i64> = notes::list(&pool, &NoteQuery::default())
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec![newer.id, second.id, first.id]);
}

#[tokio::test]
async fn test_list_filters_combine() {
    let (_dir, pool) = setup().await;

    let bund_bear = notes::create(&pool, &note("Bund 10Y", "2024-01-01", Sentiment::Bearish))
        .await
        .unwrap();
    notes::create(&pool, &note("Bund 10Y", "2024-01-02", Sentiment::Bullish))
        .await
        .unwrap();
    notes::create(&pool, &note("UST 10Y", "2024-01-03", Sentiment::Bearish))
        .await
        .unwrap();

    let bearish = notes::list(
        &pool,
        &NoteQuery {
            sentiment: Some(Sentiment::Bearish),
            instrument_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(bearish.len(), 2);
    assert!(bearish.iter().all(|n| n.sentiment == Sentiment::Bearish));

    let both = notes::list(
        &pool,
        &NoteQuery {
            sentiment: Some(Sentiment::Bearish),
            instrument_id: Some(bund_bear.instrument_id),
        },
    )
    .await
    .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].id, bund_bear.id);
}

#[tokio::test]
async fn test_update_note_reassigns_instrument() {
    let (_dir, pool) = setup().await;

    let created = notes::create(&pool, &note("UST 10Y", "2024-01-01", Sentiment::Neutral))
        .await
        .unwrap();

    let mut fields = note("Gilt 10Y", "2024-01-05", Sentiment::Bullish);
    fields.commentary = "Revised view".to_string();
    let updated = notes::update(&pool, created.id, &fields).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.instrument_name, "Gilt 10Y");
    assert_ne!(updated.instrument_id, created.instrument_id);
    assert_eq!(updated.sentiment, Sentiment::Bullish);
    assert_eq!(updated.commentary, "Revised view");
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_update_missing_note_leaves_no_instrument() {
    let (_dir, pool) = setup().await;

    let result = notes::update(&pool, 42, &note("Orphan 1Y", "2024-01-01", Sentiment::Neutral)).await;

    assert!(matches!(result, Err(Error::NotFound(_))));
    assert_eq!(instrument_count(&pool).await, 0, "Upsert should be rolled back");
}

#[tokio::test]
async fn test_failed_note_insert_leaves_no_instrument() {
    let (_dir, pool) = setup().await;

    sqlx::query(
        "CREATE TRIGGER reject_note_insert BEFORE INSERT ON notes
         BEGIN SELECT RAISE(ABORT, 'notes are read-only'); END",
    )
    .execute(&pool)
    .await
    .unwrap();

    let result = notes::create(&pool, &note("Orphan 2Y", "2024-01-01", Sentiment::Bullish)).await;

    assert!(matches!(result, Err(Error::Database(_))));
    assert_eq!(instrument_count(&pool).await, 0, "Upsert should be rolled back");
}

#[tokio::test]
async fn test_delete_note() {
    let (_dir, pool) = setup().await;

    let created = notes::create(&pool, &note("UST 10Y", "2024-01-01", Sentiment::Neutral))
        .await
        .unwrap();

    notes::delete(&pool, created.id).await.unwrap();

    let remaining = notes::list(&pool, &NoteQuery::default()).await.unwrap();
    assert!(remaining.iter().all(|n| n.id != created.id));

    let again = notes::delete(&pool, created.id).await;
    assert!(matches!(again, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_get_missing_note() {
    let (_dir, pool) = setup().await;
    assert!(matches!(notes::get(&pool, 1).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_deleting_instrument_cascades_to_notes() {
    let (_dir, pool) = setup().await;

    let created = notes::create(&pool, &note("Schatz", "2024-01-01", Sentiment::Neutral))
        .await
        .unwrap();

    sqlx::query("DELETE FROM instruments WHERE id = ?")
        .bind(created.instrument_id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(notes::list(&pool, &NoteQuery::default()).await.unwrap().is_empty());
}

// =============================================================================
// Study notes
// =============================================================================

#[tokio::test]
async fn test_study_note_round_trip() {
    let (_dir, pool) = setup().await;

    let created = study_notes::create(
        &pool,
        &StudyNoteFields {
            title: "CPI".to_string(),
            content: String::new(),
        },
    )
    .await
    .unwrap();
    assert_eq!(created.content, "");

    study_notes::update(
        &pool,
        created.id,
        &StudyNoteFields {
            title: "CPI".to_string(),
            content: "notes here".to_string(),
        },
    )
    .await
    .unwrap();

    let fetched = study_notes::get(&pool, created.id).await.unwrap();
    assert_eq!(fetched.content, "notes here");
    assert!(fetched.updated_at >= fetched.created_at);
}

#[tokio::test]
async fn test_study_notes_listed_by_update_time() {
    let (_dir, pool) = setup().await;

    let older = study_notes::create(
        &pool,
        &StudyNoteFields {
            title: "Duration".to_string(),
            content: String::new(),
        },
    )
    .await
    .unwrap();
    sqlx::query("UPDATE study_notes SET updated_at = '2000-01-01 00:00:00' WHERE id = ?")
        .bind(older.id)
        .execute(&pool)
        .await
        .unwrap();

    let newer = study_notes::create(
        &pool,
        &StudyNoteFields {
            title: "Convexity".to_string(),
            content: String::new(),
        },
    )
    .await
    .unwrap();

    let ids: Vec<i64> = study_notes::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[tokio::test]
async fn test_study_note_missing_ids() {
    let (_dir, pool) = setup().await;

    let fields = StudyNoteFields {
        title: "Carry".to_string(),
        content: String::new(),
    };

    assert!(matches!(study_notes::update(&pool, 9, &fields).await, Err(Error::NotFound(_))));
    assert!(matches!(study_notes::delete(&pool, 9).await, Err(Error::NotFound(_))));
    assert!(matches!(study_notes::get(&pool, 9).await, Err(Error::NotFound(_))));
}
