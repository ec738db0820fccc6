#![allow(dead_code)]

use chrono::NaiveDate;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use uuid::Uuid;

use class_assistant::domain::{AnnouncementRecord, EntryKind};

/// A single-connection in-memory database; every pooled connection to
/// `:memory:` would otherwise get its own empty database.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(school: &str, section: &str, phrase: &str, info: &str, entry_date: NaiveDate) -> AnnouncementRecord {
    AnnouncementRecord {
        record_id: Uuid::new_v4(),
        keyword_phrase: phrase.to_string(),
        info: info.to_string(),
        url: None,
        kind: EntryKind::Text,
        entry_date,
        school: school.to_string(),
        class_section: section.to_string(),
        action_date: None,
        author_id: None,
    }
}
