use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{AnnouncementRecord, EntryKind, Partition},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    school: String,
    class_section: String,
    keyword_phrase: String,
    info: String,
    url: Option<String>,
    kind: String,
    entry_date: String,
    action_date: Option<String>,
    author_id: Option<String>,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: AnnouncementRow) -> Result<AnnouncementRecord> {
        let entry_date = parse_date(&row.entry_date).ok_or_else(|| {
            AppError::Database(format!("Invalid entry date: {}", row.entry_date))
        })?;

        Ok(AnnouncementRecord {
            record_id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            keyword_phrase: row.keyword_phrase,
            info: row.info,
            url: row.url.filter(|u| !u.trim().is_empty()),
            kind: EntryKind::from_str(&row.kind)
                .ok_or_else(|| AppError::Database(format!("Invalid entry kind: {}", row.kind)))?,
            entry_date,
            school: row.school,
            class_section: row.class_section,
            // A malformed calendar date just means "not a calendar item".
            action_date: row.action_date.as_deref().and_then(parse_date),
            author_id: row
                .author_id
                .map(|id| Uuid::parse_str(&id))
                .transpose()
                .map_err(|e| AppError::Database(e.to_string()))?,
        })
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn fetch_partition(&self, partition: &Partition) -> Result<Vec<AnnouncementRecord>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, school, class_section, keyword_phrase, info, url, kind,
                   entry_date, action_date, author_id
            FROM announcements
            WHERE school = ? AND class_section = ? AND TRIM(keyword_phrase) != ''
            ORDER BY entry_date DESC
            "#
        )
        .bind(&partition.school)
        .bind(&partition.class_section)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id.clone();
            match Self::row_to_record(row) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping announcement {} in {}: {}", id, partition, e),
            }
        }

        Ok(records)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AnnouncementRecord>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, school, class_section, keyword_phrase, info, url, kind,
                   entry_date, action_date, author_id
            FROM announcements
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            // Same rows `fetch_partition` skips; the stored data, not the server, is at fault.
            Some(r) => Self::row_to_record(r)
                .map(Some)
                .map_err(|e| AppError::Validation(format!("Stored announcement {} is unreadable: {}", id, e))),
            None => Ok(None)
        }
    }

    async fn find_owner(&self, id: Uuid) -> Result<Option<(Partition, Option<Uuid>)>> {
        let row = sqlx::query_as::<_, (String, String, Option<String>)>(
            "SELECT school, class_section, author_id FROM announcements WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let Some((school, class_section, author_id)) = row else {
            return Ok(None);
        };

        let author_id = author_id
            .map(|id| Uuid::parse_str(&id))
            .transpose()
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Some((Partition { school, class_section }, author_id)))
    }

    async fn append(&self, record: AnnouncementRecord) -> Result<AnnouncementRecord> {
        let id_str = record.record_id.to_string();
        let author_str = record.author_id.map(|id| id.to_string());
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, school, class_section, keyword_phrase, info, url, kind,
                entry_date, action_date, author_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&record.school)
        .bind(&record.class_section)
        .bind(&record.keyword_phrase)
        .bind(&record.info)
        .bind(&record.url)
        .bind(record.kind.as_str())
        .bind(format_date(record.entry_date))
        .bind(record.action_date.map(format_date))
        .bind(author_str)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(record.record_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn update(&self, id: Uuid, record: AnnouncementRecord) -> Result<AnnouncementRecord> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE announcements
            SET school = ?, class_section = ?, keyword_phrase = ?, info = ?,
                url = ?, kind = ?, entry_date = ?, action_date = ?,
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&record.school)
        .bind(&record.class_section)
        .bind(&record.keyword_phrase)
        .bind(&record.info)
        .bind(&record.url)
        .bind(record.kind.as_str())
        .bind(format_date(record.entry_date))
        .bind(record.action_date.map(format_date))
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Announcement not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated announcement".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Announcement not found".to_string()));
        }

        Ok(())
    }

    async fn list_partitions(&self) -> Result<Vec<Partition>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT DISTINCT school, class_section
            FROM announcements
            ORDER BY school, class_section
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(school, class_section)| Partition { school, class_section })
            .collect())
    }

    async fn list_schools(&self) -> Result<Vec<String>> {
        let schools = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT school FROM announcements ORDER BY school"
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(schools)
    }
}
