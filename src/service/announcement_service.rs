use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::WindowConfig,
    domain::{
        announcement::clean_url, AnnouncementRecord, NewAnnouncement, Partition, Teacher,
        UpdateAnnouncementRequest,
    },
    error::{AppError, Result},
    repository::AnnouncementRepository,
    search::{recent_window_within, upcoming_window_within, SearchHit, UpcomingAction},
    service::cache::{PartitionCache, PartitionSnapshot},
};

/// Answer to a free-text query within one partition.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub hits: Vec<SearchHit>,
    /// Keyword phrases that exist in the partition, for "did you mean" hints.
    pub available_keywords: Vec<String>,
}

pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
    cache: PartitionCache,
    windows: WindowConfig,
}

impl AnnouncementService {
    pub fn new(
        repo: Arc<dyn AnnouncementRepository>,
        cache_ttl: Duration,
        windows: WindowConfig,
    ) -> Self {
        Self::with_cache(repo, PartitionCache::new(cache_ttl), windows)
    }

    pub fn with_cache(
        repo: Arc<dyn AnnouncementRepository>,
        cache: PartitionCache,
        windows: WindowConfig,
    ) -> Self {
        Self { repo, cache, windows }
    }

    pub fn cache(&self) -> &PartitionCache {
        &self.cache
    }

    /// Current snapshot of a partition, fetched and indexed on a cache miss.
    ///
    /// Partitions with no records are not cached, so lookups of unknown
    /// classes cannot fill the cache.
    pub async fn snapshot(&self, partition: &Partition) -> Result<Arc<PartitionSnapshot>> {
        partition.validate()?;

        if let Some(snapshot) = self.cache.get(partition).await {
            return Ok(snapshot);
        }

        let epoch = self.cache.epoch().await;
        let records = self.repo.fetch_partition(partition).await?;
        let snapshot = PartitionSnapshot::new(partition.clone(), records);

        if snapshot.records.is_empty() {
            return Ok(Arc::new(snapshot));
        }

        let incomplete = snapshot.records.iter().filter(|r| r.is_incomplete_link()).count();
        if incomplete > 0 {
            tracing::warn!("{} has {} link entries without a URL", partition, incomplete);
        }
        tracing::debug!(
            "Indexed {}: {} records, {} phrases, {} tags",
            partition,
            snapshot.records.len(),
            snapshot.index.phrase_count(),
            snapshot.index.tag_count()
        );

        Ok(self.cache.insert(snapshot, epoch).await)
    }

    pub async fn search(&self, partition: &Partition, query: &str) -> Result<SearchOutcome> {
        let snapshot = self.snapshot(partition).await?;
        let hits = snapshot.index.search(query);

        tracing::debug!("Query {:?} in {} matched {} entries", query, partition, hits.len());

        Ok(SearchOutcome {
            query: query.to_string(),
            hits,
            available_keywords: snapshot.index.phrases().map(str::to_string).collect(),
        })
    }

    pub async fn keywords(&self, partition: &Partition) -> Result<Vec<String>> {
        let snapshot = self.snapshot(partition).await?;
        Ok(snapshot.index.phrases().map(str::to_string).collect())
    }

    pub async fn recent(&self, partition: &Partition, today: NaiveDate) -> Result<Vec<AnnouncementRecord>> {
        let snapshot = self.snapshot(partition).await?;
        Ok(recent_window_within(&snapshot.records, today, self.windows.recent_days))
    }

    pub async fn upcoming(&self, partition: &Partition, today: NaiveDate) -> Result<Vec<UpcomingAction>> {
        let snapshot = self.snapshot(partition).await?;
        Ok(upcoming_window_within(&snapshot.records, today, self.windows.upcoming_days))
    }

    /// The author's own announcements in a partition, newest first.
    pub async fn list_own(&self, author: &Teacher, partition: &Partition) -> Result<Vec<AnnouncementRecord>> {
        let snapshot = self.snapshot(partition).await?;
        let mut own: Vec<AnnouncementRecord> = snapshot
            .records
            .iter()
            .filter(|r| r.author_id == Some(author.id))
            .cloned()
            .collect();
        own.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
        Ok(own)
    }

    pub async fn submit(&self, author: &Teacher, new: NewAnnouncement) -> Result<AnnouncementRecord> {
        new.validate()?;

        let partition = Partition::new(&new.school, &new.class_section);
        partition.validate()?;

        let record = AnnouncementRecord {
            record_id: Uuid::new_v4(),
            keyword_phrase: new.keyword_phrase.trim().to_string(),
            info: new.info.trim().to_string(),
            url: clean_url(new.url),
            kind: new.kind,
            entry_date: new.entry_date.unwrap_or_else(|| Local::now().date_naive()),
            school: partition.school.clone(),
            class_section: partition.class_section.clone(),
            action_date: new.action_date,
            author_id: Some(author.id),
        };

        let created = self.repo.append(record).await?;
        self.cache.invalidate(&partition).await;

        tracing::info!(
            "{} posted {:?} to {}",
            author.username,
            created.keyword_phrase,
            partition
        );

        Ok(created)
    }

    pub async fn edit(
        &self,
        author: &Teacher,
        id: Uuid,
        changes: UpdateAnnouncementRequest,
    ) -> Result<AnnouncementRecord> {
        let existing = self.owned_record(author, id).await?;
        let old_partition = existing.partition();

        let updated = changes.apply(existing)?;
        let new_partition = updated.partition();

        let saved = self.repo.update(id, updated).await?;

        self.cache.invalidate(&old_partition).await;
        if new_partition != old_partition {
            self.cache.invalidate(&new_partition).await;
        }

        tracing::info!("{} edited announcement {}", author.username, id);

        Ok(saved)
    }

    /// Deletes one of the author's records. Only the owner and partition are
    /// read, so rows whose stored dates no longer parse can still be removed.
    pub async fn remove(&self, author: &Teacher, id: Uuid) -> Result<()> {
        let (partition, author_id) = self.repo
            .find_owner(id)
            .await?
            .ok_or(AppError::NotFound("Announcement not found".to_string()))?;

        if author_id != Some(author.id) {
            return Err(AppError::Forbidden);
        }

        self.repo.delete(id).await?;
        self.cache.invalidate(&partition).await;

        tracing::info!("{} deleted announcement {}", author.username, id);

        Ok(())
    }

    pub async fn list_partitions(&self) -> Result<Vec<Partition>> {
        self.repo.list_partitions().await
    }

    pub async fn list_schools(&self) -> Result<Vec<String>> {
        self.repo.list_schools().await
    }

    // Only the author may touch a record; records without an author are read-only.
    async fn owned_record(&self, author: &Teacher, id: Uuid) -> Result<AnnouncementRecord> {
        let record = self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Announcement not found".to_string()))?;

        if record.author_id != Some(author.id) {
            return Err(AppError::Forbidden);
        }

        Ok(record)
    }
}
