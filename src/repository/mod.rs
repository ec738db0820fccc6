use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod announcement_repository;
pub mod teacher_repository;

pub use announcement_repository::SqliteAnnouncementRepository;
pub use teacher_repository::SqliteTeacherRepository;

/// Backing store for announcements.
///
/// Snapshots returned by `fetch_partition` are already cleaned: rows with a
/// blank keyword phrase or an unparseable entry date are left out.
#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn fetch_partition(&self, partition: &Partition) -> Result<Vec<AnnouncementRecord>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AnnouncementRecord>>;
    /// Partition and author of a record, without parsing the rest of the row.
    async fn find_owner(&self, id: Uuid) -> Result<Option<(Partition, Option<Uuid>)>>;
    async fn append(&self, record: AnnouncementRecord) -> Result<AnnouncementRecord>;
    async fn update(&self, id: Uuid, record: AnnouncementRecord) -> Result<AnnouncementRecord>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn list_partitions(&self) -> Result<Vec<Partition>>;
    async fn list_schools(&self) -> Result<Vec<String>>;
}

#[async_trait]
pub trait TeacherRepository: Send + Sync {
    async fn create(&self, teacher: CreateTeacherRequest) -> Result<Teacher>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Teacher>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Teacher>>;
}
