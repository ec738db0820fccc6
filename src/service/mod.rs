pub mod announcement_service;
pub mod cache;

use std::sync::Arc;
use std::time::Duration;
use sqlx::SqlitePool;
use crate::auth::AuthService;
use crate::config::Settings;
use crate::repository::*;
use announcement_service::AnnouncementService;

pub use announcement_service::SearchOutcome;
pub use cache::{PartitionCache, PartitionSnapshot};

pub struct ServiceContext {
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub teacher_repo: Arc<dyn TeacherRepository>,
    pub announcement_service: Arc<AnnouncementService>,
    pub auth_service: Arc<AuthService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        announcement_repo: Arc<dyn AnnouncementRepository>,
        teacher_repo: Arc<dyn TeacherRepository>,
        auth_service: Arc<AuthService>,
        settings: &Settings,
        db_pool: SqlitePool,
    ) -> Self {
        let announcement_service = Arc::new(AnnouncementService::with_cache(
            announcement_repo.clone(),
            PartitionCache::with_capacity(
                Duration::from_secs(settings.cache.ttl_seconds),
                settings.cache.max_entries,
            ),
            settings.windows.clone(),
        ));

        Self {
            announcement_repo,
            teacher_repo,
            announcement_service,
            auth_service,
            db_pool,
        }
    }

    /// Wires the SQLite repositories and services over one pool.
    pub fn from_pool(db_pool: SqlitePool, settings: &Settings) -> Self {
        let announcement_repo = Arc::new(SqliteAnnouncementRepository::new(db_pool.clone()));
        let teacher_repo = Arc::new(SqliteTeacherRepository::new(db_pool.clone()));
        let auth_service = Arc::new(AuthService::new(
            db_pool.clone(),
            settings.auth.session_duration_hours,
        ));

        Self::new(announcement_repo, teacher_repo, auth_service, settings, db_pool)
    }
}
