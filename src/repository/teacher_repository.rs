use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    auth::AuthService,
    domain::{CreateTeacherRequest, Teacher},
    error::{AppError, Result},
    repository::TeacherRepository,
};

#[derive(FromRow)]
struct TeacherRow {
    id: String,
    username: String,
    full_name: String,
    created_at: NaiveDateTime,
}

pub struct SqliteTeacherRepository {
    pool: SqlitePool,
}

impl SqliteTeacherRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_teacher(row: TeacherRow) -> Result<Teacher> {
        Ok(Teacher {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            username: row.username,
            full_name: row.full_name,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl TeacherRepository for SqliteTeacherRepository {
    async fn create(&self, teacher: CreateTeacherRequest) -> Result<Teacher> {
        let username = teacher.username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::Validation("Username is required".to_string()));
        }
        if teacher.password.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        if self.find_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict(format!("Username '{}' is taken", username)));
        }

        let id = Uuid::new_v4();
        let password_hash = AuthService::hash_password(&teacher.password).await?;
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO teachers (id, username, full_name, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&username)
        .bind(teacher.full_name.trim())
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created teacher".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Teacher>> {
        let row = sqlx::query_as::<_, TeacherRow>(
            "SELECT id, username, full_name, created_at FROM teachers WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_teacher).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Teacher>> {
        let row = sqlx::query_as::<_, TeacherRow>(
            "SELECT id, username, full_name, created_at FROM teachers WHERE username = ?"
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_teacher).transpose()
    }
}
