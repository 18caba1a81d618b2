//! SQLite-backed video repository.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};
use tubely_models::{UserId, Video, VideoId};

use crate::error::{DbError, DbResult};
use crate::store::VideoStore;

const CREATE_VIDEOS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS videos (
        id TEXT PRIMARY KEY,
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        thumbnail_url TEXT,
        video_url TEXT,
        user_id TEXT NOT NULL
    )
"#;

#[derive(sqlx::FromRow)]
struct VideoRow {
    id: String,
    user_id: String,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    thumbnail_url: Option<String>,
    video_url: Option<String>,
}

impl TryFrom<VideoRow> for Video {
    type Error = DbError;

    fn try_from(row: VideoRow) -> Result<Self, Self::Error> {
        let id = VideoId::from_str(&row.id).map_err(|e| DbError::corrupt(&row.id, e.to_string()))?;
        let user_id =
            UserId::from_str(&row.user_id).map_err(|e| DbError::corrupt(&row.id, e.to_string()))?;

        Ok(Video {
            id,
            user_id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            thumbnail_url: row.thumbnail_url,
            video_url: row.video_url,
        })
    }
}

/// Repository for video records stored in SQLite.
#[derive(Clone)]
pub struct SqliteVideoStore {
    pool: SqlitePool,
}

impl SqliteVideoStore {
    /// Open (creating if missing) the database file at `path` and run migrations.
    pub async fn connect(path: impl AsRef<Path>) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!("Opened metadata store at {}", path.as_ref().display());
        Ok(store)
    }

    /// Private in-memory database, mostly for tests and local tooling.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // A single long-lived connection keeps the in-memory database alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create the schema if it does not exist yet.
    pub async fn migrate(&self) -> DbResult<()> {
        sqlx::query(CREATE_VIDEOS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert a new record. Only tests and local tooling create records here.
    pub async fn create_video(&self, video: &Video) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO videos (
                id, created_at, updated_at, title, description,
                thumbnail_url, video_url, user_id
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(video.id.to_string())
        .bind(video.created_at)
        .bind(video.updated_at)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.user_id.to_string())
        .execute(&self.pool)
        .await?;

        info!("Created video record: {}", video.id);
        Ok(())
    }
}

#[async_trait]
impl VideoStore for SqliteVideoStore {
    async fn get_video(&self, id: VideoId) -> DbResult<Option<Video>> {
        let row = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT id, user_id, title, description, created_at, updated_at,
                   thumbnail_url, video_url
            FROM videos
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Video::try_from).transpose()
    }

    async fn update_video(&self, video: &Video) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = ?, description = ?, thumbnail_url = ?, video_url = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.updated_at)
        .bind(video.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(video.id.to_string()));
        }

        debug!("Updated video record: {}", video.id);
        Ok(())
    }

    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
