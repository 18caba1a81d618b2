//! Application state.

use std::sync::Arc;

use tubely_db::{SqliteVideoStore, VideoStore};
use tubely_storage::{BlobStore, S3Client};

use crate::auth::JwtKeys;
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub auth: Arc<JwtKeys>,
    pub videos: Arc<dyn VideoStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    /// Create application state backed by SQLite and S3.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let videos = SqliteVideoStore::connect(&config.db_path).await?;
        let blobs = S3Client::from_env().await?;

        Ok(Self::from_parts(config, Arc::new(videos), Arc::new(blobs)))
    }

    /// Assemble state from already constructed collaborators.
    pub fn from_parts(
        config: ApiConfig,
        videos: Arc<dyn VideoStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let auth = JwtKeys::new(&config.jwt_secret);
        Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            videos,
            blobs,
        }
    }
}
