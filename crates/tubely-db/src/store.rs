//! Metadata store abstraction.

use async_trait::async_trait;
use tubely_models::{Video, VideoId};

use crate::error::DbResult;

/// Key/value style access to video records keyed by video ID.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Fetch a record, `None` if it does not exist.
    async fn get_video(&self, id: VideoId) -> DbResult<Option<Video>>;

    /// Overwrite the mutable fields of an existing record.
    ///
    /// Fails with `DbError::NotFound` when the record has disappeared.
    async fn update_video(&self, video: &Video) -> DbResult<()>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> DbResult<()>;
}
