//! Blob store abstraction.

use std::path::Path;

use async_trait::async_trait;

use crate::error::StorageResult;

/// Durable object storage addressed by key.
///
/// The API only needs to put a staged file and to know where the object
/// will be publicly reachable afterwards.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stream the file at `path` into the bucket under `key`.
    async fn put_object(&self, key: &str, path: &Path, content_type: &str) -> StorageResult<()>;

    /// Public URL of the object stored under `key`.
    fn object_url(&self, key: &str) -> String;

    /// Check connectivity to the backing bucket.
    async fn check_connectivity(&self) -> StorageResult<()> {
        Ok(())
    }
}
