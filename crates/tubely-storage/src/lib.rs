//! S3 blob storage for uploaded videos.
//!
//! This crate provides:
//! - The `BlobStore` seam the upload handlers write through
//! - An S3 implementation backed by the AWS SDK
//! - Object key generation and public URL construction

pub mod blob;
pub mod client;
pub mod error;
pub mod keys;

pub use blob::BlobStore;
pub use client::{S3Client, S3Config};
pub use error::{StorageError, StorageResult};
pub use keys::{public_object_url, video_object_key, VIDEO_CONTENT_TYPE, VIDEO_KEY_PREFIX};
