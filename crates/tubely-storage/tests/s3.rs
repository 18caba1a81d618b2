//! S3 integration tests.
//!
//! These require a reachable bucket:
//!   cargo test -p tubely-storage --test s3 -- --ignored

use std::io::Write;

use tempfile::NamedTempFile;
use tubely_storage::{video_object_key, BlobStore, S3Client, S3Config, VIDEO_CONTENT_TYPE};

/// Test S3 connection and bucket access.
#[tokio::test]
#[ignore = "requires S3 credentials"]
async fn test_s3_connection() {
    dotenvy::dotenv().ok();

    let client = S3Client::from_env()
        .await
        .expect("Failed to create S3 client");

    client
        .check_connectivity()
        .await
        .expect("Failed to check S3 connectivity");
}

/// Test putting a staged file under a generated video key.
#[tokio::test]
#[ignore = "requires S3 credentials"]
async fn test_put_video_object() {
    dotenvy::dotenv().ok();

    let config = S3Config::from_env().expect("Failed to read S3 config");
    let bucket = config.bucket.clone();
    let client = S3Client::new(config)
        .await
        .expect("Failed to create S3 client");

    let mut staged = NamedTempFile::new().expect("Failed to create temp file");
    staged
        .write_all(b"integration test content")
        .expect("Failed to write temp file");

    let key = video_object_key();
    client
        .put_object(&key, staged.path(), VIDEO_CONTENT_TYPE)
        .await
        .expect("Failed to upload object");

    let url = client.object_url(&key);
    assert!(url.starts_with(&format!("https://{}.s3.", bucket)));
    assert!(url.ends_with(&key));
}
