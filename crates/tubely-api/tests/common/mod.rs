//! Shared fixtures for API integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use tubely_api::{create_router, ApiConfig, AppState, JwtKeys};
use tubely_db::{DbError, DbResult, VideoStore};
use tubely_models::{UserId, Video, VideoId};
use tubely_storage::{public_object_url, BlobStore, StorageError, StorageResult};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const BUCKET: &str = "tubely-test";
pub const REGION: &str = "us-east-2";
const BOUNDARY: &str = "tubely-test-boundary";

/// Record store kept in a map, counting every call.
#[derive(Default)]
pub struct InMemoryVideoStore {
    videos: Mutex<HashMap<VideoId, Video>>,
    pub gets: AtomicUsize,
    pub updates: AtomicUsize,
}

impl InMemoryVideoStore {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn snapshot(&self, id: VideoId) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst) + self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoStore for InMemoryVideoStore {
    async fn get_video(&self, id: VideoId) -> DbResult<Option<Video>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot(id))
    }

    async fn update_video(&self, video: &Video) -> DbResult<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut videos = self.videos.lock().unwrap();
        match videos.get_mut(&video.id) {
            Some(stored) => {
                *stored = video.clone();
                Ok(())
            }
            None => Err(DbError::not_found(video.id.to_string())),
        }
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}

/// One successful `put_object` call.
#[derive(Debug, Clone)]
pub struct PutRecord {
    pub key: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Blob store that keeps a copy of everything put into it.
#[derive(Default)]
pub struct RecordingBlobStore {
    puts: Mutex<Vec<PutRecord>>,
    fail: bool,
}

impl RecordingBlobStore {
    pub fn failing() -> Self {
        Self {
            puts: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn puts(&self) -> Vec<PutRecord> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    async fn put_object(&self, key: &str, path: &Path, content_type: &str) -> StorageResult<()> {
        if self.fail {
            return Err(StorageError::upload_failed("bucket unavailable"));
        }
        let bytes = tokio::fs::read(path).await?;
        self.puts.lock().unwrap().push(PutRecord {
            key: key.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        public_object_url(BUCKET, REGION, key)
    }
}

/// Router wired to in-memory collaborators and scratch directories.
pub struct TestApp {
    pub router: Router,
    pub videos: Arc<InMemoryVideoStore>,
    pub blobs: Arc<RecordingBlobStore>,
    pub assets: TempDir,
    pub temp: TempDir,
    keys: JwtKeys,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_blobs(RecordingBlobStore::default())
    }

    pub fn with_blobs(blobs: RecordingBlobStore) -> Self {
        let videos = Arc::new(InMemoryVideoStore::default());
        let blobs = Arc::new(blobs);
        let assets = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();

        let config = ApiConfig::local(
            JWT_SECRET,
            assets.path().to_path_buf(),
            temp.path().to_path_buf(),
        );
        let state = AppState::from_parts(config, videos.clone(), blobs.clone());

        Self {
            router: create_router(state, None),
            videos,
            blobs,
            assets,
            temp,
            keys: JwtKeys::new(JWT_SECRET),
        }
    }

    /// Insert a fresh record owned by `owner`.
    pub fn seed(&self, owner: UserId) -> Video {
        let video = Video::new(owner, "Boots demo", "A pair of boots");
        self.videos.insert(video.clone());
        video
    }

    pub fn token(&self, user: UserId) -> String {
        self.keys.issue(user, Duration::from_secs(3600)).unwrap()
    }

    pub fn asset_files(&self) -> Vec<PathBuf> {
        list_dir(self.assets.path())
    }

    pub fn temp_files(&self) -> Vec<PathBuf> {
        list_dir(self.temp.path())
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

/// A multipart part for `multipart_request`.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: &'a str,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            file_name: "upload.bin",
            content_type: Some(content_type),
            data,
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, part.file_name
            )
            .as_bytes(),
        );
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// POST a multipart form, optionally with a bearer token.
pub fn multipart_request(uri: &str, token: Option<&str>, parts: &[Part<'_>]) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(multipart_body(parts))).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// An ISO base media file with an mp4 brand, padded out to `len` bytes.
pub fn mp4_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0x00, 0x00, 0x00, 0x20];
    buf.extend_from_slice(b"ftypisom");
    buf.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
    buf.extend_from_slice(b"isomiso2avc1mp41");
    let mut i = 0u8;
    while buf.len() < len {
        buf.push(i);
        i = i.wrapping_add(1);
    }
    buf
}

pub fn pdf_bytes() -> Vec<u8> {
    let mut buf = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n".to_vec();
    buf.resize(2048, b' ');
    buf
}

pub fn png_bytes() -> Vec<u8> {
    let mut buf = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    buf.extend_from_slice(&[0, 0, 0, 0x0D]);
    buf.extend_from_slice(b"IHDR");
    buf.resize(256, 0);
    buf
}
