//! Video upload and lookup handlers.

use std::path::Path;
use std::time::Instant;

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

use tubely_models::Video;
use tubely_storage::{video_object_key, VIDEO_CONTENT_TYPE};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::handlers::{accept_form, copy_field_to_file, load_owned_video, VideoPath};
use crate::metrics;
use crate::sniff::{sniff_content_type, SNIFF_LEN};
use crate::state::AppState;

/// Multipart field carrying the video.
pub const VIDEO_FIELD: &str = "video";

/// Largest request body accepted on the video upload route (1 GiB).
pub const MAX_VIDEO_UPLOAD_BYTES: usize = 1 << 30;

const STAGING_PREFIX: &str = "tubely-upload-";

#[derive(Debug, Serialize)]
pub struct VideoUploadResponse {
    pub message: String,
    pub s3_url: String,
}

/// Get a video record owned by the caller.
pub async fn get_video(
    State(state): State<AppState>,
    VideoPath(video_id): VideoPath,
    user: AuthUser,
) -> ApiResult<Json<Video>> {
    let video = load_owned_video(&state, video_id, &user).await?;
    Ok(Json(video))
}

/// Upload an MP4 video for a record.
///
/// The stream is staged in a temp file, pushed to the blob store under a
/// fresh key and the record's `video_url` is pointed at the public object.
/// The staged file is removed on every exit path.
pub async fn upload_video(
    State(state): State<AppState>,
    VideoPath(video_id): VideoPath,
    user: AuthUser,
    form: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<VideoUploadResponse>> {
    info!(video_id = %video_id, user_id = %user.user_id, "Uploading video");

    let mut video = load_owned_video(&state, video_id, &user).await?;
    let mut multipart = accept_form(form)?;

    let mut staged = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }
        staged = Some(stage_video(&state.config.temp_dir, field).await?);
        break;
    }

    let staged =
        staged.ok_or_else(|| ApiError::bad_request("Failed to retrieve file from form"))?;

    let key = video_object_key();
    let start = Instant::now();
    state
        .blobs
        .put_object(&key, staged.file.path(), VIDEO_CONTENT_TYPE)
        .await
        .map_err(|e| {
            error!(video_id = %video_id, key = %key, "Failed to upload video: {}", e);
            ApiError::from(e)
        })?;
    metrics::record_blob_put_duration(start.elapsed().as_secs_f64());

    let s3_url = state.blobs.object_url(&key);
    video.set_video_url(&s3_url);

    state.videos.update_video(&video).await.map_err(|e| {
        error!(video_id = %video_id, key = %key, "Failed to update video metadata: {}", e);
        ApiError::from(e)
    })?;

    metrics::record_video_uploaded(staged.size);
    info!(
        video_id = %video_id,
        key = %key,
        bytes = staged.size,
        url = %s3_url,
        "Uploaded video"
    );

    Ok(Json(VideoUploadResponse {
        message: "Video uploaded successfully".to_string(),
        s3_url,
    }))
}

/// Upload written to local disk. Deleted when dropped.
struct StagedUpload {
    file: NamedTempFile,
    size: u64,
}

/// Sniff the head of the part and, if it is an MP4, write the whole part
/// to a temp file.
async fn stage_video(temp_dir: &Path, mut field: Field<'_>) -> ApiResult<StagedUpload> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    while head.len() < SNIFF_LEN {
        match field.chunk().await? {
            Some(chunk) => head.extend_from_slice(&chunk),
            None => break,
        }
    }

    if head.is_empty() {
        return Err(ApiError::bad_request("Failed to read file"));
    }

    let detected = sniff_content_type(&head);
    if detected != VIDEO_CONTENT_TYPE {
        warn!(detected, "Rejected video upload");
        metrics::record_upload_rejected("video", "unsupported_type");
        return Err(ApiError::validation(format!(
            "Invalid file type, must be MP4 (detected {})",
            detected
        )));
    }

    let staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(".mp4")
        .tempfile_in(temp_dir)
        .map_err(|e| {
            error!(dir = %temp_dir.display(), "Failed to create temp file: {}", e);
            ApiError::from(e)
        })?;

    let mut file = tokio::fs::File::from_std(staged.as_file().try_clone()?);
    file.write_all(&head).await?;
    let rest = copy_field_to_file(&mut field, &mut file).await?;

    Ok(StagedUpload {
        file: staged,
        size: head.len() as u64 + rest,
    })
}
