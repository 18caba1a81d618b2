//! Thumbnail upload handler.

use std::path::Path;

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{error, info};

use tubely_models::Video;

use crate::assets::{parse_media_type, random_asset_name, ThumbnailFormat};
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::handlers::{accept_form, copy_field_to_file, load_owned_video, VideoPath};
use crate::metrics;
use crate::state::AppState;

/// Multipart field carrying the image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Hard cap on a thumbnail request body (1 GiB). Parts stream straight to
/// disk, so no smaller in-memory limit applies.
pub const MAX_THUMBNAIL_UPLOAD_BYTES: usize = 1 << 30;

/// Upload a thumbnail image for a video.
///
/// The image is kept in the assets directory under a random name and the
/// record's `thumbnail_url` is pointed at it.
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    VideoPath(video_id): VideoPath,
    user: AuthUser,
    form: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Video>> {
    info!(video_id = %video_id, user_id = %user.user_id, "Uploading thumbnail");

    let mut video = load_owned_video(&state, video_id, &user).await?;
    let mut multipart = accept_form(form)?;

    let mut stored = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }
        stored = Some(store_thumbnail(&state.config.assets_root, field).await?);
        break;
    }

    let (file_name, format) =
        stored.ok_or_else(|| ApiError::bad_request("Failed to retrieve file from form"))?;

    let thumbnail_url = state.config.asset_url(&file_name);
    video.set_thumbnail_url(&thumbnail_url);

    state.videos.update_video(&video).await.map_err(|e| {
        error!(video_id = %video_id, "Failed to update video metadata: {}", e);
        ApiError::from(e)
    })?;

    metrics::record_thumbnail_uploaded(format);
    info!(video_id = %video_id, url = %thumbnail_url, "Uploaded thumbnail");

    Ok(Json(video))
}

/// Validate the declared type of the part and write it to the assets directory.
async fn store_thumbnail(
    assets_root: &Path,
    mut field: Field<'_>,
) -> ApiResult<(String, ThumbnailFormat)> {
    let media_type = field
        .content_type()
        .and_then(parse_media_type)
        .ok_or_else(|| ApiError::bad_request("Invalid Content-Type"))?;

    let format = ThumbnailFormat::from_media_type(&media_type).ok_or_else(|| {
        metrics::record_upload_rejected("thumbnail", "unsupported_type");
        ApiError::validation(format!("Unsupported file type: {}", media_type))
    })?;

    let file_name = random_asset_name(format);
    let path = assets_root.join(&file_name);

    let mut file = tokio::fs::File::create(&path).await.map_err(|e| {
        error!(path = %path.display(), "Failed to create file on disk: {}", e);
        ApiError::from(e)
    })?;

    if let Err(e) = copy_field_to_file(&mut field, &mut file).await {
        drop(file);
        let _ = tokio::fs::remove_file(&path).await;
        return Err(e);
    }

    Ok((file_name, format))
}
