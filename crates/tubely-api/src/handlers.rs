//! Request handlers.

pub mod health;
pub mod thumbnails;
pub mod videos;

pub use health::*;
pub use thumbnails::*;
pub use videos::*;

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{FromRequestParts, Multipart, Path};
use axum::http::request::Parts;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use tubely_models::{Video, VideoId};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `{video_id}` path segment parsed as a UUID.
///
/// Declared before `AuthUser` in handler signatures so a malformed ID is
/// reported ahead of any token problem.
#[derive(Debug, Clone, Copy)]
pub struct VideoPath(pub VideoId);

#[axum::async_trait]
impl<S> FromRequestParts<S> for VideoPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request("Invalid ID"))?;

        raw.parse()
            .map(VideoPath)
            .map_err(|_| ApiError::bad_request("Invalid ID"))
    }
}

/// Fetch a record and make sure the caller owns it.
pub(crate) async fn load_owned_video(
    state: &AppState,
    video_id: VideoId,
    user: &AuthUser,
) -> ApiResult<Video> {
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    if !video.is_owned_by(&user.user_id) {
        warn!(
            video_id = %video_id,
            user_id = %user.user_id,
            owner_id = %video.user_id,
            "Rejected access to video owned by another user"
        );
        return Err(ApiError::unauthorized(
            "You do not have permission to modify this video",
        ));
    }

    Ok(video)
}

/// Surface a rejected multipart extractor only once the caller is authorized.
pub(crate) fn accept_form(form: Result<Multipart, MultipartRejection>) -> ApiResult<Multipart> {
    form.map_err(|e| ApiError::bad_request(format!("Failed to parse form data: {}", e.body_text())))
}

/// Drain the rest of a multipart field into `file`, returning the bytes written.
pub(crate) async fn copy_field_to_file(
    field: &mut Field<'_>,
    file: &mut tokio::fs::File,
) -> ApiResult<u64> {
    let mut written = 0u64;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}
