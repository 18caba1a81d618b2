//! Video metadata models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a path or claim value is not a valid UUID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier: {0}")]
pub struct IdParseError(pub String);

/// Unique identifier for a video record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub Uuid);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VideoId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| IdParseError(s.to_string()))
    }
}

impl From<Uuid> for VideoId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Identifier of an authenticated user (the JWT subject).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| IdParseError(s.to_string()))
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// A video record as persisted in the metadata store.
///
/// Records are created elsewhere. The upload handlers only ever set one of
/// the two asset URLs per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    /// Owner of the record
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Public URL of the thumbnail image, absent until first upload
    pub thumbnail_url: Option<String>,
    /// Public URL of the video object, absent until first upload
    pub video_url: Option<String>,
}

impl Video {
    /// Create a fresh record with no assets attached.
    pub fn new(user_id: UserId, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: VideoId::new(),
            user_id,
            title: title.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
            thumbnail_url: None,
            video_url: None,
        }
    }

    /// True if `user` owns this record.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.user_id == *user
    }

    pub fn set_thumbnail_url(&mut self, url: impl Into<String>) {
        self.thumbnail_url = Some(url.into());
        self.updated_at = Utc::now();
    }

    pub fn set_video_url(&mut self, url: impl Into<String>) {
        self.video_url = Some(url.into());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_parse() {
        let id: VideoId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        assert!("not-a-uuid".parse::<VideoId>().is_err());
        assert!("".parse::<VideoId>().is_err());
    }

    #[test]
    fn test_ownership() {
        let owner = UserId::new();
        let video = Video::new(owner, "title", "description");
        assert!(video.is_owned_by(&owner));
        assert!(!video.is_owned_by(&UserId::new()));
    }

    #[test]
    fn test_set_urls_touch_updated_at() {
        let mut video = Video::new(UserId::new(), "title", "");
        let before = video.updated_at;
        video.set_thumbnail_url("http://localhost:8091/assets/a.png");
        assert_eq!(
            video.thumbnail_url.as_deref(),
            Some("http://localhost:8091/assets/a.png")
        );
        assert!(video.video_url.is_none());
        assert!(video.updated_at >= before);
    }

    #[test]
    fn test_serialized_field_names() {
        let video = Video::new(UserId::new(), "t", "d");
        let json = serde_json::to_value(&video).unwrap();
        assert!(json.get("thumbnail_url").is_some());
        assert!(json.get("video_url").is_some());
        assert_eq!(json["id"], serde_json::json!(video.id.to_string()));
    }
}
