//! Thumbnail asset naming and media type checks.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

/// Random bytes behind every thumbnail file name.
const ASSET_NAME_RANDOM_BYTES: usize = 32;

/// Image formats accepted as thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailFormat {
    Png,
    Jpeg,
}

impl ThumbnailFormat {
    /// Map a declared media type onto the allow-list.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// File extension, including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => ".png",
            Self::Jpeg => ".jpg",
        }
    }
}

/// Parse a `Content-Type` value down to its lowercased `type/subtype`.
///
/// Parameters are dropped. Returns `None` when the value is not a media type.
pub fn parse_media_type(value: &str) -> Option<String> {
    let essence = value.split(';').next()?.trim();
    let (kind, subtype) = essence.split_once('/')?;

    let is_token = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c))
    };

    if !is_token(kind) || !is_token(subtype) {
        return None;
    }

    Some(essence.to_ascii_lowercase())
}

/// Fresh, URL-safe file name for a thumbnail.
///
/// The client supplied file name is never consulted.
pub fn random_asset_name(format: ThumbnailFormat) -> String {
    let random: [u8; ASSET_NAME_RANDOM_BYTES] = rand::random();
    format!("{}{}", URL_SAFE_NO_PAD.encode(random), format.extension())
}
