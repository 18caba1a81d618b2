//! Object key and URL helpers.

/// Namespace all uploaded videos live under.
pub const VIDEO_KEY_PREFIX: &str = "videos/";

/// Content type every stored video is written with.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Number of random bytes in a video key (hex-encoded to 32 chars).
const VIDEO_KEY_RANDOM_BYTES: usize = 16;

/// Generate a fresh key of the form `videos/<32 hex chars>.mp4`.
pub fn video_object_key() -> String {
    let random: [u8; VIDEO_KEY_RANDOM_BYTES] = rand::random();
    format!("{}{}.mp4", VIDEO_KEY_PREFIX, hex::encode(random))
}

/// Virtual-hosted style URL of an object in a public bucket.
pub fn public_object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_video_key_shape() {
        let key = video_object_key();
        let hex_part = key
            .strip_prefix("videos/")
            .and_then(|k| k.strip_suffix(".mp4"))
            .unwrap();
        assert_eq!(hex_part.len(), 32);
        assert!(hex_part.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_video_keys_do_not_collide() {
        let keys: HashSet<String> = (0..1000).map(|_| video_object_key()).collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn test_public_object_url() {
        assert_eq!(
            public_object_url("tubely-123", "us-east-2", "videos/abc.mp4"),
            "https://tubely-123.s3.us-east-2.amazonaws.com/videos/abc.mp4"
        );
    }
}
