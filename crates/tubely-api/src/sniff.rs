//! Content type sniffing for uploaded streams.

/// Leading bytes inspected when sniffing.
pub const SNIFF_LEN: usize = 512;

/// Reported when no signature matches.
pub const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

const MP4_CONTENT_TYPE: &str = "video/mp4";

/// Detect the content type of a stream from its first bytes.
///
/// Only the first `SNIFF_LEN` bytes of `prefix` are looked at, whatever the
/// client declared for the part. MP4 is decided by `is_mp4` alone; other
/// types are named by `infer`.
pub fn sniff_content_type(prefix: &[u8]) -> &'static str {
    let window = &prefix[..prefix.len().min(SNIFF_LEN)];

    if is_mp4(window) {
        return MP4_CONTENT_TYPE;
    }

    infer::get(window)
        .map(|kind| kind.mime_type())
        .filter(|mime| *mime != MP4_CONTENT_TYPE)
        .unwrap_or(UNKNOWN_CONTENT_TYPE)
}

/// `ftyp` box whose major or compatible brands include one starting `mp4`.
///
/// The box size must be a multiple of 4 and fit in `data`. The minor
/// version at offset 12 is not a brand and is skipped.
fn is_mp4(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }

    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || box_size % 4 != 0 {
        return false;
    }

    if &data[4..8] != b"ftyp" {
        return false;
    }

    (8..box_size)
        .step_by(4)
        .filter(|&offset| offset != 12)
        .any(|offset| &data[offset..offset + 3] == b"mp4")
}
