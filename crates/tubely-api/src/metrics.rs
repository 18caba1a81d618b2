//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

use crate::assets::ThumbnailFormat;

/// Install the Prometheus recorder and return the handle used to render it.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "tubely_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "tubely_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "tubely_http_requests_in_flight";

    // Upload metrics
    pub const THUMBNAILS_UPLOADED_TOTAL: &str = "tubely_thumbnails_uploaded_total";
    pub const VIDEOS_UPLOADED_TOTAL: &str = "tubely_videos_uploaded_total";
    pub const VIDEO_UPLOAD_BYTES: &str = "tubely_video_upload_bytes";
    pub const UPLOAD_REJECTIONS_TOTAL: &str = "tubely_upload_rejections_total";
    pub const BLOB_PUT_DURATION_SECONDS: &str = "tubely_blob_put_duration_seconds";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a stored thumbnail.
pub fn record_thumbnail_uploaded(format: ThumbnailFormat) {
    let format = match format {
        ThumbnailFormat::Png => "png",
        ThumbnailFormat::Jpeg => "jpeg",
    };
    counter!(names::THUMBNAILS_UPLOADED_TOTAL, "format" => format).increment(1);
}

/// Record a video that reached the blob store and the record.
pub fn record_video_uploaded(bytes: u64) {
    counter!(names::VIDEOS_UPLOADED_TOTAL).increment(1);
    histogram!(names::VIDEO_UPLOAD_BYTES).record(bytes as f64);
}

/// Record an upload turned away for its content.
pub fn record_upload_rejected(kind: &'static str, reason: &'static str) {
    counter!(names::UPLOAD_REJECTIONS_TOTAL, "kind" => kind, "reason" => reason).increment(1);
}

/// Record blob store put duration.
pub fn record_blob_put_duration(duration_secs: f64) {
    histogram!(names::BLOB_PUT_DURATION_SECONDS).record(duration_secs);
}

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("valid regex")
});

static ASSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/assets/.+$").expect("valid regex"));

/// Sanitize path for metrics labels (remove IDs and file names).
fn sanitize_path(path: &str) -> String {
    if ASSET_RE.is_match(path) {
        return "/assets/:file".to_string();
    }
    UUID_RE.replace_all(path, ":id").into_owned()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/video_upload/550e8400-e29b-41d4-a716-446655440000"),
            "/api/video_upload/:id"
        );
        assert_eq!(
            sanitize_path("/api/thumbnail_upload/550E8400-E29B-41D4-A716-446655440000"),
            "/api/thumbnail_upload/:id"
        );
        assert_eq!(sanitize_path("/assets/abc_-12.png"), "/assets/:file");
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
