//! Axum HTTP API server for Tubely.
//!
//! This crate provides:
//! - Thumbnail uploads kept in a local assets directory
//! - MP4 video uploads staged on disk and pushed to S3
//! - Bearer token (HS256) authentication with per-record ownership checks
//! - Prometheus metrics

pub mod assets;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod sniff;
pub mod state;

pub use auth::{AuthUser, JwtKeys};
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
