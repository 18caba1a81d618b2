//! Shared data models for the Tubely backend.
//!
//! This crate provides Serde-serializable types for:
//! - Video records and their asset URLs
//! - Strongly typed video and user identifiers

pub mod video;

pub use video::{IdParseError, UserId, Video, VideoId};
