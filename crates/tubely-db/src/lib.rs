//! Video metadata store.
//!
//! This crate provides:
//! - The `VideoStore` seam the API reads and updates records through
//! - A SQLite implementation using sqlx

pub mod error;
pub mod sqlite;
pub mod store;

pub use error::{DbError, DbResult};
pub use sqlite::SqliteVideoStore;
pub use store::VideoStore;
