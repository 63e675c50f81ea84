//! Storage crate: record persistence for the intake pipeline.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – UserRecord, MessageRecord, FileRecord, SearchRecord, RecordCounts
//! - [`repository`] – RecordStore trait (the adapter the dispatcher depends on)
//! - [`record_repo`] – SqliteRecordStore (SQLite via sqlx)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod models;
mod record_repo;
mod repository;
mod sqlite_pool;


pub use error::StorageError;
pub use models::{
    FileRecord, MessageRecord, RecordCounts, SearchRecord, UserRecord, UserUpdate, MAX_SEARCH_LINKS,
};
pub use record_repo::SqliteRecordStore;
pub use repository::RecordStore;
pub use sqlite_pool::SqlitePoolManager;
