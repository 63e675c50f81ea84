//! Record store adapter used by the dispatcher.
//!
//! Every operation is a single-row statement; there are no multi-record transactions.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{FileRecord, MessageRecord, RecordCounts, SearchRecord, UserRecord, UserUpdate};

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point lookup by chat identity.
    async fn find_user(&self, chat_id: i64) -> Result<Option<UserRecord>, StorageError>;

    /// Inserts a new user. A second insert for the same chat identity fails with
    /// [`StorageError::AlreadyExists`].
    async fn insert_user(&self, user: &UserRecord) -> Result<(), StorageError>;

    /// Applies the set fields of `update`. Fails with [`StorageError::NotFound`] when no user
    /// exists for `chat_id`.
    async fn update_user(&self, chat_id: i64, update: &UserUpdate) -> Result<(), StorageError>;

    /// Atomically adds `amount` to the user's bonus balance.
    async fn credit_bonus(&self, chat_id: i64, amount: u32) -> Result<(), StorageError>;

    async fn insert_message(&self, message: &MessageRecord) -> Result<(), StorageError>;

    async fn insert_file(&self, file: &FileRecord) -> Result<(), StorageError>;

    async fn insert_search(&self, search: &SearchRecord) -> Result<(), StorageError>;

    /// Row counts of each collection (read-only analytics projection).
    async fn counts(&self) -> Result<RecordCounts, StorageError>;
}
