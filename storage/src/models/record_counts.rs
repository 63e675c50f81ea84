//! Aggregate counts per collection.
//!
//! Returned by RecordStore::counts; backs the `stats` command.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub total_users: i64,
    pub total_messages: i64,
    pub total_files: i64,
    pub total_searches: i64,
}
