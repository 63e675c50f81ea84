//! Search record model: one row per completed `/websearch` command.
//!
//! Links are stored as a JSON array in a TEXT column; [`SearchRow`] is the raw row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;

/// Maximum number of links kept per search.
pub const MAX_SEARCH_LINKS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub id: String,
    pub chat_id: i64,
    pub query: String,
    pub summary: String,
    /// Result links in upstream order, at most [`MAX_SEARCH_LINKS`].
    pub links: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl SearchRecord {
    /// Creates a record; `links` beyond the first five are dropped.
    pub fn new(chat_id: i64, query: String, summary: String, mut links: Vec<String>) -> Self {
        links.truncate(MAX_SEARCH_LINKS);
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id,
            query,
            summary,
            links,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct SearchRow {
    pub id: String,
    pub chat_id: i64,
    pub query: String,
    pub summary: String,
    pub links: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SearchRow> for SearchRecord {
    type Error = StorageError;

    fn try_from(row: SearchRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            chat_id: row.chat_id,
            query: row.query,
            summary: row.summary,
            links: serde_json::from_str(&row.links)?,
            created_at: row.created_at,
        })
    }
}
