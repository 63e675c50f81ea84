//! File record model: one row per processed media item.

use chrono::{DateTime, Utc};
use intake_core::{MediaKind, MediaPayload, ParseTagError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileRecord {
    pub id: String,
    pub chat_id: i64,
    /// Transport file identifier.
    pub file_id: String,
    /// Local reference name (`<file_id>.jpg` for photos, the document's name otherwise).
    pub file_name: String,
    /// `image` or `document`.
    pub media_kind: String,
    pub mime_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn new(chat_id: i64, media: &MediaPayload, description: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id,
            file_id: media.file_id.clone(),
            file_name: media.local_name(),
            media_kind: media.kind.as_str().to_string(),
            mime_type: media.effective_mime_type().to_string(),
            description,
            created_at: Utc::now(),
        }
    }

    pub fn media_kind_tag(&self) -> Result<MediaKind, ParseTagError> {
        self.media_kind.parse()
    }
}
