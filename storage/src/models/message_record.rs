//! Message record model for persistence.
//!
//! Maps to the `messages` table. Inbound user text carries its translation and sentiment;
//! generated responses carry only the text.

use chrono::{DateTime, Utc};
use intake_core::{MessageDirection, ParseTagError, Sentiment};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: String,
    pub chat_id: i64,
    /// `user_text` or `generated_response`.
    pub direction: String,
    pub original_text: String,
    pub translated_text: Option<String>,
    /// `positive` / `negative` / `neutral` / `unknown`; only for `user_text`.
    pub sentiment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    /// Inbound user message annotated with its translation and sentiment.
    pub fn user_text(
        chat_id: i64,
        original_text: String,
        translated_text: String,
        sentiment: Sentiment,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id,
            direction: MessageDirection::UserText.as_str().to_string(),
            original_text,
            translated_text: Some(translated_text),
            sentiment: Some(sentiment.as_str().to_string()),
            created_at: Utc::now(),
        }
    }

    /// Outbound text produced by the generation backend (or its fallback).
    pub fn generated_response(chat_id: i64, text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id,
            direction: MessageDirection::GeneratedResponse.as_str().to_string(),
            original_text: text,
            translated_text: None,
            sentiment: None,
            created_at: Utc::now(),
        }
    }

    pub fn direction_tag(&self) -> Result<MessageDirection, ParseTagError> {
        self.direction.parse()
    }

    pub fn sentiment_tag(&self) -> Result<Option<Sentiment>, ParseTagError> {
        self.sentiment.as_deref().map(str::parse).transpose()
    }
}
