//! User record model.
//!
//! One row per chat identity; `chat_id` is the primary key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub chat_id: i64,
    pub username: Option<String>,
    pub display_name: Option<String>,
    /// Set when the user shares their contact.
    pub phone: Option<String>,
    /// Generated together with the phone on contact share.
    pub referral_code: Option<String>,
    /// Never negative; only ever incremented.
    pub bonus_points: i64,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a freshly registered user: no phone, no referral code, zero bonus.
    pub fn new(chat_id: i64, username: Option<String>, display_name: Option<String>) -> Self {
        Self {
            chat_id,
            username,
            display_name,
            phone: None,
            referral_code: None,
            bonus_points: 0,
            created_at: Utc::now(),
        }
    }
}

/// Partial update of a user; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub phone: Option<String>,
    pub referral_code: Option<String>,
}
