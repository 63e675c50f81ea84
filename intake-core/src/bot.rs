//! Bot abstraction for delivering replies.
//!
//! [`Bot`] is transport-agnostic; intake-telegram implements it via teloxide and tests substitute
//! a recording mock.

use crate::error::Result;
use crate::types::Reply;
use async_trait::async_trait;

/// Delivers replies to a chat. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a dispatcher reply, honouring its format hint and keyboard markup.
    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<()>;
}
