//! # intake-telegram
//!
//! Telegram layer: turns teloxide messages into [`intake_core::InboundEvent`]s, downloads
//! media, delivers [`intake_core::Reply`]s and runs the REPL. No persistence or AI logic.

mod adapters;
mod bot_adapter;
mod config;
mod download;
mod runner;

pub use adapters::{classify_message, parse_command, ClassifiedMessage, PendingMedia};
pub use bot_adapter::{html_to_plain, TelegramBotAdapter, CONTACT_BUTTON_TEXT};
pub use config::TelegramConfig;
pub use download::download_file;
pub use runner::{handle_message, run_repl};
