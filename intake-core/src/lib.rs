//! # intake-core
//!
//! Core types and traits for the intake bot: [`InboundEvent`], [`Reply`], the record tags
//! ([`Sentiment`], [`MediaKind`], [`MessageDirection`]), the [`Bot`] reply trait and tracing
//! initialization. Transport-agnostic; used by storage, dispatcher and intake-telegram.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{IntakeError, Result};
pub use logger::init_tracing;
pub use types::{
    escape_html, InboundEvent, MediaKind, MediaPayload, MessageDirection, ParseTagError, Reply,
    ReplyFormat, ReplyMarkup, Sentiment,
};
