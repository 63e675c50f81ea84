//! Core types: inbound events, replies, and the tags persisted with records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of media carried by a [`InboundEvent::MediaMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Document => "document",
        }
    }
}

/// Media item as received from the transport. Bytes are fully buffered before dispatch.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub kind: MediaKind,
    /// Transport file identifier.
    pub file_id: String,
    /// Original file name, when the transport provides one (documents only).
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaPayload {
    /// Local reference name: `<file_id>.jpg` for images, the original name for documents
    /// (falling back to the file id).
    pub fn local_name(&self) -> String {
        match self.kind {
            MediaKind::Image => format!("{}.jpg", self.file_id),
            MediaKind::Document => self
                .file_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| self.file_id.clone()),
        }
    }

    /// MIME type sent to the generation backend.
    pub fn effective_mime_type(&self) -> &str {
        match (&self.mime_type, self.kind) {
            (Some(m), _) if !m.trim().is_empty() => m,
            (_, MediaKind::Image) => "image/jpeg",
            (_, MediaKind::Document) => "application/octet-stream",
        }
    }
}

impl fmt::Debug for MediaPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPayload")
            .field("kind", &self.kind)
            .field("file_id", &self.file_id)
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Inbound event, classified by the transport binding.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// `/start [referral_code]`.
    Registration {
        chat_id: i64,
        username: Option<String>,
        display_name: Option<String>,
        referral_code: Option<String>,
    },
    ContactShare {
        chat_id: i64,
        phone: String,
    },
    TextMessage {
        chat_id: i64,
        text: String,
    },
    MediaMessage {
        chat_id: i64,
        media: MediaPayload,
    },
    /// `/websearch <terms...>`; `query_terms` may be empty.
    SearchCommand {
        chat_id: i64,
        query_terms: Vec<String>,
    },
    /// Anything the dispatcher does not handle; ignored without a reply.
    Unrecognized,
}

impl InboundEvent {
    /// Chat identity of the event; `None` for [`InboundEvent::Unrecognized`].
    pub fn chat_id(&self) -> Option<i64> {
        match self {
            InboundEvent::Registration { chat_id, .. }
            | InboundEvent::ContactShare { chat_id, .. }
            | InboundEvent::TextMessage { chat_id, .. }
            | InboundEvent::MediaMessage { chat_id, .. }
            | InboundEvent::SearchCommand { chat_id, .. } => Some(*chat_id),
            InboundEvent::Unrecognized => None,
        }
    }

    /// Short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Registration { .. } => "registration",
            InboundEvent::ContactShare { .. } => "contact_share",
            InboundEvent::TextMessage { .. } => "text_message",
            InboundEvent::MediaMessage { .. } => "media_message",
            InboundEvent::SearchCommand { .. } => "search_command",
            InboundEvent::Unrecognized => "unrecognized",
        }
    }
}

/// Sentiment tag stored with inbound text messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl Sentiment {
    /// Buckets a polarity score by strict sign. Non-finite scores are `Unknown`.
    pub fn from_polarity(score: f64) -> Self {
        if !score.is_finite() {
            Sentiment::Unknown
        } else if score > 0.0 {
            Sentiment::Positive
        } else if score < 0.0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Unknown => "unknown",
        }
    }
}

/// Direction tag of a message record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    /// Text sent by the user (annotated with translation and sentiment).
    UserText,
    /// Text produced by the generation backend (or its fallback).
    GeneratedResponse,
}

impl MessageDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageDirection::UserText => "user_text",
            MessageDirection::GeneratedResponse => "generated_response",
        }
    }
}

/// A stored tag string that does not name a known variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} tag: {value}")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! tag_str_impls {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseTagError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| ParseTagError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

tag_str_impls!(MediaKind, "media kind", [MediaKind::Image, MediaKind::Document]);
tag_str_impls!(
    Sentiment,
    "sentiment",
    [
        Sentiment::Positive,
        Sentiment::Negative,
        Sentiment::Neutral,
        Sentiment::Unknown,
    ]
);
tag_str_impls!(
    MessageDirection,
    "message direction",
    [MessageDirection::UserText, MessageDirection::GeneratedResponse]
);

/// Formatting hint for a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyFormat {
    #[default]
    Plain,
    /// Text contains Telegram-style HTML (`<b>`); dynamic parts are already escaped.
    Html,
}

/// Keyboard change requested alongside a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyMarkup {
    #[default]
    None,
    /// Show a one-button keyboard that shares the user's contact.
    RequestContact,
    /// Hide a previously shown contact keyboard.
    RemoveKeyboard,
}

/// The single reply produced for a dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: ReplyFormat,
    pub markup: ReplyMarkup,
}

impl Reply {
    /// Plain text reply without keyboard changes.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: ReplyFormat::Plain,
            markup: ReplyMarkup::None,
        }
    }

    /// HTML-formatted reply without keyboard changes.
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: ReplyFormat::Html,
            markup: ReplyMarkup::None,
        }
    }

    pub fn with_markup(mut self, markup: ReplyMarkup) -> Self {
        self.markup = markup;
        self
    }
}

/// Escapes `&`, `<` and `>` for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_from_polarity_buckets_by_sign() {
        assert_eq!(Sentiment::from_polarity(0.5), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(-0.3), Sentiment::Negative);
        assert_eq!(Sentiment::from_polarity(0.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(-0.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(f64::MIN_POSITIVE), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(f64::NAN), Sentiment::Unknown);
        assert_eq!(Sentiment::from_polarity(f64::INFINITY), Sentiment::Unknown);
    }

    #[test]
    fn test_tags_parse_back_from_their_string_form() {
        for s in [
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Neutral,
            Sentiment::Unknown,
        ] {
            assert_eq!(s.as_str().parse::<Sentiment>().unwrap(), s);
        }
        assert_eq!(
            "generated_response".parse::<MessageDirection>().unwrap(),
            MessageDirection::GeneratedResponse
        );
        assert_eq!("image".parse::<MediaKind>().unwrap(), MediaKind::Image);

        let err = "photo".parse::<MediaKind>().unwrap_err();
        assert_eq!(err.value, "photo");
    }

    #[test]
    fn test_sentiment_serializes_snake_case() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
    }

    #[test]
    fn test_media_local_name() {
        let mut media = MediaPayload {
            kind: MediaKind::Image,
            file_id: "AgAD123".to_string(),
            file_name: None,
            mime_type: None,
            bytes: vec![1, 2, 3],
        };
        assert_eq!(media.local_name(), "AgAD123.jpg");
        assert_eq!(media.effective_mime_type(), "image/jpeg");

        media.kind = MediaKind::Document;
        assert_eq!(media.local_name(), "AgAD123");
        assert_eq!(media.effective_mime_type(), "application/octet-stream");

        media.file_name = Some("report.pdf".to_string());
        media.mime_type = Some("application/pdf".to_string());
        assert_eq!(media.local_name(), "report.pdf");
        assert_eq!(media.effective_mime_type(), "application/pdf");
    }

    #[test]
    fn test_media_debug_hides_bytes() {
        let media = MediaPayload {
            kind: MediaKind::Document,
            file_id: "f".to_string(),
            file_name: None,
            mime_type: None,
            bytes: vec![0; 4096],
        };
        let dbg = format!("{:?}", media);
        assert!(dbg.contains("bytes_len: 4096"));
    }

    #[test]
    fn test_event_chat_id_and_kind() {
        let event = InboundEvent::SearchCommand {
            chat_id: 42,
            query_terms: vec![],
        };
        assert_eq!(event.chat_id(), Some(42));
        assert_eq!(event.kind(), "search_command");
        assert_eq!(InboundEvent::Unrecognized.chat_id(), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_reply_builders() {
        let reply = Reply::text("hi").with_markup(ReplyMarkup::RequestContact);
        assert_eq!(reply.format, ReplyFormat::Plain);
        assert_eq!(reply.markup, ReplyMarkup::RequestContact);
        assert_eq!(Reply::html("<b>x</b>").format, ReplyFormat::Html);
    }
}
