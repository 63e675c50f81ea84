//! Classification of teloxide messages into core inbound events.
//! Depends only on teloxide and intake_core type definitions; media bytes are fetched later.

use intake_core::{InboundEvent, MediaKind, MediaPayload};
use teloxide::types::Message;

/// Media reference found in a message; becomes a [`MediaPayload`] once downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMedia {
    pub kind: MediaKind,
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl PendingMedia {
    pub fn with_bytes(self, bytes: Vec<u8>) -> MediaPayload {
        MediaPayload {
            kind: self.kind,
            file_id: self.file_id,
            file_name: self.file_name,
            mime_type: self.mime_type,
            bytes,
        }
    }
}

/// Result of [`classify_message`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedMessage {
    /// Complete event, ready for dispatch.
    Ready(InboundEvent),
    /// Photo or document whose bytes must be downloaded first.
    Media { chat_id: i64, media: PendingMedia },
}

/// Splits `/command@bot arg1 arg2` into the lowercase command name and its arguments.
/// Returns `None` when `text` is not a command.
pub fn parse_command(text: &str) -> Option<(String, Vec<String>)> {
    let mut words = text.split_whitespace();
    let head = words.next()?.strip_prefix('/')?;
    let name = head.split('@').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some((
        name.to_ascii_lowercase(),
        words.map(str::to_string).collect(),
    ))
}

/// Classifies a message by its content: contact, photo (largest size), document, command or
/// plain text. Everything else is [`InboundEvent::Unrecognized`].
pub fn classify_message(msg: &Message) -> ClassifiedMessage {
    let chat_id = msg.chat.id.0;

    if let Some(contact) = msg.contact() {
        return ClassifiedMessage::Ready(InboundEvent::ContactShare {
            chat_id,
            phone: contact.phone_number.clone(),
        });
    }

    if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        return ClassifiedMessage::Media {
            chat_id,
            media: PendingMedia {
                kind: MediaKind::Image,
                file_id: photo.file.id.clone(),
                file_name: None,
                mime_type: Some("image/jpeg".to_string()),
            },
        };
    }

    if let Some(document) = msg.document() {
        return ClassifiedMessage::Media {
            chat_id,
            media: PendingMedia {
                kind: MediaKind::Document,
                file_id: document.file.id.clone(),
                file_name: document.file_name.clone(),
                mime_type: document.mime_type.as_ref().map(|m| m.to_string()),
            },
        };
    }

    let Some(text) = msg.text() else {
        return ClassifiedMessage::Ready(InboundEvent::Unrecognized);
    };

    let event = match parse_command(text) {
        Some((name, args)) => match name.as_str() {
            "start" => InboundEvent::Registration {
                chat_id,
                username: msg.from.as_ref().and_then(|u| u.username.clone()),
                display_name: msg.from.as_ref().map(|u| u.first_name.clone()),
                referral_code: args.into_iter().next(),
            },
            "websearch" => InboundEvent::SearchCommand {
                chat_id,
                query_terms: args,
            },
            _ => InboundEvent::Unrecognized,
        },
        None => InboundEvent::TextMessage {
            chat_id,
            text: text.to_string(),
        },
    };
    ClassifiedMessage::Ready(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn message(content: Value) -> Message {
        let mut body = json!({
            "message_id": 1,
            "date": 1706529600,
            "chat": { "id": 42, "type": "private", "first_name": "Alice" },
            "from": {
                "id": 42,
                "is_bot": false,
                "first_name": "Alice",
                "username": "alice"
            }
        });
        if let (Some(target), Some(extra)) = (body.as_object_mut(), content.as_object()) {
            for (key, value) in extra {
                target.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(body).expect("deserialize message")
    }

    /// **Test: Command parsing handles bot mentions, case and arguments.**
    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("/start REF12"),
            Some(("start".to_string(), vec!["REF12".to_string()]))
        );
        assert_eq!(
            parse_command("/WebSearch@intake_bot  rust   async "),
            Some((
                "websearch".to_string(),
                vec!["rust".to_string(), "async".to_string()]
            ))
        );
        assert_eq!(parse_command("/websearch"), Some(("websearch".to_string(), vec![])));
        assert_eq!(parse_command("hello /start"), None);
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command(""), None);
    }

    /// **Test: /start becomes Registration with sender names and the first argument as code.**
    #[test]
    fn test_start_is_registration() {
        let msg = message(json!({ "text": "/start REF7 extra" }));
        assert_eq!(
            classify_message(&msg),
            ClassifiedMessage::Ready(InboundEvent::Registration {
                chat_id: 42,
                username: Some("alice".to_string()),
                display_name: Some("Alice".to_string()),
                referral_code: Some("REF7".to_string()),
            })
        );
    }

    /// **Test: /websearch keeps the query terms; plain text is a TextMessage.**
    #[test]
    fn test_search_and_text() {
        let msg = message(json!({ "text": "/websearch tokio tasks" }));
        assert_eq!(
            classify_message(&msg),
            ClassifiedMessage::Ready(InboundEvent::SearchCommand {
                chat_id: 42,
                query_terms: vec!["tokio".to_string(), "tasks".to_string()],
            })
        );

        let msg = message(json!({ "text": "¿Qué tal?" }));
        assert_eq!(
            classify_message(&msg),
            ClassifiedMessage::Ready(InboundEvent::TextMessage {
                chat_id: 42,
                text: "¿Qué tal?".to_string(),
            })
        );
    }

    /// **Test: Other commands and unsupported content are Unrecognized.**
    #[test]
    fn test_unrecognized() {
        let msg = message(json!({ "text": "/help" }));
        assert_eq!(
            classify_message(&msg),
            ClassifiedMessage::Ready(InboundEvent::Unrecognized)
        );

        let msg = message(json!({
            "location": { "latitude": 48.8566, "longitude": 2.3522 }
        }));
        assert_eq!(
            classify_message(&msg),
            ClassifiedMessage::Ready(InboundEvent::Unrecognized)
        );
    }

    /// **Test: Shared contact becomes ContactShare with the phone number.**
    #[test]
    fn test_contact() {
        let msg = message(json!({
            "contact": { "phone_number": "+15550100", "first_name": "Alice", "user_id": 42 }
        }));
        assert_eq!(
            classify_message(&msg),
            ClassifiedMessage::Ready(InboundEvent::ContactShare {
                chat_id: 42,
                phone: "+15550100".to_string(),
            })
        );
    }

    /// **Test: Photo picks the largest (last) size; document keeps name and MIME type.**
    #[test]
    fn test_media() {
        let msg = message(json!({
            "photo": [
                { "file_id": "small", "file_unique_id": "s", "file_size": 1200, "width": 90, "height": 90 },
                { "file_id": "large", "file_unique_id": "l", "file_size": 98000, "width": 1280, "height": 1280 }
            ]
        }));
        assert_eq!(
            classify_message(&msg),
            ClassifiedMessage::Media {
                chat_id: 42,
                media: PendingMedia {
                    kind: MediaKind::Image,
                    file_id: "large".to_string(),
                    file_name: None,
                    mime_type: Some("image/jpeg".to_string()),
                },
            }
        );

        let msg = message(json!({
            "document": {
                "file_id": "doc-id",
                "file_unique_id": "doc-unique",
                "file_size": 2048,
                "file_name": "report.pdf",
                "mime_type": "application/pdf"
            }
        }));
        assert_eq!(
            classify_message(&msg),
            ClassifiedMessage::Media {
                chat_id: 42,
                media: PendingMedia {
                    kind: MediaKind::Document,
                    file_id: "doc-id".to_string(),
                    file_name: Some("report.pdf".to_string()),
                    mime_type: Some("application/pdf".to_string()),
                },
            }
        );
    }

    #[test]
    fn test_pending_media_with_bytes() {
        let payload = PendingMedia {
            kind: MediaKind::Document,
            file_id: "f".to_string(),
            file_name: Some("a.txt".to_string()),
            mime_type: Some("text/plain".to_string()),
        }
        .with_bytes(b"hi".to_vec());
        assert_eq!(payload.bytes, b"hi");
        assert_eq!(payload.local_name(), "a.txt");
    }
}
