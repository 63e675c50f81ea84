//! Event dispatcher: one fixed processing chain per [`InboundEvent`] variant.

use intake_core::{InboundEvent, MediaKind, MediaPayload, Reply, ReplyMarkup};
use storage::{FileRecord, MessageRecord, SearchRecord, StorageError, UserRecord, UserUpdate};
use tracing::{error, info, instrument, warn};

use crate::context::DispatchContext;
use crate::error::Result;
use crate::referral::referral_code_for;
use crate::replies;

/// Runs the processing chain of an event and produces its reply.
#[derive(Clone)]
pub struct Dispatcher {
    ctx: DispatchContext,
}

impl Dispatcher {
    pub fn new(ctx: DispatchContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &DispatchContext {
        &self.ctx
    }

    /// Processes one event. Returns exactly one reply for every recognised event and `None`
    /// for [`InboundEvent::Unrecognized`]. Never fails: store errors become an error reply.
    #[instrument(skip(self, event), fields(event = event.kind(), chat_id = ?event.chat_id()))]
    pub async fn dispatch(&self, event: InboundEvent) -> Option<Reply> {
        let reply = match event {
            InboundEvent::Registration {
                chat_id,
                username,
                display_name,
                referral_code,
            } => self
                .register(chat_id, username, display_name, referral_code)
                .await
                .unwrap_or_else(|e| store_failure("registration", e, replies::REGISTRATION_ERROR)),
            InboundEvent::ContactShare { chat_id, phone } => self
                .save_contact(chat_id, phone)
                .await
                .unwrap_or_else(|e| store_failure("contact_share", e, replies::CONTACT_ERROR)),
            InboundEvent::TextMessage { chat_id, text } => self
                .answer_text(chat_id, text)
                .await
                .unwrap_or_else(|e| store_failure("text_message", e, replies::TEXT_ERROR)),
            InboundEvent::MediaMessage { chat_id, media } => self
                .describe_media(chat_id, media)
                .await
                .unwrap_or_else(|e| store_failure("media_message", e, replies::FILE_ERROR)),
            InboundEvent::SearchCommand {
                chat_id,
                query_terms,
            } => self
                .web_search(chat_id, query_terms)
                .await
                .unwrap_or_else(|e| store_failure("search_command", e, replies::SEARCH_ERROR)),
            InboundEvent::Unrecognized => {
                info!("step: ignoring unrecognized event");
                return None;
            }
        };
        Some(reply)
    }

    async fn register(
        &self,
        chat_id: i64,
        username: Option<String>,
        display_name: Option<String>,
        referral_code: Option<String>,
    ) -> Result<Reply> {
        if self.ctx.store.find_user(chat_id).await?.is_some() {
            info!(chat_id, "step: user already registered");
            return Ok(Reply::text(replies::ALREADY_REGISTERED));
        }

        let user = UserRecord::new(chat_id, username, display_name);
        match self.ctx.store.insert_user(&user).await {
            Ok(()) => info!(chat_id, "step: user registered"),
            Err(StorageError::AlreadyExists(_)) => {
                info!(chat_id, "step: concurrent registration lost the insert race");
                return Ok(Reply::text(replies::ALREADY_REGISTERED));
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(code) = referral_code.as_deref().filter(|c| !c.trim().is_empty()) {
            let outcome = self.ctx.referral.credit(code, chat_id).await;
            info!(chat_id, outcome = ?outcome, "step: referral processed");
        }

        Ok(Reply::text(replies::SHARE_CONTACT_PROMPT).with_markup(ReplyMarkup::RequestContact))
    }

    async fn save_contact(&self, chat_id: i64, phone: String) -> Result<Reply> {
        let referral_code = referral_code_for(chat_id);
        let update = UserUpdate {
            phone: Some(phone.clone()),
            referral_code: Some(referral_code.clone()),
        };
        match self.ctx.store.update_user(chat_id, &update).await {
            Ok(()) => {}
            Err(StorageError::NotFound(_)) => {
                info!(chat_id, "step: contact shared before registration");
                return Ok(Reply::text(replies::REGISTER_FIRST)
                    .with_markup(ReplyMarkup::RemoveKeyboard));
            }
            Err(e) => return Err(e.into()),
        }
        info!(chat_id, "step: contact saved");

        Ok(Reply::text(replies::contact_saved(&phone, &referral_code))
            .with_markup(ReplyMarkup::RemoveKeyboard))
    }

    async fn answer_text(&self, chat_id: i64, text: String) -> Result<Reply> {
        let annotation = self.ctx.annotation.annotate(&text).await;
        info!(chat_id, sentiment = %annotation.sentiment, "step: text annotated");

        let inbound = MessageRecord::user_text(
            chat_id,
            text,
            annotation.translated_text.clone(),
            annotation.sentiment,
        );
        self.ctx.store.insert_message(&inbound).await?;

        let generated = self
            .ctx
            .generation
            .complete_text(&annotation.translated_text)
            .await;

        let outbound = MessageRecord::generated_response(chat_id, generated.clone());
        self.ctx.store.insert_message(&outbound).await?;
        info!(chat_id, reply_len = generated.len(), "step: text answered");

        Ok(Reply::text(generated))
    }

    async fn describe_media(&self, chat_id: i64, media: MediaPayload) -> Result<Reply> {
        let mime_type = media.effective_mime_type();
        let description = match media.kind {
            MediaKind::Image => {
                self.ctx
                    .generation
                    .describe_image(&media.bytes, mime_type)
                    .await
            }
            MediaKind::Document => {
                self.ctx
                    .generation
                    .describe_document(&media.bytes, mime_type)
                    .await
            }
        };

        let record = FileRecord::new(chat_id, &media, description.clone());
        self.ctx.store.insert_file(&record).await?;
        info!(
            chat_id,
            media_kind = %media.kind,
            bytes = media.bytes.len(),
            "step: file described"
        );

        Ok(Reply::text(replies::file_analysis(
            &media.local_name(),
            &description,
        )))
    }

    async fn web_search(&self, chat_id: i64, query_terms: Vec<String>) -> Result<Reply> {
        let query = query_terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if query.is_empty() {
            return Ok(Reply::text(replies::SEARCH_USAGE));
        }

        let links = match self.ctx.search.search(&query).await {
            Ok(links) => links,
            Err(e) => {
                warn!(chat_id, error = %e, "Web search failed");
                return Ok(Reply::text(replies::SEARCH_FAILED));
            }
        };
        let summary = self.ctx.search.summarize(&query, &links).await;

        let record = SearchRecord::new(chat_id, query, summary, links);
        self.ctx.store.insert_search(&record).await?;
        info!(chat_id, links = record.links.len(), "step: search answered");

        Ok(replies::search_results(&record.summary, &record.links))
    }
}

fn store_failure(chain: &str, e: crate::DispatchError, message: &str) -> Reply {
    error!(chain, error = %e, "Processing chain aborted");
    Reply::text(message)
}
