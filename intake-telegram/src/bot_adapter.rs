//! Wraps teloxide::Bot and implements [`intake_core::Bot`]. Production code sends replies via
//! Telegram; tests can substitute another Bot impl.

use async_trait::async_trait;
use intake_core::{Bot as CoreBot, IntakeError, Reply, ReplyFormat, ReplyMarkup, Result};
use teloxide::{
    prelude::*,
    types::{
        ButtonRequest, ChatId, KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode,
        ReplyMarkup as TelegramMarkup,
    },
};
use tracing::warn;

pub const CONTACT_BUTTON_TEXT: &str = "Share Contact";

/// Thin wrapper around teloxide::Bot that implements intake-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }

    async fn send(
        &self,
        chat_id: i64,
        text: String,
        parse_mode: Option<ParseMode>,
        markup: Option<TelegramMarkup>,
    ) -> std::result::Result<(), teloxide::RequestError> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(mode) = parse_mode {
            request = request.parse_mode(mode);
        }
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }
        request.await?;
        Ok(())
    }
}

fn telegram_markup(markup: ReplyMarkup) -> Option<TelegramMarkup> {
    match markup {
        ReplyMarkup::None => None,
        ReplyMarkup::RequestContact => Some(TelegramMarkup::Keyboard(KeyboardMarkup::new(vec![
            vec![KeyboardButton::new(CONTACT_BUTTON_TEXT).request(ButtonRequest::Contact)],
        ]))),
        ReplyMarkup::RemoveKeyboard => Some(TelegramMarkup::KeyboardRemove(KeyboardRemove::new())),
    }
}

/// Plain-text rendering of a reply written for HTML parse mode: tags removed, entities decoded.
pub fn html_to_plain(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    /// HTML replies are sent with parse mode HTML; if Telegram rejects them they are resent
    /// once as plain text.
    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<()> {
        let markup = telegram_markup(reply.markup);
        match reply.format {
            ReplyFormat::Plain => self
                .send(chat_id, reply.text.clone(), None, markup)
                .await
                .map_err(|e| IntakeError::Bot(e.to_string())),
            ReplyFormat::Html => {
                let html = self
                    .send(chat_id, reply.text.clone(), Some(ParseMode::Html), markup.clone())
                    .await;
                match html {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        warn!(chat_id, error = %e, "telegram HTML send failed, retrying as plain text");
                        self.send(chat_id, html_to_plain(&reply.text), None, markup)
                            .await
                            .map_err(|e| IntakeError::Bot(e.to_string()))
                    }
                }
            }
        }
    }
}
