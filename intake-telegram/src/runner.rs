//! REPL runner: classifies each teloxide message, downloads media, dispatches the event and
//! sends its reply. The REPL handles updates of one chat in order and different chats
//! concurrently, so a chat's events never overlap.

use anyhow::Result;
use dispatcher::{replies, Dispatcher};
use intake_core::{Bot as CoreBot, InboundEvent, Reply};
use teloxide::prelude::*;
use tracing::{error, info, instrument, warn};

use crate::adapters::{classify_message, ClassifiedMessage};
use crate::bot_adapter::TelegramBotAdapter;
use crate::download::download_file;

/// Starts the REPL with the given teloxide Bot and dispatcher. Calls get_me() first so the bot
/// identity shows up in the logs; returns when the REPL stops.
#[instrument(skip(bot, dispatcher))]
pub async fn run_repl(bot: teloxide::Bot, dispatcher: Dispatcher) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(
            username = me.user.username.as_deref().unwrap_or(""),
            "Bot identity resolved, starting repl"
        ),
        Err(e) => warn!(error = %e, "get_me failed, starting repl anyway"),
    }

    teloxide::repl(bot, move |bot: teloxide::Bot, msg: Message| {
        let dispatcher = dispatcher.clone();
        async move {
            let sender = TelegramBotAdapter::new(bot);
            handle_message(&sender, &dispatcher, &msg).await;
            respond(())
        }
    })
    .await;

    Ok(())
}

/// Classifies, dispatches and answers one message. Errors are logged, never returned.
pub async fn handle_message(sender: &TelegramBotAdapter, dispatcher: &Dispatcher, msg: &Message) {
    let chat_id = msg.chat.id.0;

    let event = match classify_message(msg) {
        ClassifiedMessage::Ready(event) => event,
        ClassifiedMessage::Media { chat_id, media } => {
            match download_file(sender.inner(), &media.file_id).await {
                Ok(bytes) => InboundEvent::MediaMessage {
                    chat_id,
                    media: media.with_bytes(bytes),
                },
                Err(e) => {
                    warn!(chat_id, file_id = %media.file_id, error = %e, "Media download failed");
                    deliver(sender, chat_id, &Reply::text(replies::FILE_ERROR)).await;
                    return;
                }
            }
        }
    };

    info!(
        chat_id,
        message_id = msg.id.0,
        event = event.kind(),
        "step: processing message"
    );

    if let Some(reply) = dispatcher.dispatch(event).await {
        deliver(sender, chat_id, &reply).await;
    }
}

async fn deliver(sender: &dyn CoreBot, chat_id: i64, reply: &Reply) {
    if let Err(e) = sender.send_reply(chat_id, reply).await {
        error!(chat_id, error = %e, "Failed to send reply");
    }
}
