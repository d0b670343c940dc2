use anyhow::{Error, Result};
use log::error;
use poise::FrameworkContext;
use serenity::all::{Context as SerenityContext, FullEvent, Message};
use statcord_storage::{AttachmentRef, InboundMessage};
use statcord_utils::time::to_utc;

use crate::bot::Data;

pub async fn event_handler(
    _ctx: &SerenityContext,
    event: &FullEvent,
    _framework: FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<()> {
    if let FullEvent::Message { new_message } = event {
        if let Err(why) = data.tracker().on_message(&inbound(new_message)).await {
            error!("Failed to track message {}: {why}", new_message.id);
        }
    }

    Ok(())
}

fn inbound(message: &Message) -> InboundMessage {
    InboundMessage {
        id: message.id.get(),
        author_id: message.author.id.get(),
        author_is_bot: message.author.bot,
        channel_id: message.channel_id.get(),
        guild_id: message.guild_id.map(|id| id.get()),
        created_at: to_utc(message.timestamp),
        content: message.content.clone(),
        attachments: message
            .attachments
            .iter()
            .map(|attachment| AttachmentRef {
                filename: attachment.filename.clone(),
                url: attachment.url.clone(),
            })
            .collect(),
    }
}
