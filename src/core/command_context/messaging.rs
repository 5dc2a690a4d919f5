use std::time::Duration;

use fluent_bundle::FluentArgs;
use log::debug;
use twilight_http::request::channel::reaction::RequestReactionType;
use twilight_model::channel::message::Embed;
use twilight_model::channel::Message;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};
use twilight_model::id::Id;

use super::CommandContext;
use crate::core::BotContext;
use crate::error::CommandError;
use crate::translation::TownString;
use crate::utils::Emoji;

impl CommandContext {
    pub async fn reply(&self, key: TownString, args: FluentArgs<'_>) -> Result<Message, CommandError> {
        let translated = self.translate_with_args(key, &args);
        self.reply_raw(&translated).await
    }

    pub async fn reply_raw(&self, message: &str) -> Result<Message, CommandError> {
        let sent = self
            .bot_context
            .http
            .create_message(self.message.channel_id)
            .content(message)?
            .await?
            .model()
            .await?;
        Ok(sent)
    }

    pub async fn reply_embed(&self, embed: Embed) -> Result<Message, CommandError> {
        let sent = self
            .bot_context
            .http
            .create_message(self.message.channel_id)
            .embeds(&[embed])?
            .await?
            .model()
            .await?;
        Ok(sent)
    }

    pub async fn reply_with_embed(&self, message: &str, embed: Embed) -> Result<Message, CommandError> {
        let sent = self
            .bot_context
            .http
            .create_message(self.message.channel_id)
            .content(message)?
            .embeds(&[embed])?
            .await?
            .model()
            .await?;
        Ok(sent)
    }

    /// Marks the invoking message as done.
    pub async fn acknowledge(&self) -> Result<(), CommandError> {
        self.react(self.message.channel_id, self.message.id, Emoji::Yes.for_chat())
            .await
    }

    pub async fn react(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
        emoji: &str,
    ) -> Result<(), CommandError> {
        self.bot_context
            .http
            .create_reaction(channel_id, message_id, &RequestReactionType::Unicode { name: emoji })
            .await?;
        Ok(())
    }

    pub async fn delete_message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Result<(), CommandError> {
        self.bot_context.http.delete_message(channel_id, message_id).await?;
        Ok(())
    }
}

impl BotContext {
    /// Deletes a message after a while without holding up the caller.
    pub fn delete_message_later(
        self: &std::sync::Arc<Self>,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
        delay: Duration,
    ) {
        let ctx = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = ctx.http.delete_message(channel_id, message_id).await {
                debug!("Failed to clean up message {} in {}: {}", message_id, channel_id, e);
            }
        });
    }
}
