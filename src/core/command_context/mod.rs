use std::sync::Arc;

use fluent_bundle::FluentArgs;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker, UserMarker};
use twilight_model::id::Id;
use twilight_model::user::{CurrentUser, User};

use super::bot_context::BotContext;
use crate::error::{CommandError, TownError};
use crate::parser::Parser;
use crate::translation::{TownString, DEFAULT_LANG};

mod errors;
mod execution;
mod members;
mod messaging;
mod permissions;
mod town;

pub struct CommandMessage {
    pub id: Id<MessageMarker>,
    pub channel_id: Id<ChannelMarker>,
    pub guild_id: Option<Id<GuildMarker>>,
    pub author: User,
    pub content: String,
}

/// Everything a command handler gets to work with.
pub struct CommandContext {
    pub bot_context: Arc<BotContext>,
    pub message: CommandMessage,
    pub parser: Parser,
    /// Names of the command nodes that were matched, e.g. `nominate votes`.
    pub command_path: String,
}

impl CommandContext {
    pub fn new(ctx: Arc<BotContext>, message: CommandMessage, parser: Parser, command_path: String) -> Self {
        CommandContext {
            bot_context: ctx,
            message,
            parser,
            command_path,
        }
    }

    pub fn get_bot_user(&self) -> &CurrentUser {
        &self.bot_context.bot_user
    }

    pub fn author_id(&self) -> Id<UserMarker> {
        self.message.author.id
    }

    pub fn prefix(&self) -> &str {
        &self.bot_context.config.prefix
    }

    pub fn translate(&self, key: TownString) -> String {
        self.bot_context.translations.get_text_plain(&DEFAULT_LANG, key)
    }

    pub fn translate_with_args(&self, key: TownString, args: &FluentArgs<'_>) -> String {
        self.bot_context.translations.get_text_with_args(&DEFAULT_LANG, key, args)
    }

    pub fn get_guild_id(&self) -> Result<Id<GuildMarker>, CommandError> {
        self.message.guild_id.ok_or(CommandError::NoDM)
    }

    /// The category the command was used in.
    pub fn get_category(&self) -> Result<Id<ChannelMarker>, CommandError> {
        self.category_of(self.message.channel_id)
            .ok_or_else(|| CommandError::Town(TownError::NoCategory))
    }

    fn category_of(&self, channel_id: Id<ChannelMarker>) -> Option<Id<ChannelMarker>> {
        self.bot_context
            .cache
            .channel(channel_id)
            .and_then(|channel| channel.parent_id)
    }
}
