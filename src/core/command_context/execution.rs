use std::time::Duration;

use log::debug;

use super::errors::{player_name, render_error};
use super::CommandContext;
use crate::clocktower_error;
use crate::commands::meta::nodes::{CommandFlags, CommandNode};
use crate::error::{CommandError, EventHandlerError, TownError};

impl CommandContext {
    /// Runs a command after checking its requirements, then cleans up after it.
    pub async fn execute(self, node: &CommandNode) -> Result<(), EventHandlerError> {
        let bot_context = self.bot_context.clone();
        let channel_id = self.message.channel_id;
        let message_id = self.message.id;
        let guild_id = self.message.guild_id;
        let category = self.category_of(channel_id);
        let command_path = self.command_path.clone();

        let allowed = self.check_requirements(node.flags).await;
        let result = match allowed {
            Ok(false) => return Ok(()),
            Ok(true) => {
                debug!("Executing command {} for {}", command_path, self.message.author.name);
                (node.handler)(self).await
            }
            Err(e) => Err(e),
        };

        let messages = &bot_context.config.messages;
        let error = match result {
            Ok(()) => {
                if node.flags.contains(CommandFlags::DELETE_IMMEDIATELY) {
                    bot_context.delete_message_later(channel_id, message_id, Duration::from_secs(0));
                } else if node.flags.contains(CommandFlags::DELETE_INVOCATION) {
                    bot_context.delete_message_later(channel_id, message_id, messages.command_delay());
                }
                return Ok(());
            }
            Err(e) => e,
        };

        if let CommandError::OtherFailure(failure) = &error {
            clocktower_error!("Command {} failed: {}", command_path, failure);
        }
        let name = match &error {
            CommandError::Town(TownError::BadPlayer(user_id)) => {
                player_name(&bot_context, guild_id, category, *user_id).await
            }
            _ => String::new(),
        };
        let reply = render_error(
            &bot_context.translations,
            &bot_context.config.prefix,
            &command_path,
            &error,
            &name,
        );

        let request = match bot_context.http.create_message(channel_id).content(&reply) {
            Ok(request) => request,
            Err(e) => {
                clocktower_error!("Error reply for {} can't be sent: {}", command_path, e);
                return Ok(());
            }
        };
        let sent = request.await?;
        match sent.model().await {
            Ok(sent) => bot_context.delete_message_later(channel_id, sent.id, messages.error_delay()),
            Err(e) => debug!("Unable to read the error reply that was sent: {}", e),
        }
        bot_context.delete_message_later(channel_id, message_id, messages.error_delay());

        Ok(())
    }
}
