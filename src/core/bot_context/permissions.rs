use log::debug;
use twilight_model::guild::Permissions;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, RoleMarker, UserMarker};
use twilight_model::id::Id;

use super::BotContext;

impl BotContext {
    /// Guild wide permissions, owners and admins get everything.
    pub fn get_guild_permissions_for(&self, guild_id: Id<GuildMarker>, user_id: Id<UserMarker>) -> Permissions {
        match self.cache.permissions().root(user_id, guild_id) {
            Ok(permissions) => permissions,
            Err(e) => {
                debug!("No guild permissions for {} in {}: {}", user_id, guild_id, e);
                Permissions::empty()
            }
        }
    }

    /// Permissions in a channel, including the overwrites of the channel and its category.
    pub fn get_channel_permissions_for(&self, channel_id: Id<ChannelMarker>, user_id: Id<UserMarker>) -> Permissions {
        match self.cache.permissions().in_channel(user_id, channel_id) {
            Ok(permissions) => permissions,
            Err(e) => {
                debug!("No channel permissions for {} in {}: {}", user_id, channel_id, e);
                Permissions::empty()
            }
        }
    }

    pub fn member_roles(&self, guild_id: Id<GuildMarker>, user_id: Id<UserMarker>) -> Vec<Id<RoleMarker>> {
        self.cache
            .member(guild_id, user_id)
            .map(|member| member.roles().to_vec())
            .unwrap_or_default()
    }
}
