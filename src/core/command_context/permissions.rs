use log::debug;
use twilight_model::guild::Permissions;
use twilight_model::id::marker::{ChannelMarker, RoleMarker};
use twilight_model::id::Id;

use super::CommandContext;
use crate::commands::meta::nodes::CommandFlags;
use crate::error::{CommandError, TownError};
use crate::town::RoleKind;

/// Town commands only apply inside a category with an enabled town.
fn town_applies(category: Option<Id<ChannelMarker>>, enabled: bool) -> bool {
    category.is_some() && enabled
}

/// Admins can always storytell, everyone else needs the storyteller role when the town has one.
fn storyteller_allowed(is_admin: bool, required: Option<Id<RoleMarker>>, roles: &[Id<RoleMarker>]) -> bool {
    if is_admin {
        return true;
    }
    match required {
        Some(role) => roles.contains(&role),
        None => true,
    }
}

fn check_lock(flags: CommandFlags, locked: bool) -> Result<(), TownError> {
    if flags.contains(CommandFlags::LOCKED_TOWN) && !locked {
        return Err(TownError::Unlocked);
    }
    if flags.contains(CommandFlags::UNLOCKED_TOWN) && locked {
        return Err(TownError::Locked);
    }
    Ok(())
}

impl CommandContext {
    pub fn get_author_guild_permissions(&self) -> Permissions {
        match self.message.guild_id {
            Some(guild_id) => self
                .bot_context
                .get_guild_permissions_for(guild_id, self.author_id()),
            None => Permissions::empty(),
        }
    }

    /// Permissions of the author in the channel the command was sent in.
    pub fn get_author_channel_permissions(&self) -> Permissions {
        self.bot_context
            .get_channel_permissions_for(self.message.channel_id, self.author_id())
    }

    pub async fn is_storyteller_allowed(&self) -> Result<bool, CommandError> {
        let is_admin = self.get_author_guild_permissions().contains(Permissions::ADMINISTRATOR);
        if is_admin {
            return Ok(true);
        }
        let guild_id = self.get_guild_id()?;
        let category = self.get_category()?;
        let required = self
            .bot_context
            .with_town(category, |town| town.role(RoleKind::Storyteller))
            .await?;
        let roles = self.bot_context.member_roles(guild_id, self.author_id());
        Ok(storyteller_allowed(is_admin, required, &roles))
    }

    /// Checks everything the flags of a command demand.
    ///
    /// `Ok(false)` means the command doesn't apply here and should be ignored without a reply.
    pub async fn check_requirements(&self, flags: CommandFlags) -> Result<bool, CommandError> {
        if flags.contains(CommandFlags::GUILD_ONLY) {
            self.get_guild_id()?;
        }

        if flags.contains(CommandFlags::TOWN_CATEGORY) {
            let category = self.category_of(self.message.channel_id);
            let enabled = match category {
                Some(category) => self.bot_context.get_town_settings(category).await?.is_enabled(),
                None => false,
            };
            if !town_applies(category, enabled) {
                debug!("Ignoring {} outside of an enabled town", self.command_path);
                return Ok(false);
            }
        }

        if flags.contains(CommandFlags::MANAGE_CHANNELS)
            && !self.get_author_channel_permissions().contains(Permissions::MANAGE_CHANNELS)
        {
            return Err(CommandError::InvalidPermissions);
        }

        if flags.contains(CommandFlags::STORYTELLER) && !self.is_storyteller_allowed().await? {
            return Err(CommandError::InvalidPermissions);
        }

        if flags.intersects(CommandFlags::LOCKED_TOWN | CommandFlags::UNLOCKED_TOWN) {
            let category = self.get_category()?;
            let locked = self.bot_context.with_town(category, |town| town.is_locked()).await?;
            check_lock(flags, locked)?;
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: u64) -> Id<RoleMarker> {
        Id::new(id)
    }

    #[test]
    fn admins_always_storytell() {
        assert!(storyteller_allowed(true, Some(role(5)), &[]));
        assert!(storyteller_allowed(true, None, &[]));
    }

    #[test]
    fn storyteller_role_is_required_when_configured() {
        assert!(!storyteller_allowed(false, Some(role(5)), &[]));
        assert!(!storyteller_allowed(false, Some(role(5)), &[role(6), role(7)]));
        assert!(storyteller_allowed(false, Some(role(5)), &[role(6), role(5)]));
    }

    #[test]
    fn anyone_storytells_without_a_role() {
        assert!(storyteller_allowed(false, None, &[]));
        assert!(storyteller_allowed(false, None, &[role(6)]));
    }

    #[test]
    fn lock_state_must_match() {
        assert!(matches!(check_lock(CommandFlags::LOCKED_TOWN, false), Err(TownError::Unlocked)));
        assert!(matches!(check_lock(CommandFlags::UNLOCKED_TOWN, true), Err(TownError::Locked)));
        assert!(check_lock(CommandFlags::LOCKED_TOWN, true).is_ok());
        assert!(check_lock(CommandFlags::UNLOCKED_TOWN, false).is_ok());
        assert!(check_lock(CommandFlags::GUILD_ONLY, true).is_ok());
        assert!(check_lock(CommandFlags::GUILD_ONLY, false).is_ok());
    }

    #[test]
    fn commands_are_silent_outside_enabled_towns() {
        let category = Some(Id::<ChannelMarker>::new(10));
        assert!(town_applies(category, true));
        assert!(!town_applies(category, false));
        assert!(!town_applies(None, false));
    }
}
