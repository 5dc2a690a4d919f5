use log::{debug, warn};
use twilight_model::id::marker::{GuildMarker, RoleMarker, UserMarker};
use twilight_model::id::Id;

use super::CommandContext;
use crate::error::{CommandError, TownError};
use crate::town::{RoleKind, Town};

impl CommandContext {
    /// Runs a closure on the town of the category the command came from.
    pub async fn with_town<F, R>(&self, action: F) -> Result<R, CommandError>
    where
        F: FnOnce(&mut Town) -> R,
    {
        let category = self.get_category()?;
        Ok(self.bot_context.with_town(category, action).await?)
    }

    pub async fn try_with_town<F, R>(&self, action: F) -> Result<R, CommandError>
    where
        F: FnOnce(&mut Town) -> Result<R, TownError>,
    {
        Ok(self.with_town(action).await??)
    }

    /// Brings the nicknames of these members in line with their place in the town.
    pub async fn sync_nicknames(&self, users: &[Id<UserMarker>]) -> Result<(), CommandError> {
        if users.is_empty() {
            return Ok(());
        }
        let current: Vec<(Id<UserMarker>, String)> =
            users.iter().map(|user| (*user, self.display_name(*user))).collect();
        let changes = self
            .with_town(move |town| {
                current
                    .into_iter()
                    .map(|(user, display_name)| {
                        let nickname = town.nickname_for(user, &display_name);
                        (user, display_name, nickname)
                    })
                    .collect::<Vec<_>>()
            })
            .await?;
        self.apply_nicknames(changes).await
    }

    /// Sets nicknames, skipping those that wouldn't change. Discord refusing one isn't an error.
    pub async fn apply_nicknames(&self, changes: Vec<(Id<UserMarker>, String, String)>) -> Result<(), CommandError> {
        let guild_id = self.get_guild_id()?;
        for (user, current, nickname) in changes {
            if current == nickname {
                continue;
            }
            let nick = if nickname.is_empty() { None } else { Some(nickname.as_str()) };
            let request = match self.bot_context.http.update_guild_member(guild_id, user).nick(nick) {
                Ok(request) => request,
                Err(e) => {
                    debug!("Nickname {:?} for {} is not valid: {}", nickname, user, e);
                    continue;
                }
            };
            if let Err(e) = request.await {
                debug!("Unable to change the nickname of {} to {:?}: {}", user, nickname, e);
            }
        }
        Ok(())
    }

    /// Hands out the town role of this kind, if the town has one.
    pub async fn add_town_role(&self, user: Id<UserMarker>, kind: RoleKind) -> Result<(), CommandError> {
        let guild_id = self.get_guild_id()?;
        if let Some(role) = self.with_town(|town| town.role(kind)).await? {
            self.set_role(guild_id, user, role, true).await;
        }
        Ok(())
    }

    pub async fn remove_town_role(&self, user: Id<UserMarker>, kind: RoleKind) -> Result<(), CommandError> {
        let guild_id = self.get_guild_id()?;
        if let Some(role) = self.with_town(|town| town.role(kind)).await? {
            self.set_role(guild_id, user, role, false).await;
        }
        Ok(())
    }

    pub async fn set_role(&self, guild_id: Id<GuildMarker>, user: Id<UserMarker>, role: Id<RoleMarker>, add: bool) {
        let http = &self.bot_context.http;
        let result = if add {
            http.add_guild_member_role(guild_id, user, role).await
        } else {
            http.remove_guild_member_role(guild_id, user, role).await
        };
        if let Err(e) = result {
            warn!("Unable to update role {} for {} in {}: {}", role, user, guild_id, e);
        }
    }
}
