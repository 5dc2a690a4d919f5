use twilight_model::id::marker::{GuildMarker, UserMarker};
use twilight_model::id::Id;

use super::BotContext;
use crate::error::ParseError;
use crate::town::NameFormat;
use crate::utils::matchers;

const CDN_URL: &str = "https://cdn.discordapp.com";

/// Whether a typed name points at this member.
///
/// Accepts `name#discriminator`, the username, the nickname, or the nickname without any town decoration.
pub fn name_matches(name: &str, nick: Option<&str>, username: &str, discriminator: u16, format: &NameFormat) -> bool {
    if let Some((user, discrim)) = matchers::split_name(name) {
        if user == username && discrim.parse::<u16>().ok() == Some(discriminator) {
            return true;
        }
    }
    if name == username {
        return true;
    }
    match nick {
        Some(nick) => name == nick || name == format.base_nick(nick),
        None => false,
    }
}

impl BotContext {
    /// The nickname of a member, or their username outside of guilds.
    pub fn display_name(&self, guild_id: Option<Id<GuildMarker>>, user_id: Id<UserMarker>) -> String {
        let nick = guild_id
            .and_then(|guild_id| self.cache.member(guild_id, user_id))
            .and_then(|member| member.nick().map(String::from));
        if let Some(nick) = nick {
            return nick;
        }
        match self.cache.user(user_id) {
            Some(user) => user.name.clone(),
            None => user_id.to_string(),
        }
    }

    pub fn avatar_url(&self, user_id: Id<UserMarker>) -> String {
        match self.cache.user(user_id) {
            Some(user) => match &user.avatar {
                Some(hash) => format!("{}/avatars/{}/{}.png", CDN_URL, user_id, hash),
                None => format!("{}/embed/avatars/{}.png", CDN_URL, user.discriminator % 5),
            },
            None => format!("{}/embed/avatars/0.png", CDN_URL),
        }
    }

    /// Looks up a member by exact name.
    pub fn find_member_by_name(
        &self,
        guild_id: Id<GuildMarker>,
        name: &str,
        format: &NameFormat,
    ) -> Result<Id<UserMarker>, ParseError> {
        let members: Vec<Id<UserMarker>> = match self.cache.guild_members(guild_id) {
            Some(members) => members.iter().copied().collect(),
            None => vec![],
        };

        let mut found = members.into_iter().filter(|user_id| {
            let nick = self
                .cache
                .member(guild_id, *user_id)
                .and_then(|member| member.nick().map(String::from));
            match self.cache.user(*user_id) {
                Some(user) => name_matches(name, nick.as_deref(), &user.name, user.discriminator, format),
                None => false,
            }
        });

        match (found.next(), found.next()) {
            (Some(user_id), None) => Ok(user_id),
            (Some(_), Some(_)) => Err(ParseError::MultipleMembersByName(name.to_string())),
            (None, _) => Err(ParseError::MemberNotFoundByName(name.to_string())),
        }
    }

    pub fn is_guild_member(&self, guild_id: Id<GuildMarker>, user_id: Id<UserMarker>) -> bool {
        self.cache.member(guild_id, user_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::town::TownSettings;

    fn format() -> NameFormat {
        NameFormat::new(&TownSettings::default())
    }

    #[test]
    fn tags_and_usernames_match() {
        let format = format();
        assert!(name_matches("ferris#0042", None, "ferris", 42, &format));
        assert!(!name_matches("ferris#0043", None, "ferris", 42, &format));
        assert!(name_matches("ferris", Some("Crab"), "ferris", 42, &format));
        assert!(!name_matches("Ferris", None, "ferris", 42, &format));
    }

    #[test]
    fn decorated_nicknames_match_their_base() {
        let format = format();
        assert!(name_matches("Crab", Some("_03💀👻 Crab"), "ferris", 1, &format));
        assert!(name_matches("_03💀👻 Crab", Some("_03💀👻 Crab"), "ferris", 1, &format));
        assert!(name_matches("Crab", Some("!ST Crab"), "ferris", 1, &format));
        assert!(!name_matches("Cra", Some("Crab"), "ferris", 1, &format));
    }
}
