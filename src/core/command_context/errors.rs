use twilight_model::id::marker::{ChannelMarker, GuildMarker, UserMarker};
use twilight_model::id::Id;

use crate::core::BotContext;
use crate::error::{CommandError, SettingError, TownError};
use crate::town::{EmojiKind, NameFormat, RoleKind, SettingKey};
use crate::translation::{FluArgs, TownString, Translations, DEFAULT_LANG};
use crate::utils::{escape_markdown, Emoji};

/// The reply for a failed command.
///
/// `player_name` is only used when the error is about someone who isn't playing.
pub fn render_error(
    translations: &Translations,
    prefix: &str,
    command: &str,
    error: &CommandError,
    player_name: &str,
) -> String {
    let no = Emoji::No.for_chat();
    let (key, args) = match error {
        CommandError::NoDM => (TownString::NoDm, FluArgs::with_capacity(1).insert("no", no)),
        CommandError::InvalidPermissions => (
            TownString::MissingPermissions,
            FluArgs::with_capacity(1).insert("no", no),
        ),
        CommandError::ParseError(e) => (
            TownString::ParseError,
            FluArgs::with_capacity(4)
                .insert("no", no)
                .insert("error", e.to_string())
                .insert("prefix", prefix)
                .insert("command", command),
        ),
        CommandError::Town(e) => town_error(e, prefix, player_name),
        CommandError::OtherFailure(_) => (
            TownString::UnexpectedError,
            FluArgs::with_capacity(1).insert("bug", Emoji::Bug.for_chat()),
        ),
    };
    translations.get_text_with_args(&DEFAULT_LANG, key, &args.generate())
}

fn town_error<'a>(error: &'a TownError, prefix: &'a str, player_name: &str) -> (TownString, FluArgs<'a>) {
    let no = Emoji::No.for_chat();
    let plain = |key| (key, FluArgs::with_capacity(0));
    let with_prefix = |key| (key, FluArgs::with_capacity(1).insert("prefix", prefix));
    match error {
        TownError::BadPlayer(_) => (
            TownString::BadPlayer,
            FluArgs::with_capacity(1).insert("name", escape_markdown(player_name)),
        ),
        TownError::BadSeat => plain(TownString::BadSeat),
        TownError::BadSidebar => plain(TownString::BadSidebar),
        TownError::Locked => with_prefix(TownString::TownLocked),
        TownError::Unlocked => with_prefix(TownString::TownUnlocked),
        TownError::NominationInProgress => with_prefix(TownString::NominationInProgress),
        TownError::NoNomination => plain(TownString::NoNomination),
        TownError::NoNominationToCancel => plain(TownString::NoNominationToCancel),
        TownError::NotEnoughPlayers => plain(TownString::NotEnoughPlayers),
        TownError::InvalidVoteCount(votes) => (
            TownString::InvalidVoteCount,
            FluArgs::with_capacity(1).insert("votes", votes.to_string()),
        ),
        TownError::EmptyStatement => with_prefix(TownString::EmptyStatement),
        TownError::NotInVoice => plain(TownString::NotInVoice),
        TownError::NoCategory => (TownString::NotInCategory, FluArgs::with_capacity(1).insert("no", no)),
        TownError::Setting(e) => setting_error(e),
    }
}

fn setting_error(error: &SettingError) -> (TownString, FluArgs<'_>) {
    let no = Emoji::No.for_chat();
    let unknown = |key: &str, keys: String| {
        (
            TownString::UnknownSettingKey,
            FluArgs::with_capacity(3)
                .insert("no", no)
                .insert("key", escape_markdown(key))
                .insert("keys", keys),
        )
    };
    match error {
        SettingError::UnknownKey(key) => unknown(key, SettingKey::list()),
        SettingError::UnknownEmojiKey(key) => unknown(key, key_list(EmojiKind::ALL.iter().map(|kind| kind.key()))),
        SettingError::UnknownRoleKey(key) => unknown(key, key_list(RoleKind::ALL.iter().map(|kind| kind.key()))),
        other => (
            TownString::SettingError,
            FluArgs::with_capacity(2).insert("no", no).insert("error", other.to_string()),
        ),
    }
}

fn key_list<'a>(keys: impl Iterator<Item = &'a str>) -> String {
    keys.map(|key| format!("`{}`", key)).collect::<Vec<_>>().join(", ")
}

/// How someone's name shows up in errors, without any town decoration.
pub(super) async fn player_name(
    ctx: &BotContext,
    guild_id: Option<Id<GuildMarker>>,
    category: Option<Id<ChannelMarker>>,
    user_id: Id<UserMarker>,
) -> String {
    let display_name = ctx.display_name(guild_id, user_id);
    let settings = match category {
        Some(category) => ctx.get_town_settings(category).await.unwrap_or_default(),
        None => Default::default(),
    };
    NameFormat::new(&settings).base_nick(&display_name).to_string()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::error::{OtherFailure, ParseError};
    use crate::translation::load_translations_from;

    fn render(error: CommandError) -> String {
        let translations = load_translations_from(&Path::new(env!("CARGO_MANIFEST_DIR")).join("lang")).unwrap();
        render_error(&translations, ".", "nominate votes", &error, "Crab_Person")
    }

    #[test]
    fn town_errors_point_at_the_fix() {
        assert_eq!(
            render(TownError::Locked.into()),
            "Before I'll allow that, you'll need to put the town into a deep and dreamless slumber. [`.unlock` first]"
        );
        assert_eq!(
            render(TownError::InvalidVoteCount(25).into()),
            "Number of votes must be in [0, 20], 25 doesn't fit."
        );
        assert_eq!(
            render(TownError::BadPlayer(Id::new(1)).into()),
            "This game isn't meant for Crab\\_Person."
        );
    }

    #[test]
    fn parse_errors_link_to_help() {
        assert_eq!(
            render(ParseError::MissingArgument.into()),
            "❌ Something went wrong trying to parse that: missing one or more required arguments. [`.help nominate votes`]"
        );
    }

    #[test]
    fn unknown_keys_list_the_known_ones() {
        let reply = render(SettingError::UnknownEmojiKey(String::from("alive")).into());
        assert_eq!(
            reply,
            "❌ `alive` isn't a setting I know. Must be one of `dead`, `vote`, `novote`, `traveling`."
        );
        let reply = render(SettingError::UnknownKey(String::from("prefix")).into());
        assert!(reply.contains("`is_enabled`, `role.player`"));
    }

    #[test]
    fn refused_requests_become_failures() {
        let message: CommandError = twilight_validate::message::content("a".repeat(2001)).unwrap_err().into();
        assert!(matches!(message, CommandError::OtherFailure(OtherFailure::InvalidMessage(_))));
        let nick: CommandError = twilight_validate::request::nickname("a".repeat(33)).unwrap_err().into();
        assert!(matches!(nick, CommandError::OtherFailure(OtherFailure::InvalidRequest(_))));
        let channel: CommandError = twilight_validate::channel::name("").unwrap_err().into();
        assert!(matches!(channel, CommandError::OtherFailure(OtherFailure::InvalidChannel(_))));
        assert!(render(channel).starts_with("🐛"));
    }

    #[test]
    fn failures_are_not_explained() {
        let reply = render(OtherFailure::CorruptCache(String::from("no guild")).into());
        assert!(reply.starts_with("🐛"));
        assert!(!reply.contains("no guild"));
    }
}
