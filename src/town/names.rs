use regex::Regex;

use crate::town::settings::{EmojiKind, TownSettings};

/// Discord refuses nicknames longer than this.
pub const MAX_NICKNAME_LENGTH: usize = 32;

pub const STORYTELLER_MARKER: &str = "!ST";

/// The player state shown in a nickname.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInfo {
    pub seat: Option<usize>,
    pub dead: bool,
    /// `None` while alive, otherwise the ghost votes left.
    pub num_votes: Option<u8>,
    pub traveling: bool,
}

/// The pieces a town nickname is made of.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub seat: String,
    pub dead: String,
    pub votes: String,
    pub traveling: String,
    pub nick: String,
}

/// What a nickname says about its owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedName {
    pub seat: Option<usize>,
    pub storyteller: bool,
    pub info: PlayerInfo,
    pub nick: String,
}

/// Builds and takes apart nicknames like `_03💀👻🚁 Ferris` with the emojis of a town.
#[derive(Debug, Clone)]
pub struct NameFormat {
    pattern: Regex,
    dead: String,
    vote: String,
    novote: String,
    traveling: String,
}

impl NameFormat {
    pub fn new(settings: &TownSettings) -> Self {
        let dead = settings.emoji(EmojiKind::Dead).to_string();
        let vote = settings.emoji(EmojiKind::Vote).to_string();
        let novote = settings.emoji(EmojiKind::NoVote).to_string();
        let traveling = settings.emoji(EmojiKind::Traveling).to_string();

        let pattern = format!(
            r"^(?:(?P<seat>_\d+)|(?P<st>{st}))?\s*(?P<dead>{dead})?(?P<votes>{novote}|(?:{vote})+)?(?P<traveling>{traveling})?\s*(?P<nick>.*)$",
            st = regex::escape(STORYTELLER_MARKER),
            dead = regex::escape(&dead),
            novote = regex::escape(&novote),
            vote = regex::escape(&vote),
            traveling = regex::escape(&traveling),
        );
        // everything user supplied is escaped, so the pattern is always valid
        let pattern = Regex::new(&pattern).unwrap();

        NameFormat {
            pattern,
            dead,
            vote,
            novote,
            traveling,
        }
    }

    /// The name someone had before the town decorated it.
    pub fn base_nick<'a>(&self, display_name: &'a str) -> &'a str {
        self.pattern
            .captures(display_name)
            .and_then(|captures| captures.name("nick"))
            .map(|nick| nick.as_str())
            .unwrap_or(display_name)
    }

    pub fn parse(&self, display_name: &str) -> ParsedName {
        let captures = match self.pattern.captures(display_name) {
            Some(captures) => captures,
            None => {
                return ParsedName {
                    nick: display_name.to_string(),
                    ..ParsedName::default()
                }
            }
        };
        let seat = captures
            .name("seat")
            .and_then(|seat| seat.as_str().trim_start_matches('_').parse().ok());
        let num_votes = captures.name("votes").map(|votes| {
            let votes = votes.as_str();
            if votes == self.novote {
                0
            } else {
                votes.matches(self.vote.as_str()).count().min(u8::MAX as usize) as u8
            }
        });
        ParsedName {
            seat,
            storyteller: captures.name("st").is_some(),
            info: PlayerInfo {
                seat,
                dead: captures.name("dead").is_some(),
                num_votes,
                traveling: captures.name("traveling").is_some(),
            },
            nick: captures
                .name("nick")
                .map(|nick| nick.as_str().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn parts(&self, info: &PlayerInfo, display_name: &str) -> NameParts {
        let seat = info.seat.map(|seat| format!("_{:02}", seat)).unwrap_or_default();
        let dead = if info.dead { self.dead.clone() } else { String::new() };
        let votes = match info.num_votes {
            Some(0) => self.novote.clone(),
            Some(n) => self.vote.repeat(n as usize),
            None => String::new(),
        };
        let traveling = if info.traveling {
            self.traveling.clone()
        } else {
            String::new()
        };
        NameParts {
            seat,
            dead,
            votes,
            traveling,
            nick: self.base_nick(display_name).to_string(),
        }
    }

    pub fn player_nickname(&self, info: &PlayerInfo, display_name: &str) -> String {
        let parts = self.parts(info, display_name);
        let prefix = format!("{}{}{}{} ", parts.seat, parts.dead, parts.votes, parts.traveling);
        fit(&prefix, &parts.nick)
    }

    pub fn storyteller_nickname(&self, display_name: &str) -> String {
        fit(&format!("{} ", STORYTELLER_MARKER), self.base_nick(display_name))
    }

    pub fn restored_nickname(&self, display_name: &str) -> String {
        fit("", self.base_nick(display_name))
    }
}

/// Joins the prefix and nick, shortening the nick to stay within the nickname limit.
fn fit(prefix: &str, nick: &str) -> String {
    let room = MAX_NICKNAME_LENGTH.saturating_sub(prefix.chars().count());
    let nick: String = nick.chars().take(room).collect();
    format!("{}{}", prefix, nick)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format() -> NameFormat {
        NameFormat::new(&TownSettings::default())
    }

    fn info(seat: usize) -> PlayerInfo {
        PlayerInfo {
            seat: Some(seat),
            ..PlayerInfo::default()
        }
    }

    #[test]
    fn fresh_players_get_a_seat() {
        assert_eq!(format().player_nickname(&info(3), "Ferris"), "_03 Ferris");
        assert_eq!(format().player_nickname(&info(12), "Ferris"), "_12 Ferris");
    }

    #[test]
    fn state_emojis_follow_the_seat() {
        let format = format();
        let mut info = info(1);
        info.dead = true;
        info.num_votes = Some(1);
        assert_eq!(format.player_nickname(&info, "_01 Ferris"), "_01💀👻 Ferris");
        info.num_votes = Some(0);
        assert_eq!(format.player_nickname(&info, "_01💀👻 Ferris"), "_01💀🚫 Ferris");
        info.traveling = true;
        info.num_votes = Some(2);
        assert_eq!(format.player_nickname(&info, "_01💀🚫 Ferris"), "_01💀👻👻🚁 Ferris");
    }

    #[test]
    fn decorations_are_stripped() {
        let format = format();
        assert_eq!(format.base_nick("_05💀🚫🚁 Crab Person"), "Crab Person");
        assert_eq!(format.base_nick("_05💀👻👻 Crab Person"), "Crab Person");
        assert_eq!(format.base_nick("!ST Crab Person"), "Crab Person");
        assert_eq!(format.base_nick("Crab Person"), "Crab Person");
        assert_eq!(format.restored_nickname("_11🚁 Crab"), "Crab");
    }

    #[test]
    fn nicknames_are_parsed() {
        let format = format();
        let parsed = format.parse("_07💀👻👻🚁 Crab Person");
        assert_eq!(parsed.seat, Some(7));
        assert!(!parsed.storyteller);
        assert!(parsed.info.dead);
        assert_eq!(parsed.info.num_votes, Some(2));
        assert!(parsed.info.traveling);
        assert_eq!(parsed.nick, "Crab Person");

        let parsed = format.parse("_02💀🚫 Ferris");
        assert_eq!(parsed.info.num_votes, Some(0));

        let parsed = format.parse("!ST Ferris");
        assert!(parsed.storyteller);
        assert_eq!(parsed.seat, None);
        assert_eq!(parsed.info, PlayerInfo::default());
    }

    #[test]
    fn storytellers_are_marked() {
        assert_eq!(format().storyteller_nickname("_02 Ferris"), "!ST Ferris");
    }

    #[test]
    fn custom_emojis_with_regex_characters() {
        let mut settings = TownSettings::default();
        settings.set_emoji(EmojiKind::Dead, "+").unwrap();
        settings.set_emoji(EmojiKind::Vote, "*").unwrap();
        let format = NameFormat::new(&settings);
        let info = PlayerInfo {
            seat: Some(4),
            dead: true,
            num_votes: Some(1),
            traveling: false,
        };
        let name = format.player_nickname(&info, "Ferris");
        assert_eq!(name, "_04+* Ferris");
        assert_eq!(format.base_nick(&name), "Ferris");
    }

    #[test]
    fn long_names_are_shortened() {
        let name = "A".repeat(40);
        let nickname = format().player_nickname(&info(1), &name);
        assert_eq!(nickname.chars().count(), MAX_NICKNAME_LENGTH);
        assert!(nickname.starts_with("_01 AAAA"));
    }
}
