use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use twilight_model::id::marker::RoleMarker;
use twilight_model::id::Id;

use crate::error::SettingError;
use crate::utils::matchers;

/// The Discord roles a town can hand out during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Player,
    Traveler,
    Storyteller,
}

impl RoleKind {
    pub const ALL: [RoleKind; 3] = [RoleKind::Player, RoleKind::Traveler, RoleKind::Storyteller];

    pub fn key(self) -> &'static str {
        match self {
            RoleKind::Player => "player",
            RoleKind::Traveler => "traveler",
            RoleKind::Storyteller => "storyteller",
        }
    }

    /// Prefix for the name of roles created for a town, e.g. "Playing Ravenswood Bluff".
    pub fn name_prefix(self) -> &'static str {
        match self {
            RoleKind::Player => "Playing",
            RoleKind::Traveler => "Traveling",
            RoleKind::Storyteller => "Storytelling",
        }
    }

    pub fn color(self) -> u32 {
        match self {
            RoleKind::Player => 0x2e_cc71,
            RoleKind::Traveler => 0xf1_c40f,
            RoleKind::Storyteller => 0xe9_1e63,
        }
    }

    pub fn from_key(key: &str) -> Result<Self, SettingError> {
        RoleKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| SettingError::UnknownRoleKey(key.to_string()))
    }
}

/// The emojis used to mark player state in nicknames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiKind {
    Dead,
    Vote,
    NoVote,
    Traveling,
}

impl EmojiKind {
    pub const ALL: [EmojiKind; 4] = [EmojiKind::Dead, EmojiKind::Vote, EmojiKind::NoVote, EmojiKind::Traveling];

    pub fn key(self) -> &'static str {
        match self {
            EmojiKind::Dead => "dead",
            EmojiKind::Vote => "vote",
            EmojiKind::NoVote => "novote",
            EmojiKind::Traveling => "traveling",
        }
    }

    pub fn default_emoji(self) -> &'static str {
        match self {
            EmojiKind::Dead => "💀",
            EmojiKind::Vote => "👻",
            EmojiKind::NoVote => "🚫",
            EmojiKind::Traveling => "🚁",
        }
    }

    pub fn from_key(key: &str) -> Result<Self, SettingError> {
        EmojiKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| SettingError::UnknownEmojiKey(key.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    IsEnabled,
    Role(RoleKind),
    Emoji(EmojiKind),
}

impl SettingKey {
    pub fn all() -> Vec<SettingKey> {
        let mut keys = vec![SettingKey::IsEnabled];
        keys.extend(RoleKind::ALL.iter().copied().map(SettingKey::Role));
        keys.extend(EmojiKind::ALL.iter().copied().map(SettingKey::Emoji));
        keys
    }

    pub fn list() -> String {
        SettingKey::all()
            .iter()
            .map(|key| format!("`{}`", key))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingKey::IsEnabled => write!(f, "is_enabled"),
            SettingKey::Role(kind) => write!(f, "role.{}", kind.key()),
            SettingKey::Emoji(kind) => write!(f, "emoji.{}", kind.key()),
        }
    }
}

impl FromStr for SettingKey {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || SettingError::UnknownKey(s.to_string());
        if s == "is_enabled" {
            return Ok(SettingKey::IsEnabled);
        }
        match s.split_once('.') {
            Some(("role", kind)) => RoleKind::from_key(kind).map(SettingKey::Role).map_err(|_| unknown()),
            Some(("emoji", kind)) => EmojiKind::from_key(kind).map(SettingKey::Emoji).map_err(|_| unknown()),
            _ => Err(unknown()),
        }
    }
}

/// Per-category town settings. Anything left unset falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TownSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_enabled: Option<bool>,
    #[serde(default)]
    roles: BTreeMap<RoleKind, Id<RoleMarker>>,
    #[serde(default)]
    emojis: BTreeMap<EmojiKind, String>,
}

impl TownSettings {
    pub fn is_enabled(&self) -> bool {
        self.is_enabled.unwrap_or(false)
    }

    /// Whether the category was ever configured as a town, enabled or not.
    pub fn is_configured(&self) -> bool {
        self.is_enabled.is_some()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.is_enabled = Some(enabled);
    }

    pub fn role(&self, kind: RoleKind) -> Option<Id<RoleMarker>> {
        self.roles.get(&kind).copied()
    }

    pub fn set_role(&mut self, kind: RoleKind, role: Id<RoleMarker>) {
        self.roles.insert(kind, role);
    }

    pub fn emoji(&self, kind: EmojiKind) -> &str {
        self.emojis
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_emoji())
    }

    pub fn set_emoji(&mut self, kind: EmojiKind, emoji: &str) -> Result<(), SettingError> {
        let emoji = emoji.trim();
        if matchers::contains_emote(emoji) {
            return Err(SettingError::CustomEmoji);
        }
        if emoji.is_empty() {
            return Err(SettingError::InvalidValue {
                key: SettingKey::Emoji(kind).to_string(),
                value: emoji.to_string(),
            });
        }
        self.emojis.insert(kind, emoji.to_string());
        Ok(())
    }

    /// Parses and stores a raw value for the given key.
    pub fn set(&mut self, key: SettingKey, raw: &str) -> Result<(), SettingError> {
        let invalid = || SettingError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        };
        match key {
            SettingKey::IsEnabled => {
                let enabled = parse_bool(raw).ok_or_else(invalid)?;
                self.set_enabled(enabled);
            }
            SettingKey::Role(kind) => {
                let role = matchers::get_role_id(raw)
                    .or_else(|| raw.trim().parse().ok())
                    .and_then(Id::new_checked)
                    .ok_or_else(invalid)?;
                self.set_role(kind, role);
            }
            SettingKey::Emoji(kind) => self.set_emoji(kind, raw)?,
        }
        Ok(())
    }

    pub fn unset(&mut self, key: SettingKey) {
        match key {
            SettingKey::IsEnabled => self.is_enabled = None,
            SettingKey::Role(kind) => {
                self.roles.remove(&kind);
            }
            SettingKey::Emoji(kind) => {
                self.emojis.remove(&kind);
            }
        }
    }

    /// The stored value of a key for display, `None` when it is unset.
    pub fn display(&self, key: SettingKey) -> Option<String> {
        match key {
            SettingKey::IsEnabled => self.is_enabled.map(|enabled| enabled.to_string()),
            SettingKey::Role(kind) => self.role(kind).map(|role| format!("<@&{}>", role)),
            SettingKey::Emoji(kind) => Some(self.emoji(kind).to_string()),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "enable" | "enabled" => Some(true),
        "false" | "no" | "off" | "0" | "disable" | "disabled" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_roundtrip_through_their_names() {
        for key in SettingKey::all() {
            assert_eq!(key.to_string().parse::<SettingKey>(), Ok(key));
        }
        assert_eq!(
            "role.demon".parse::<SettingKey>(),
            Err(SettingError::UnknownKey("role.demon".to_string()))
        );
        assert!("prefix".parse::<SettingKey>().is_err());
    }

    #[test]
    fn emojis_fall_back_to_defaults() {
        let mut settings = TownSettings::default();
        assert_eq!(settings.emoji(EmojiKind::Dead), "💀");
        settings.set(SettingKey::Emoji(EmojiKind::Dead), "☠️").unwrap();
        assert_eq!(settings.emoji(EmojiKind::Dead), "☠️");
        settings.unset(SettingKey::Emoji(EmojiKind::Dead));
        assert_eq!(settings.emoji(EmojiKind::Dead), "💀");
    }

    #[test]
    fn custom_emojis_are_rejected() {
        let mut settings = TownSettings::default();
        assert_eq!(
            settings.set_emoji(EmojiKind::Vote, "<:ghost:123456789>"),
            Err(SettingError::CustomEmoji)
        );
        assert_eq!(settings.emoji(EmojiKind::Vote), "👻");
    }

    #[test]
    fn enabling_is_tracked_separately_from_unset() {
        let mut settings = TownSettings::default();
        assert!(!settings.is_enabled());
        assert!(!settings.is_configured());
        assert_eq!(settings.display(SettingKey::IsEnabled), None);

        settings.set(SettingKey::IsEnabled, "yes").unwrap();
        assert!(settings.is_enabled());
        settings.set(SettingKey::IsEnabled, "False").unwrap();
        assert!(!settings.is_enabled());
        assert!(settings.is_configured());
        assert!(settings.set(SettingKey::IsEnabled, "maybe").is_err());
    }

    #[test]
    fn roles_accept_mentions_and_ids() {
        let mut settings = TownSettings::default();
        let key = SettingKey::Role(RoleKind::Traveler);
        settings.set(key, "<@&1234>").unwrap();
        assert_eq!(settings.role(RoleKind::Traveler), Some(Id::new(1234)));
        settings.set(key, "5678").unwrap();
        assert_eq!(settings.display(key), Some("<@&5678>".to_string()));
        assert!(settings.set(key, "0").is_err());
        assert!(settings.set(key, "travelers").is_err());
        settings.unset(key);
        assert_eq!(settings.role(RoleKind::Traveler), None);
    }

    #[test]
    fn settings_survive_json() {
        let mut settings = TownSettings::default();
        settings.set_enabled(true);
        settings.set_role(RoleKind::Storyteller, Id::new(42));
        settings.set_emoji(EmojiKind::Traveling, "✈️").unwrap();

        let json = serde_json::to_value(&settings).unwrap();
        let back: TownSettings = serde_json::from_value(json).unwrap();
        assert_eq!(back, settings);

        let empty: TownSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, TownSettings::default());
    }
}
