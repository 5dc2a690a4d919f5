use std::collections::HashMap;
use std::fs;
use std::path::Path;

use fluent_bundle::{concurrent::FluentBundle, FluentArgs, FluentError, FluentResource, FluentValue};
use unic_langid::{langid, LanguageIdentifier};

use crate::clocktower_warn;
use crate::error::StartupError;

const TRANSLATION_DIR: &str = "./lang";
const FAILED_TRANSLATE_FALLBACK_MSG: &str =
    "A translation error occured and no fallback could be found! Something may be wrong with the translation files!";

/// The language every string falls back to.
pub const DEFAULT_LANG: LanguageIdentifier = langid!("en_US");

/// The translations for all languages that the bot can handle.
pub struct Translations(HashMap<LanguageIdentifier, FluentBundle<FluentResource>>);

pub struct FluArgs<'a>(FluentArgs<'a>);

impl<'a> FluArgs<'a> {
    pub fn with_capacity(cap: usize) -> Self {
        Self(FluentArgs::with_capacity(cap))
    }

    pub fn insert<P>(mut self, key: &'a str, value: P) -> Self
    where
        P: Into<FluentValue<'a>>,
    {
        self.0.set(key, value);
        self
    }

    pub fn generate(self) -> FluentArgs<'a> {
        self.0
    }
}

impl Translations {
    /// Translates a string that doesn't take any arguments.
    pub fn get_text_plain(&self, lang: &LanguageIdentifier, key: TownString) -> String {
        self.translate(lang, key, None)
    }

    pub fn get_text_with_args(&self, lang: &LanguageIdentifier, key: TownString, args: &FluentArgs<'_>) -> String {
        self.translate(lang, key, Some(args))
    }

    fn translate(&self, lang: &LanguageIdentifier, key: TownString, args: Option<&FluentArgs<'_>>) -> String {
        let attempts = [(lang, false), (&DEFAULT_LANG, true)];
        for &(lang, is_fallback) in attempts.iter() {
            let bundle = match self.0.get(lang) {
                Some(bundle) => bundle,
                None => continue,
            };
            let pattern = match bundle.get_message(key.as_str()).and_then(|msg| msg.value()) {
                Some(pattern) => pattern,
                None => continue,
            };
            let mut errors = Vec::new();
            let value = bundle.format_pattern(pattern, args, &mut errors);
            handle_translation_error(&errors, key, is_fallback);
            return value.replace("\\n", "\n");
        }

        // Something really went wrong, error in chat and the logs
        clocktower_warn!("{} (key: {})", FAILED_TRANSLATE_FALLBACK_MSG, key.as_str());
        FAILED_TRANSLATE_FALLBACK_MSG.to_string()
    }
}

fn handle_translation_error(errors: &[FluentError], key: TownString, is_fallback: bool) {
    for error in errors {
        if is_fallback {
            clocktower_warn!(
                "A translation error occured and had to fallback to '{}' while trying to translate the **``{}``** key: ``{:?}``",
                DEFAULT_LANG,
                key.as_str(),
                error
            );
        } else {
            clocktower_warn!(
                "A translation error occured while trying to translate the **``{}``** key: ``{:?}``",
                key.as_str(),
                error
            );
        }
    }
}

/// Everything the bot can say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TownString {
    // Errors
    NoDm,
    MissingPermissions,
    BadPlayer,
    BadSeat,
    BadSidebar,
    TownLocked,
    TownUnlocked,
    NominationInProgress,
    NoNomination,
    NoNominationToCancel,
    NotEnoughPlayers,
    InvalidVoteCount,
    EmptyStatement,
    NotInVoice,
    NotInCategory,
    UnknownSettingKey,
    SettingError,
    ParseError,
    UnexpectedError,

    // Players
    CharacterCount,
    PlayersAlive,
    VotesToExecute,
    NominationExecution,
    NominationExile,

    // Manage
    ManageUsage,
    ManageSettingsHeader,
    ManageSettingLine,
    ManageSettingUnset,

    // Help
    HelpOverviewHeader,
    HelpGroupLine,
    HelpCommandUsage,
    HelpAliases,
    HelpSubcommands,
    HelpUnknownCommand,
}

impl TownString {
    pub fn as_str(&self) -> &'static str {
        match self {
            TownString::NoDm => "errors_no_dm",
            TownString::MissingPermissions => "errors_missing_permissions",
            TownString::BadPlayer => "errors_bad_player",
            TownString::BadSeat => "errors_bad_seat",
            TownString::BadSidebar => "errors_bad_sidebar",
            TownString::TownLocked => "errors_town_locked",
            TownString::TownUnlocked => "errors_town_unlocked",
            TownString::NominationInProgress => "errors_nomination_in_progress",
            TownString::NoNomination => "errors_no_nomination",
            TownString::NoNominationToCancel => "errors_no_nomination_to_cancel",
            TownString::NotEnoughPlayers => "errors_not_enough_players",
            TownString::InvalidVoteCount => "errors_invalid_vote_count",
            TownString::EmptyStatement => "errors_empty_statement",
            TownString::NotInVoice => "errors_not_in_voice",
            TownString::NotInCategory => "errors_not_in_category",
            TownString::UnknownSettingKey => "errors_unknown_setting_key",
            TownString::SettingError => "errors_setting",
            TownString::ParseError => "errors_parse",
            TownString::UnexpectedError => "errors_unexpected",
            TownString::CharacterCount => "players__character_count",
            TownString::PlayersAlive => "players__alive",
            TownString::VotesToExecute => "players__votes_to_execute",
            TownString::NominationExecution => "players__nomination_execution",
            TownString::NominationExile => "players__nomination_exile",
            TownString::ManageUsage => "manage__usage",
            TownString::ManageSettingsHeader => "manage__settings_header",
            TownString::ManageSettingLine => "manage__setting_line",
            TownString::ManageSettingUnset => "manage__setting_unset",
            TownString::HelpOverviewHeader => "help__overview_header",
            TownString::HelpGroupLine => "help__group_line",
            TownString::HelpCommandUsage => "help__command_usage",
            TownString::HelpAliases => "help__aliases",
            TownString::HelpSubcommands => "help__subcommands",
            TownString::HelpUnknownCommand => "help__unknown_command",
        }
    }
}

pub fn load_translations() -> Result<Translations, StartupError> {
    load_translations_from(Path::new(TRANSLATION_DIR))
}

pub(crate) fn load_translations_from(dir: &Path) -> Result<Translations, StartupError> {
    let lang_dirs = fs::read_dir(dir)
        .map_err(|e| StartupError::Translations(format!("unable to read {}: {}", dir.display(), e)))?;

    let mut translations = HashMap::new();

    for lang_dir in lang_dirs {
        let lang_dir = lang_dir?;
        if !lang_dir.file_type()?.is_dir() {
            return Err(StartupError::Translations(String::from(
                "Each language must be contained in its own directory!",
            )));
        }

        let lang_dir_path = lang_dir.path();
        let lang_dir_name = lang_dir_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        let langid: LanguageIdentifier = lang_dir_name
            .parse()
            .map_err(|_| StartupError::Translations(format!("{} was not a valid language identifier!", lang_dir_name)))?;

        let mut bundle = FluentBundle::new_concurrent(vec![langid.clone()]);
        bundle.set_use_isolating(false);

        for (key, value) in read_language_dir(&lang_dir_path)? {
            let resource = FluentResource::try_new(format!("{} = {}", key, value))
                .map_err(|_| StartupError::Translations(format!("{} has an invalid translation for {}", langid, key)))?;
            bundle
                .add_resource(resource)
                .map_err(|_| StartupError::Translations(format!("{} defines {} more than once", langid, key)))?;
        }

        translations.insert(langid, bundle);
    }

    if !translations.contains_key(&DEFAULT_LANG) {
        return Err(StartupError::Translations(format!("no translations found for {}", DEFAULT_LANG)));
    }

    Ok(Translations(translations))
}

/// Merges every json file of a language directory into one key to string map.
fn read_language_dir(path: &Path) -> Result<HashMap<String, String>, StartupError> {
    let mut strings = HashMap::new();
    for file in fs::read_dir(path)? {
        let file = fs::File::open(file?.path())?;
        let part: HashMap<String, String> =
            serde_json::from_reader(file).map_err(|e| StartupError::Translations(e.to_string()))?;
        strings.extend(part);
    }
    Ok(strings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STRINGS: [TownString; 34] = [
        TownString::NoDm,
        TownString::MissingPermissions,
        TownString::BadPlayer,
        TownString::BadSeat,
        TownString::BadSidebar,
        TownString::TownLocked,
        TownString::TownUnlocked,
        TownString::NominationInProgress,
        TownString::NoNomination,
        TownString::NoNominationToCancel,
        TownString::NotEnoughPlayers,
        TownString::InvalidVoteCount,
        TownString::EmptyStatement,
        TownString::NotInVoice,
        TownString::NotInCategory,
        TownString::UnknownSettingKey,
        TownString::SettingError,
        TownString::ParseError,
        TownString::UnexpectedError,
        TownString::CharacterCount,
        TownString::PlayersAlive,
        TownString::VotesToExecute,
        TownString::NominationExecution,
        TownString::NominationExile,
        TownString::ManageUsage,
        TownString::ManageSettingsHeader,
        TownString::ManageSettingLine,
        TownString::ManageSettingUnset,
        TownString::HelpOverviewHeader,
        TownString::HelpGroupLine,
        TownString::HelpCommandUsage,
        TownString::HelpAliases,
        TownString::HelpSubcommands,
        TownString::HelpUnknownCommand,
    ];

    fn lang_dir() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("lang")
    }

    #[test]
    fn enum_variants_translation_coverage() {
        let strings = read_language_dir(&lang_dir().join("en_US")).unwrap();
        for string in ALL_STRINGS.iter() {
            assert!(strings.contains_key(string.as_str()), "{} is missing", string.as_str());
        }
    }

    #[test]
    fn translation_strings_are_used() {
        let strings = read_language_dir(&lang_dir().join("en_US")).unwrap();
        for key in strings.keys() {
            assert!(
                ALL_STRINGS.iter().any(|string| string.as_str() == key),
                "{} is never used",
                key
            );
        }
    }

    #[test]
    fn strings_render_with_arguments() {
        let translations = load_translations_from(&lang_dir()).unwrap();
        let args = FluArgs::with_capacity(1).insert("name", "Ferris").generate();
        assert_eq!(
            translations.get_text_with_args(&DEFAULT_LANG, TownString::BadPlayer, &args),
            "This game isn't meant for Ferris."
        );

        let args = FluArgs::with_capacity(4)
            .insert("townsfolk", "5")
            .insert("outsiders", "1")
            .insert("minions", "1")
            .insert("demons", "1")
            .generate();
        assert_eq!(
            translations.get_text_with_args(&DEFAULT_LANG, TownString::CharacterCount, &args),
            "5 townsfolk, 1 outsider(s), 1 minion(s), and 1 demon"
        );

        assert_eq!(
            translations.get_text_plain(&DEFAULT_LANG, TownString::BadSeat),
            "That seat doesn't look like anything to me."
        );
    }
}
