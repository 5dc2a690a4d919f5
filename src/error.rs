use std::fmt::{self, Formatter};
use std::{error, io};

use flexi_logger::FlexiLoggerError;
use twilight_http::response::DeserializeBodyError;
use twilight_model::id::marker::UserMarker;
use twilight_model::id::Id;
use twilight_util::builder::embed::image_source::ImageSourceUrlError;
use twilight_validate::channel::ChannelValidationError;
use twilight_validate::message::MessageValidationError;
use twilight_validate::request::ValidationError;

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug)]
pub enum StartupError {
    NoConfig,
    InvalidConfig(String),
    Logging(FlexiLoggerError),
    Twilight(twilight_http::Error),
    DeserializeBody(DeserializeBodyError),
    Sqlx(sqlx::Error),
    Migrate(sqlx::migrate::MigrateError),
    Translations(String),
    Io(io::Error),
}

impl error::Error for StartupError {}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::NoConfig => write!(f, "Unable to locate the config file"),
            StartupError::InvalidConfig(e) => write!(f, "Unable to load the config file: {}", e),
            StartupError::Logging(e) => write!(f, "Unable to start the logger: {}", e),
            StartupError::Twilight(e) => write!(f, "Twilight error during startup, unable to continue: {}", e),
            StartupError::DeserializeBody(e) => write!(f, "Discord sent something we couldn't read: {}", e),
            StartupError::Sqlx(e) => write!(f, "Unable to create database pool: {:?}", e),
            StartupError::Migrate(e) => write!(f, "Failed to run database migrations: {}", e),
            StartupError::Translations(e) => write!(f, "Unable to load translations: {}", e),
            StartupError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum EventHandlerError {
    InvalidSession(u64),
    Twilight(twilight_http::Error),
    Database(DatabaseError),
}

impl error::Error for EventHandlerError {}

impl fmt::Display for EventHandlerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EventHandlerError::InvalidSession(e) => write!(f, "Our gateway session died on shard {}", e),
            EventHandlerError::Twilight(e) => write!(f, "Failed to interact with the discord api: {}", e),
            EventHandlerError::Database(e) => write!(f, "Database interaction failed: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum DatabaseError {
    Sqlx(sqlx::Error),
    Deserializing(serde_json::Error),
    Serializing(serde_json::Error),
}

impl error::Error for DatabaseError {}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::Sqlx(e) => write!(f, "Database failure: {:?}", e),
            DatabaseError::Deserializing(e) => write!(f, "Failed to deserialize: {}", e),
            DatabaseError::Serializing(e) => write!(f, "Failed to seralize: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum CommandError {
    NoDM,
    InvalidPermissions,
    ParseError(ParseError),
    Town(TownError),
    OtherFailure(OtherFailure),
}

impl error::Error for CommandError {}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NoDM => write!(f, "You can not use this command in DMs"),
            CommandError::InvalidPermissions => write!(f, "You don't have the permissions to run this command!"),
            CommandError::ParseError(e) => write!(f, "Failed to parse the command arguments: {}", e),
            CommandError::Town(e) => write!(f, "{}", e),
            CommandError::OtherFailure(e) => write!(f, "Unexpected error while executing the command: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum OtherFailure {
    TwilightHttp(twilight_http::Error),
    DeserializeBody(DeserializeBodyError),
    DatabaseError(DatabaseError),
    CorruptCache(String),
    ImageSourceUrl(ImageSourceUrlError),
    InvalidMessage(MessageValidationError),
    InvalidChannel(ChannelValidationError),
    InvalidRequest(ValidationError),
}

impl error::Error for OtherFailure {}

impl fmt::Display for OtherFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OtherFailure::TwilightHttp(e) => write!(f, "Something when wrong interacting with the discord api: {}", e),
            OtherFailure::DeserializeBody(e) => write!(f, "Unable to read a discord api response: {}", e),
            OtherFailure::DatabaseError(e) => write!(f, "Database error: {}", e),
            OtherFailure::CorruptCache(e) => write!(f, "Cache is missing something it should have: {}", e),
            OtherFailure::ImageSourceUrl(e) => write!(f, "Failed to set embed image url: {}", e),
            OtherFailure::InvalidMessage(e) => write!(f, "Discord would refuse this message: {}", e),
            OtherFailure::InvalidChannel(e) => write!(f, "Discord would refuse this channel: {}", e),
            OtherFailure::InvalidRequest(e) => write!(f, "Discord would refuse this request: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum ParseError {
    MissingArgument,
    TooManyArguments,
    WrongArgumentType(String),
    MemberNotFoundById(u64),
    MemberNotFoundByName(String),
    MultipleMembersByName(String),
    UnknownRole(String),
    UnknownChannel(String),
}

impl error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingArgument => write!(f, "missing one or more required arguments"),
            ParseError::TooManyArguments => write!(f, "too many arguments"),
            ParseError::WrongArgumentType(expected) => write!(f, "expected a {}", expected),
            ParseError::MemberNotFoundById(id) => write!(f, "no member with userid {} on this server", id),
            ParseError::MemberNotFoundByName(name) => write!(f, "nobody named {} on this server", name),
            ParseError::MultipleMembersByName(name) => write!(f, "multiple members named {}", name),
            ParseError::UnknownRole(role) => write!(f, "unknown role {}", role),
            ParseError::UnknownChannel(channel) => write!(f, "unknown channel {}", channel),
        }
    }
}

/// Game rule violations reported back to whoever used the command.
#[derive(Debug)]
pub enum TownError {
    BadPlayer(Id<UserMarker>),
    BadSeat,
    BadSidebar,
    Locked,
    Unlocked,
    NominationInProgress,
    NoNomination,
    NoNominationToCancel,
    NotEnoughPlayers,
    InvalidVoteCount(i64),
    EmptyStatement,
    NotInVoice,
    NoCategory,
    Setting(SettingError),
}

impl error::Error for TownError {}

impl fmt::Display for TownError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TownError::BadPlayer(user) => write!(f, "{} isn't a player", user),
            TownError::BadSeat => write!(f, "Seat number is invalid"),
            TownError::BadSidebar => write!(f, "Voice channel number is invalid"),
            TownError::Locked => write!(f, "Command requires an unlocked town"),
            TownError::Unlocked => write!(f, "Command requires a locked town"),
            TownError::NominationInProgress => write!(f, "A nomination is already in progress"),
            TownError::NoNomination => write!(f, "There has not been a nomination to vote on"),
            TownError::NoNominationToCancel => write!(f, "There is no nomination to cancel"),
            TownError::NotEnoughPlayers => write!(f, "Not enough players for a proper game"),
            TownError::InvalidVoteCount(n) => write!(f, "Number of votes must be in [0, 20], got {}", n),
            TownError::EmptyStatement => write!(f, "Statement is empty"),
            TownError::NotInVoice => write!(f, "Member is not connected to voice"),
            TownError::NoCategory => write!(f, "Channel is not inside a category"),
            TownError::Setting(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum SettingError {
    UnknownKey(String),
    UnknownEmojiKey(String),
    UnknownRoleKey(String),
    InvalidValue { key: String, value: String },
    CustomEmoji,
}

impl error::Error for SettingError {}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Invalid setting key {}", key),
            SettingError::UnknownEmojiKey(key) => write!(f, "Invalid emoji setting key {}", key),
            SettingError::UnknownRoleKey(key) => write!(f, "Invalid role setting key {}", key),
            SettingError::InvalidValue { key, value } => write!(f, "{} is not a valid value for {}", value, key),
            SettingError::CustomEmoji => write!(f, "Cannot use custom Discord emojis in nickname"),
        }
    }
}

impl From<twilight_http::Error> for StartupError {
    fn from(e: twilight_http::Error) -> Self {
        StartupError::Twilight(e)
    }
}

impl From<DeserializeBodyError> for StartupError {
    fn from(e: DeserializeBodyError) -> Self {
        StartupError::DeserializeBody(e)
    }
}

impl From<sqlx::Error> for StartupError {
    fn from(e: sqlx::Error) -> Self {
        StartupError::Sqlx(e)
    }
}

impl From<sqlx::migrate::MigrateError> for StartupError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        StartupError::Migrate(e)
    }
}

impl From<FlexiLoggerError> for StartupError {
    fn from(e: FlexiLoggerError) -> Self {
        StartupError::Logging(e)
    }
}

impl From<io::Error> for StartupError {
    fn from(e: io::Error) -> Self {
        StartupError::Io(e)
    }
}

impl From<twilight_http::Error> for EventHandlerError {
    fn from(e: twilight_http::Error) -> Self {
        EventHandlerError::Twilight(e)
    }
}

impl From<DatabaseError> for EventHandlerError {
    fn from(e: DatabaseError) -> Self {
        EventHandlerError::Database(e)
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(e: sqlx::Error) -> Self {
        DatabaseError::Sqlx(e)
    }
}

impl From<twilight_http::Error> for CommandError {
    fn from(e: twilight_http::Error) -> Self {
        CommandError::OtherFailure(OtherFailure::TwilightHttp(e))
    }
}

impl From<DeserializeBodyError> for CommandError {
    fn from(e: DeserializeBodyError) -> Self {
        CommandError::OtherFailure(OtherFailure::DeserializeBody(e))
    }
}

impl From<ImageSourceUrlError> for CommandError {
    fn from(e: ImageSourceUrlError) -> Self {
        CommandError::OtherFailure(OtherFailure::ImageSourceUrl(e))
    }
}

impl From<MessageValidationError> for CommandError {
    fn from(e: MessageValidationError) -> Self {
        CommandError::OtherFailure(OtherFailure::InvalidMessage(e))
    }
}

impl From<ChannelValidationError> for CommandError {
    fn from(e: ChannelValidationError) -> Self {
        CommandError::OtherFailure(OtherFailure::InvalidChannel(e))
    }
}

impl From<ValidationError> for CommandError {
    fn from(e: ValidationError) -> Self {
        CommandError::OtherFailure(OtherFailure::InvalidRequest(e))
    }
}

impl From<DatabaseError> for CommandError {
    fn from(e: DatabaseError) -> Self {
        CommandError::OtherFailure(OtherFailure::DatabaseError(e))
    }
}

impl From<OtherFailure> for CommandError {
    fn from(e: OtherFailure) -> Self {
        CommandError::OtherFailure(e)
    }
}

impl From<ParseError> for CommandError {
    fn from(e: ParseError) -> Self {
        CommandError::ParseError(e)
    }
}

impl From<TownError> for CommandError {
    fn from(e: TownError) -> Self {
        CommandError::Town(e)
    }
}

impl From<SettingError> for TownError {
    fn from(e: SettingError) -> Self {
        TownError::Setting(e)
    }
}

impl From<SettingError> for CommandError {
    fn from(e: SettingError) -> Self {
        CommandError::Town(TownError::Setting(e))
    }
}
