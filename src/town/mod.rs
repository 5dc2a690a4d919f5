pub mod counts;
pub mod digits;
pub mod names;
pub mod settings;
pub mod state;

pub use names::NameFormat;
pub use settings::{EmojiKind, RoleKind, SettingKey, TownSettings};
pub use state::{MemberArg, Nomination, Town};
