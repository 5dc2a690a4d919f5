pub use bot_config::BotConfig;
pub use bot_context::BotContext;
pub use clocktower::Clocktower;
pub use command_context::{CommandContext, CommandMessage};

mod bot_config;
mod bot_context;
mod clocktower;
mod command_context;
mod handlers;
pub mod logging;
