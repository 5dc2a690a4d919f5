use std::sync::Arc;
use std::time::Duration;

use git_version::git_version;
use log::{debug, info};
use tokio::runtime::Runtime;
use twilight_http::Client as HttpClient;
use twilight_model::channel::message::AllowedMentions;

use commands::ROOT_NODE;
use translation::load_translations;

use crate::core::{logging, BotConfig, Clocktower};
use crate::error::StartupError;

mod commands;
mod core;
mod database;
mod error;
mod parser;
mod town;
mod translation;
mod utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_VERSION: &str = git_version!(fallback = "unknown");

fn main() -> Result<(), StartupError> {
    let runtime = Runtime::new()?;

    runtime.block_on(async move { real_main().await })?;

    runtime.shutdown_timeout(Duration::from_secs(90));
    Ok(())
}

async fn real_main() -> Result<(), StartupError> {
    if let Err(e) = logging::initialize() {
        eprintln!("{}", e);
        return Err(e);
    }

    info!("Clocktower v{} ({}) starting!", VERSION, GIT_VERSION);
    // Read config file
    let config = BotConfig::new("config.toml")?;
    debug!("Loaded config file");

    let http = Arc::new(
        HttpClient::builder()
            .token(config.tokens.discord.clone())
            .default_allowed_mentions(AllowedMentions::default())
            .build(),
    );

    // Validate token and figure out who we are
    let user = http.current_user().await?.model().await?;
    info!("Token validated, connecting to discord as {}", user.name);

    logging::initialize_discord_webhooks(http.clone(), &config, user.clone());

    clocktower_important!("Starting Clocktower v{}. The town is waking up!", VERSION);

    let translations = load_translations()?;
    clocktower_info!("Loaded translations!");

    //connect to the database
    let postgres_pool = sqlx::PgPool::connect(&config.database.postgres).await?;
    info!("Connected to postgres!");

    info!("Handling database migrations...");
    sqlx::migrate!("./migrations").run(&postgres_pool).await?;
    info!("Finished migrations!");

    {
        info!("Populating command list");
        info!("{} commands registered", ROOT_NODE.command_list.len());
    }

    // end of the critical failure zone, everything from here on out should be properly wrapped
    // and handled
    Clocktower::run(config, http, user, translations, postgres_pool).await;

    clocktower_important!("Clocktower is shutting down");
    Ok(())
}
