use std::sync::Arc;

use log::{debug, warn};
use sqlx::PgPool;
use twilight_cache_inmemory::{InMemoryCache, ResourceType};
use twilight_gateway::{CloseFrame, Event, Intents, Shard, ShardId};
use twilight_http::Client as HttpClient;
use twilight_model::user::CurrentUser;

use crate::core::handlers::{commands, general};
use crate::core::{BotConfig, BotContext};
use crate::translation::Translations;
use crate::{clocktower_error, clocktower_important, clocktower_info};

pub struct Clocktower;

impl Clocktower {
    pub async fn run(
        config: BotConfig,
        http: Arc<HttpClient>,
        bot_user: CurrentUser,
        translations: Translations,
        pool: PgPool,
    ) {
        let intents = Intents::GUILDS
            | Intents::GUILD_MEMBERS
            | Intents::GUILD_MESSAGES
            | Intents::MESSAGE_CONTENT
            | Intents::GUILD_VOICE_STATES;

        let mut shard = Shard::new(ShardId::ONE, config.tokens.discord.clone(), intents);

        let cache = InMemoryCache::builder()
            .resource_types(
                ResourceType::GUILD
                    | ResourceType::CHANNEL
                    | ResourceType::MEMBER
                    | ResourceType::ROLE
                    | ResourceType::USER
                    | ResourceType::VOICE_STATE,
            )
            .build();

        let context = Arc::new(BotContext::new(http, cache, pool, translations, config, bot_user));

        clocktower_info!("The shard is going online!");
        loop {
            let event = tokio::select! {
                event = shard.next_event() => event,
                _ = tokio::signal::ctrl_c() => {
                    clocktower_important!("Shutdown requested, leaving the gateway");
                    if let Err(e) = shard.close(CloseFrame::NORMAL).await {
                        warn!("Failed to close the gateway connection cleanly: {}", e);
                    }
                    break;
                }
            };

            let event = match event {
                Ok(event) => event,
                Err(source) => {
                    if source.is_fatal() {
                        clocktower_error!("The gateway connection can't be recovered: {}", source);
                        break;
                    }
                    warn!("Error receiving a gateway event: {}", source);
                    continue;
                }
            };

            context.cache.update(&event);
            tokio::spawn(handle_event(event, context.clone()));
        }
    }
}

async fn handle_event(event: Event, ctx: Arc<BotContext>) {
    debug!("Got a {:?} event", event.kind());
    if let Err(e) = general::handle_event(0, &event) {
        clocktower_error!("{}", e);
    }
    if let Err(e) = commands::handle_event(event, ctx).await {
        clocktower_error!("Failed to handle a command: {}", e);
    }
}
