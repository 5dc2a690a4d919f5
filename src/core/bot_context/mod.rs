use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use sqlx::PgPool;
use twilight_cache_inmemory::InMemoryCache;
use twilight_http::Client as HttpClient;
use twilight_model::id::marker::ChannelMarker;
use twilight_model::id::Id;
use twilight_model::user::CurrentUser;

use crate::core::BotConfig;
use crate::town::{Town, TownSettings};
use crate::translation::Translations;

mod members;
mod permissions;
mod towns;

/// Everything shared between event handlers.
///
/// Town state is only reachable through synchronous closures so no lock is ever held across an await.
pub struct BotContext {
    pub http: Arc<HttpClient>,
    pub cache: InMemoryCache,
    pub pool: PgPool,
    pub translations: Translations,
    pub config: BotConfig,
    pub bot_user: CurrentUser,
    settings: RwLock<HashMap<Id<ChannelMarker>, TownSettings>>,
    towns: Mutex<HashMap<Id<ChannelMarker>, Town>>,
}

impl BotContext {
    pub fn new(
        http: Arc<HttpClient>,
        cache: InMemoryCache,
        pool: PgPool,
        translations: Translations,
        config: BotConfig,
        bot_user: CurrentUser,
    ) -> Self {
        BotContext {
            http,
            cache,
            pool,
            translations,
            config,
            bot_user,
            settings: RwLock::new(HashMap::new()),
            towns: Mutex::new(HashMap::new()),
        }
    }
}
