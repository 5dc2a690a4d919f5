use std::sync::PoisonError;

use log::debug;
use twilight_model::id::marker::{ChannelMarker, GuildMarker};
use twilight_model::id::Id;

use super::BotContext;
use crate::database::town_settings;
use crate::error::{CommandError, DatabaseError, SettingError};
use crate::town::{Town, TownSettings};

impl BotContext {
    /// Settings of a category, loaded once and kept in memory afterwards.
    pub async fn get_town_settings(&self, category: Id<ChannelMarker>) -> Result<TownSettings, DatabaseError> {
        let cached = self
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&category)
            .cloned();
        if let Some(settings) = cached {
            return Ok(settings);
        }

        debug!("Loading town settings for category {}", category);
        let settings = town_settings::get_town_settings(&self.pool, category)
            .await?
            .unwrap_or_default();
        self.settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category, settings.clone());
        Ok(settings)
    }

    /// Changes the settings of a category and writes them through to the database.
    pub async fn update_town_settings<F>(
        &self,
        guild_id: Id<GuildMarker>,
        category: Id<ChannelMarker>,
        change: F,
    ) -> Result<TownSettings, CommandError>
    where
        F: FnOnce(&mut TownSettings) -> Result<(), SettingError>,
    {
        let mut settings = self.get_town_settings(category).await?;
        change(&mut settings)?;
        town_settings::set_town_settings(&self.pool, guild_id, category, &settings).await?;
        self.settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category, settings.clone());
        Ok(settings)
    }

    /// Runs a closure on the town of a category, creating the town from the current settings if needed.
    pub async fn with_town<F, R>(&self, category: Id<ChannelMarker>, action: F) -> Result<R, DatabaseError>
    where
        F: FnOnce(&mut Town) -> R,
    {
        let settings = self.get_town_settings(category).await?;
        let mut towns = self.towns.lock().unwrap_or_else(PoisonError::into_inner);
        let town = towns.entry(category).or_insert_with(|| Town::new(settings));
        Ok(action(town))
    }

    pub fn remove_town(&self, category: Id<ChannelMarker>) -> Option<Town> {
        self.towns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&category)
    }
}
