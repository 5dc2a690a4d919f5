use log::debug;
use sqlx::PgPool;
use twilight_model::id::marker::{ChannelMarker, GuildMarker};
use twilight_model::id::Id;

use crate::error::DatabaseError;
use crate::town::TownSettings;

pub async fn get_town_settings(
    pool: &PgPool,
    category_id: Id<ChannelMarker>,
) -> Result<Option<TownSettings>, DatabaseError> {
    let row: Option<(serde_json::Value,)> = sqlx::query_as("SELECT settings FROM town_settings WHERE category_id=$1")
        .bind(category_id.get() as i64)
        .fetch_optional(pool)
        .await?;

    match row {
        Some((raw,)) => Ok(Some(serde_json::from_value(raw).map_err(DatabaseError::Deserializing)?)),
        None => Ok(None),
    }
}

pub async fn set_town_settings(
    pool: &PgPool,
    guild_id: Id<GuildMarker>,
    category_id: Id<ChannelMarker>,
    settings: &TownSettings,
) -> Result<(), DatabaseError> {
    debug!("Storing town settings for category {}", category_id);
    let value = serde_json::to_value(settings).map_err(DatabaseError::Serializing)?;
    sqlx::query(
        "INSERT INTO town_settings (category_id, guild_id, settings) VALUES ($1, $2, $3)
        ON CONFLICT (category_id) DO UPDATE SET settings=$3",
    )
    .bind(category_id.get() as i64)
    .bind(guild_id.get() as i64)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}
