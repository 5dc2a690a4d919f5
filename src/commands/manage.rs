use twilight_model::channel::ChannelType;
use twilight_model::guild::Permissions;
use twilight_model::http::permission_overwrite::{PermissionOverwrite, PermissionOverwriteType};
use twilight_model::id::marker::{ChannelMarker, GenericMarker, GuildMarker, RoleMarker};
use twilight_model::id::Id;

use crate::core::CommandContext;
use crate::error::{CommandError, CommandResult, ParseError};
use crate::town::{EmojiKind, RoleKind, SettingKey};
use crate::translation::{FluArgs, TownString};
use crate::utils::matchers;
use crate::{clocktower_info, clocktower_warn};

const SIDEBARS: u32 = 7;

/// Shows the usage and, for configured towns, every setting.
pub async fn town(ctx: CommandContext) -> CommandResult {
    let mut lines = vec![ctx.translate_with_args(
        TownString::ManageUsage,
        &FluArgs::with_capacity(1).insert("prefix", ctx.prefix()).generate(),
    )];

    let category = ctx.get_category()?;
    let settings = ctx.bot_context.get_town_settings(category).await?;
    if settings.is_configured() {
        let name = channel_name(&ctx, category);
        lines.push(ctx.translate_with_args(
            TownString::ManageSettingsHeader,
            &FluArgs::with_capacity(1).insert("category", name).generate(),
        ));
        for key in SettingKey::all() {
            let value = settings
                .display(key)
                .unwrap_or_else(|| ctx.translate(TownString::ManageSettingUnset));
            let args = FluArgs::with_capacity(2)
                .insert("key", key.to_string())
                .insert("value", value)
                .generate();
            lines.push(ctx.translate_with_args(TownString::ManageSettingLine, &args));
        }
    }

    // lingers as long as an error reply would
    let message = ctx.reply_raw(&lines.join("\n")).await?;
    ctx.bot_context.delete_message_later(
        message.channel_id,
        message.id,
        ctx.bot_context.config.messages.error_delay(),
    );
    Ok(())
}

pub async fn enable(ctx: CommandContext) -> CommandResult {
    set_enabled(ctx, true).await
}

pub async fn disable(ctx: CommandContext) -> CommandResult {
    set_enabled(ctx, false).await
}

async fn set_enabled(mut ctx: CommandContext, enabled: bool) -> CommandResult {
    let guild_id = ctx.get_guild_id()?;
    let category = if ctx.parser.has_next() {
        let input = ctx.parser.get_remaining();
        resolve_category(&ctx, guild_id, &input)?
    } else {
        ctx.get_category()?
    };
    ctx.bot_context
        .update_town_settings(guild_id, category, |settings| {
            settings.set_enabled(enabled);
            Ok(())
        })
        .await?;
    clocktower_info!(
        "Town commands {} in category {} of guild {}",
        if enabled { "enabled" } else { "disabled" },
        category,
        guild_id
    );
    ctx.acknowledge().await
}

/// Builds a fresh town category with its channels and enables it.
pub async fn create(mut ctx: CommandContext) -> CommandResult {
    let guild_id = ctx.get_guild_id()?;
    let private = ctx
        .parser
        .peek()
        .map_or(false, |part| part.eq_ignore_ascii_case("private"));
    if private {
        ctx.parser.get_next();
    }
    let name = ctx.parser.get_remaining();
    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::MissingArgument.into());
    }

    let overwrites = if private {
        private_overwrites(guild_id, ctx.get_bot_user().id.cast())
    } else {
        vec![]
    };
    let http = &ctx.bot_context.http;
    let category = http
        .create_guild_channel(guild_id, name)?
        .kind(ChannelType::GuildCategory)
        .permission_overwrites(&overwrites)
        .await?
        .model()
        .await?;

    let mut channels = vec![(text_channel_name(name), ChannelType::GuildText)];
    channels.push((String::from("Town Square"), ChannelType::GuildVoice));
    channels.extend((1..=SIDEBARS).map(|n| (format!("Sidebar {}", n), ChannelType::GuildVoice)));
    channels.push((String::from("Storyteller Sidebar"), ChannelType::GuildVoice));
    for (channel_name, kind) in &channels {
        http.create_guild_channel(guild_id, channel_name)?
            .kind(*kind)
            .parent_id(category.id)
            .await?;
    }

    ctx.bot_context
        .update_town_settings(guild_id, category.id, |settings| {
            settings.set_enabled(true);
            Ok(())
        })
        .await?;
    clocktower_info!(
        "Created town category {} ({}) in guild {}",
        name,
        category.id,
        guild_id
    );
    ctx.acknowledge().await
}

pub async fn set_emoji(mut ctx: CommandContext) -> CommandResult {
    let guild_id = ctx.get_guild_id()?;
    let category = ctx.get_category()?;
    let kind = EmojiKind::from_key(ctx.parser.get_next().ok_or(ParseError::MissingArgument)?)?;
    let emoji = ctx.parser.get_remaining();
    if emoji.trim().is_empty() {
        return Err(ParseError::MissingArgument.into());
    }
    ctx.bot_context
        .update_town_settings(guild_id, category, |settings| settings.set_emoji(kind, &emoji))
        .await?;
    ctx.acknowledge().await
}

pub async fn unset_emoji(mut ctx: CommandContext) -> CommandResult {
    let guild_id = ctx.get_guild_id()?;
    let category = ctx.get_category()?;
    let kind = EmojiKind::from_key(ctx.parser.get_next().ok_or(ParseError::MissingArgument)?)?;
    ctx.parser.ensure_done()?;
    ctx.bot_context
        .update_town_settings(guild_id, category, |settings| {
            settings.unset(SettingKey::Emoji(kind));
            Ok(())
        })
        .await?;
    ctx.acknowledge().await
}

/// Sets the role handed out for a kind of participant, creating one when none is given.
pub async fn set_role(mut ctx: CommandContext) -> CommandResult {
    let guild_id = ctx.get_guild_id()?;
    let category = ctx.get_category()?;
    let kind = RoleKind::from_key(ctx.parser.get_next().ok_or(ParseError::MissingArgument)?)?;

    let role = if ctx.parser.has_next() {
        let input = ctx.parser.get_remaining();
        resolve_role(&ctx, guild_id, &input)?
    } else {
        let name = format!("{} {}", kind.name_prefix(), channel_name(&ctx, category));
        create_role(&ctx, guild_id, &name, kind.color()).await?
    };

    ctx.bot_context
        .update_town_settings(guild_id, category, |settings| {
            settings.set_role(kind, role);
            Ok(())
        })
        .await?;
    ctx.acknowledge().await
}

pub async fn unset_role(mut ctx: CommandContext) -> CommandResult {
    let guild_id = ctx.get_guild_id()?;
    let category = ctx.get_category()?;
    let kind = RoleKind::from_key(ctx.parser.get_next().ok_or(ParseError::MissingArgument)?)?;
    ctx.parser.ensure_done()?;
    ctx.bot_context
        .update_town_settings(guild_id, category, |settings| {
            settings.unset(SettingKey::Role(kind));
            Ok(())
        })
        .await?;
    ctx.acknowledge().await
}

pub async fn set(mut ctx: CommandContext) -> CommandResult {
    let guild_id = ctx.get_guild_id()?;
    let category = ctx.get_category()?;
    let key: SettingKey = ctx.parser.get_next().ok_or(ParseError::MissingArgument)?.parse()?;
    let value = ctx.parser.get_remaining();
    if value.trim().is_empty() {
        return Err(ParseError::MissingArgument.into());
    }
    ctx.bot_context
        .update_town_settings(guild_id, category, |settings| settings.set(key, &value))
        .await?;
    ctx.acknowledge().await
}

pub async fn unset(mut ctx: CommandContext) -> CommandResult {
    let guild_id = ctx.get_guild_id()?;
    let category = ctx.get_category()?;
    let key: SettingKey = ctx.parser.get_next().ok_or(ParseError::MissingArgument)?.parse()?;
    ctx.parser.ensure_done()?;
    ctx.bot_context
        .update_town_settings(guild_id, category, |settings| {
            settings.unset(key);
            Ok(())
        })
        .await?;
    ctx.acknowledge().await
}

async fn create_role(
    ctx: &CommandContext,
    guild_id: Id<GuildMarker>,
    name: &str,
    color: u32,
) -> Result<Id<RoleMarker>, CommandError> {
    let created = ctx
        .bot_context
        .http
        .create_role(guild_id)
        .name(name)
        .color(color)
        .hoist(false)
        .mentionable(true)
        .await;
    match created {
        Ok(response) => Ok(response.model().await?.id),
        Err(e) => {
            // the role may already be there from an earlier attempt
            let existing = guild_roles(ctx, guild_id)
                .into_iter()
                .find(|(_, role_name)| role_name == name)
                .map(|(id, _)| id);
            match existing {
                Some(id) => {
                    clocktower_warn!("Unable to create role {}, using the existing one: {}", name, e);
                    Ok(id)
                }
                None => Err(e.into()),
            }
        }
    }
}

fn resolve_role(ctx: &CommandContext, guild_id: Id<GuildMarker>, input: &str) -> Result<Id<RoleMarker>, ParseError> {
    let input = input.trim();
    let roles = guild_roles(ctx, guild_id);
    let wanted = matchers::get_role_id(input).or_else(|| input.parse().ok());
    let found = match wanted {
        Some(id) => roles.iter().find(|(role, _)| role.get() == id).map(|(role, _)| *role),
        None => find_by_name(&roles, input),
    };
    found.ok_or_else(|| ParseError::UnknownRole(input.to_string()))
}

fn resolve_category(
    ctx: &CommandContext,
    guild_id: Id<GuildMarker>,
    input: &str,
) -> Result<Id<ChannelMarker>, ParseError> {
    let input = input.trim();
    let channel_ids: Vec<Id<ChannelMarker>> = match ctx.bot_context.cache.guild_channels(guild_id) {
        Some(channels) => channels.iter().copied().collect(),
        None => vec![],
    };
    let categories = channel_ids
        .into_iter()
        .filter_map(|id| ctx.bot_context.cache.channel(id).map(|channel| channel.clone()))
        .filter(|channel| channel.kind == ChannelType::GuildCategory)
        .map(|channel| (channel.id, channel.name.unwrap_or_default()))
        .collect::<Vec<_>>();

    let wanted = matchers::get_channel_id(input).or_else(|| input.parse().ok());
    let found = match wanted {
        Some(id) => categories.iter().find(|(channel, _)| channel.get() == id).map(|(channel, _)| *channel),
        None => find_by_name(&categories, input),
    };
    found.ok_or_else(|| ParseError::UnknownChannel(input.to_string()))
}

fn guild_roles(ctx: &CommandContext, guild_id: Id<GuildMarker>) -> Vec<(Id<RoleMarker>, String)> {
    let role_ids: Vec<Id<RoleMarker>> = match ctx.bot_context.cache.guild_roles(guild_id) {
        Some(roles) => roles.iter().copied().collect(),
        None => vec![],
    };
    role_ids
        .into_iter()
        .filter_map(|id| ctx.bot_context.cache.role(id).map(|role| (id, role.resource().name.clone())))
        .collect()
}

fn channel_name(ctx: &CommandContext, channel_id: Id<ChannelMarker>) -> String {
    ctx.bot_context
        .cache
        .channel(channel_id)
        .and_then(|channel| channel.name.clone())
        .unwrap_or_else(|| channel_id.to_string())
}

/// Exact matches win over ones that only differ in case.
fn find_by_name<T: Copy>(items: &[(T, String)], name: &str) -> Option<T> {
    items
        .iter()
        .find(|(_, item)| item == name)
        .or_else(|| items.iter().find(|(_, item)| item.eq_ignore_ascii_case(name)))
        .map(|(id, _)| *id)
}

fn text_channel_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase()
}

/// Hides a category from everyone but the bot.
fn private_overwrites(guild_id: Id<GuildMarker>, bot_id: Id<GenericMarker>) -> Vec<PermissionOverwrite> {
    let hidden = Permissions::VIEW_CHANNEL | Permissions::CONNECT;
    vec![
        PermissionOverwrite {
            allow: None,
            deny: Some(hidden),
            id: guild_id.cast(),
            kind: PermissionOverwriteType::Role,
        },
        PermissionOverwrite {
            allow: Some(hidden),
            deny: None,
            id: bot_id,
            kind: PermissionOverwriteType::Member,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_channels_are_lowercase_and_dashed() {
        assert_eq!(text_channel_name("Ravenswood Bluff"), "ravenswood-bluff");
        assert_eq!(text_channel_name("  Trouble   Brewing "), "trouble-brewing");
    }

    #[test]
    fn names_prefer_exact_matches() {
        let items = vec![(1, String::from("playing town")), (2, String::from("Playing Town"))];
        assert_eq!(find_by_name(&items, "Playing Town"), Some(2));
        assert_eq!(find_by_name(&items, "PLAYING TOWN"), Some(1));
        assert_eq!(find_by_name(&items, "Traveling Town"), None);
    }

    #[test]
    fn private_towns_only_let_the_bot_in() {
        let overwrites = private_overwrites(Id::new(1), Id::new(2));
        assert_eq!(overwrites.len(), 2);
        assert_eq!(overwrites[0].id, Id::new(1));
        assert!(overwrites[0].deny.unwrap().contains(Permissions::VIEW_CHANNEL));
        assert_eq!(overwrites[1].kind, PermissionOverwriteType::Member);
        assert!(overwrites[1].allow.unwrap().contains(Permissions::CONNECT));
    }
}
