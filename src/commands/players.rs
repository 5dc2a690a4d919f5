use twilight_model::channel::ChannelType;
use twilight_model::id::marker::{ChannelMarker, UserMarker};
use twilight_model::id::Id;
use twilight_util::builder::embed::{EmbedAuthorBuilder, EmbedBuilder, ImageSource};

use crate::core::CommandContext;
use crate::error::{CommandResult, TownError};
use crate::town::digits::seat_digits;
use crate::town::Town;
use crate::translation::{FluArgs, TownString};
use crate::utils::{escape_markdown, matchers};

const TOWNSQUARE_COLOR: u32 = 0xad_1457;
const STATEMENT_COLOR: u32 = 0x34_98db;

pub async fn dead(mut ctx: CommandContext) -> CommandResult {
    update_player(&mut ctx, Town::set_dead).await
}

pub async fn voted(mut ctx: CommandContext) -> CommandResult {
    update_player(&mut ctx, Town::set_voted).await
}

pub async fn alive(mut ctx: CommandContext) -> CommandResult {
    update_player(&mut ctx, Town::set_alive).await
}

async fn update_player(
    ctx: &mut CommandContext,
    change: fn(&mut Town, Id<UserMarker>) -> Result<(), TownError>,
) -> CommandResult {
    let arg = ctx.remaining_member_arg().await?;
    let author = ctx.author_id();
    let user = ctx
        .try_with_town(|town| {
            let user = town.resolve_player(arg, author)?;
            change(town, user)?;
            Ok(user)
        })
        .await?;
    ctx.sync_nicknames(&[user]).await
}

pub async fn townsquare(ctx: CommandContext) -> CommandResult {
    let players = ctx.with_town(|town| town.players().to_vec()).await?;
    let names: Vec<(Id<UserMarker>, String)> = players
        .into_iter()
        .map(|player| (player, ctx.display_name(player)))
        .collect();

    let (mut lines, count, alive, votes) = ctx
        .with_town(move |town| {
            let lines = names
                .iter()
                .filter(|(player, _)| town.is_player(*player))
                .map(|(player, name)| {
                    let info = town.info(*player);
                    let parts = town.format().parts(&info, name);
                    format!(
                        "{}{}{}{} {}",
                        seat_digits(info.seat.unwrap_or_default()),
                        parts.dead,
                        parts.votes,
                        parts.traveling,
                        escape_markdown(&parts.nick)
                    )
                })
                .collect::<Vec<_>>();
            (lines, town.character_count(), town.alive_count(), town.votes_to_execute())
        })
        .await?;

    if let Some(count) = count {
        lines.push(count.to_string());
    }
    lines.push(ctx.translate_with_args(
        TownString::PlayersAlive,
        &FluArgs::with_capacity(1).insert("alive", alive.to_string()).generate(),
    ));
    lines.push(ctx.translate_with_args(
        TownString::VotesToExecute,
        &FluArgs::with_capacity(1).insert("votes", votes.to_string()).generate(),
    ));

    let embed = EmbedBuilder::new()
        .color(TOWNSQUARE_COLOR)
        .description(lines.join("\n"))
        .build();
    ctx.reply_embed(embed).await?;
    Ok(())
}

pub async fn count(ctx: CommandContext) -> CommandResult {
    let count = ctx
        .with_town(|town| town.character_count())
        .await?
        .ok_or(TownError::NotEnoughPlayers)?;
    let args = FluArgs::with_capacity(4)
        .insert("townsfolk", count.townsfolk.to_string())
        .insert("outsiders", count.outsiders.to_string())
        .insert("minions", count.minions.to_string())
        .insert("demons", count.demons.to_string())
        .generate();
    ctx.reply(TownString::CharacterCount, args).await?;
    Ok(())
}

pub async fn public(mut ctx: CommandContext) -> CommandResult {
    let statement = ctx.parser.get_remaining();
    if statement.trim().is_empty() {
        return Err(TownError::EmptyStatement.into());
    }
    let author = ctx.author_id();
    let display_name = ctx.display_name(author);
    let nick = ctx
        .with_town(move |town| town.format().base_nick(&display_name).to_string())
        .await?;

    let author = EmbedAuthorBuilder::new(escape_markdown(&nick)).icon_url(ImageSource::url(ctx.avatar_url(author))?);
    let embed = EmbedBuilder::new()
        .color(STATEMENT_COLOR)
        .description(statement)
        .author(author)
        .build();
    ctx.reply_embed(embed).await?;
    Ok(())
}

/// Moves the author to one of the voice channels of the town.
pub async fn go(mut ctx: CommandContext) -> CommandResult {
    let guild_id = ctx.get_guild_id()?;
    let category = ctx.get_category()?;
    let input = if ctx.parser.has_next() {
        Some(ctx.parser.get_remaining())
    } else {
        None
    };

    let channels = voice_channels(&ctx, category)?;
    let target = pick_voice_channel(&channels, input.as_deref())?;

    let author = ctx.author_id();
    if ctx.bot_context.cache.voice_state(author, guild_id).is_none() {
        return Err(TownError::NotInVoice.into());
    }
    ctx.bot_context
        .http
        .update_guild_member(guild_id, author)
        .channel_id(Some(target))
        .await
        .map_err(|_| TownError::NotInVoice)?;
    Ok(())
}

/// The voice channels of a category, top to bottom.
fn voice_channels(
    ctx: &CommandContext,
    category: Id<ChannelMarker>,
) -> Result<Vec<(Id<ChannelMarker>, String)>, TownError> {
    let guild_id = match ctx.message.guild_id {
        Some(guild_id) => guild_id,
        None => return Err(TownError::BadSidebar),
    };
    let channel_ids: Vec<Id<ChannelMarker>> = match ctx.bot_context.cache.guild_channels(guild_id) {
        Some(channels) => channels.iter().copied().collect(),
        None => vec![],
    };

    let mut channels = channel_ids
        .into_iter()
        .filter_map(|channel_id| ctx.bot_context.cache.channel(channel_id).map(|channel| channel.clone()))
        .filter(|channel| {
            channel.parent_id == Some(category)
                && matches!(channel.kind, ChannelType::GuildVoice | ChannelType::GuildStageVoice)
        })
        .map(|channel| (channel.position.unwrap_or_default(), channel.id, channel.name.unwrap_or_default()))
        .collect::<Vec<_>>();
    channels.sort_by_key(|(position, id, _)| (*position, *id));
    Ok(channels.into_iter().map(|(_, id, name)| (id, name)).collect())
}

/// Picks a voice channel by index, mention or name. Nothing picks the top one.
fn pick_voice_channel(
    channels: &[(Id<ChannelMarker>, String)],
    input: Option<&str>,
) -> Result<Id<ChannelMarker>, TownError> {
    let input = match input.map(str::trim) {
        None | Some("") => return channels.first().map(|(id, _)| *id).ok_or(TownError::BadSidebar),
        Some(input) => input,
    };

    if let Some(mentioned) = matchers::get_channel_id(input) {
        return channels
            .iter()
            .find(|(id, _)| id.get() == mentioned)
            .map(|(id, _)| *id)
            .ok_or(TownError::BadSidebar);
    }
    if let Ok(index) = input.parse::<i64>() {
        return usize::try_from(index)
            .ok()
            .and_then(|index| channels.get(index))
            .map(|(id, _)| *id)
            .ok_or(TownError::BadSidebar);
    }
    channels
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(input))
        .map(|(id, _)| *id)
        .ok_or(TownError::BadSidebar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels() -> Vec<(Id<ChannelMarker>, String)> {
        vec![
            (Id::new(10), String::from("Town Square")),
            (Id::new(11), String::from("Sidebar 1")),
            (Id::new(12), String::from("Sidebar 2")),
        ]
    }

    #[test]
    fn no_input_goes_to_the_top() {
        assert_eq!(pick_voice_channel(&channels(), None).unwrap(), Id::new(10));
        assert_eq!(pick_voice_channel(&channels(), Some(" ")).unwrap(), Id::new(10));
        assert!(matches!(pick_voice_channel(&[], None), Err(TownError::BadSidebar)));
    }

    #[test]
    fn sidebars_by_number() {
        assert_eq!(pick_voice_channel(&channels(), Some("2")).unwrap(), Id::new(12));
        assert_eq!(pick_voice_channel(&channels(), Some("0")).unwrap(), Id::new(10));
        assert!(matches!(pick_voice_channel(&channels(), Some("3")), Err(TownError::BadSidebar)));
        assert!(matches!(pick_voice_channel(&channels(), Some("-1")), Err(TownError::BadSidebar)));
    }

    #[test]
    fn sidebars_by_name_or_mention() {
        assert_eq!(pick_voice_channel(&channels(), Some("sidebar 1")).unwrap(), Id::new(11));
        assert_eq!(pick_voice_channel(&channels(), Some("<#12>")).unwrap(), Id::new(12));
        assert!(matches!(pick_voice_channel(&channels(), Some("<#99>")), Err(TownError::BadSidebar)));
        assert!(matches!(pick_voice_channel(&channels(), Some("Kitchen")), Err(TownError::BadSidebar)));
    }
}
