use twilight_model::id::marker::UserMarker;
use twilight_model::id::Id;

use crate::core::CommandContext;
use crate::error::{CommandError, CommandResult};
use crate::town::RoleKind;

pub async fn play(mut ctx: CommandContext) -> CommandResult {
    let user = match ctx.remaining_named_member().await? {
        Some(user) => user,
        None => ctx.author_id(),
    };
    join(&ctx, user).await
}

/// Seats someone at the end of the table, they stop storytelling first.
async fn join(ctx: &CommandContext, user: Id<UserMarker>) -> Result<(), CommandError> {
    let (was_storyteller, seat) = ctx
        .with_town(|town| {
            if town.is_player(user) {
                return (false, None);
            }
            // only the one joining stops storytelling, the others keep running the game
            (town.remove_storyteller(user), town.add_player(user))
        })
        .await?;
    if seat.is_none() {
        return Ok(());
    }
    if was_storyteller {
        ctx.remove_town_role(user, RoleKind::Storyteller).await?;
    }
    ctx.sync_nicknames(&[user]).await?;
    ctx.add_town_role(user, RoleKind::Player).await
}

pub async fn unplay(mut ctx: CommandContext) -> CommandResult {
    let arg = ctx.remaining_member_arg().await?;
    let author = ctx.author_id();
    let user = ctx.try_with_town(|town| town.resolve_member(arg, author)).await?;
    leave(&ctx, user).await
}

/// Takes someone out of the game and restores their name, everyone after them moves up.
async fn leave(ctx: &CommandContext, user: Id<UserMarker>) -> Result<(), CommandError> {
    let (was_traveling, moved) = ctx
        .with_town(|town| (town.set_traveling(user, false), town.remove_player(user)))
        .await?;
    if was_traveling {
        ctx.remove_town_role(user, RoleKind::Traveler).await?;
    }
    let mut changed = vec![user];
    changed.extend(moved);
    ctx.sync_nicknames(&changed).await?;
    ctx.remove_town_role(user, RoleKind::Player).await
}

pub async fn travel(mut ctx: CommandContext) -> CommandResult {
    let arg = ctx.remaining_member_arg().await?;
    let author = ctx.author_id();
    let user = ctx.try_with_town(|town| town.resolve_member(arg, author)).await?;
    join(&ctx, user).await?;

    let changed = ctx.with_town(|town| town.set_traveling(user, true)).await?;
    if changed {
        ctx.sync_nicknames(&[user]).await?;
        ctx.add_town_role(user, RoleKind::Traveler).await?;
    }
    Ok(())
}

pub async fn untravel(mut ctx: CommandContext) -> CommandResult {
    let arg = ctx.remaining_member_arg().await?;
    let author = ctx.author_id();
    let changed = ctx
        .try_with_town(|town| {
            let user = town.resolve_player(arg, author)?;
            Ok((user, town.set_traveling(user, false)))
        })
        .await?;
    if let (user, true) = changed {
        ctx.sync_nicknames(&[user]).await?;
        ctx.remove_town_role(user, RoleKind::Traveler).await?;
    }
    Ok(())
}

pub async fn storytell(mut ctx: CommandContext) -> CommandResult {
    let user = match ctx.remaining_named_member().await? {
        Some(user) => user,
        None => ctx.author_id(),
    };
    if ctx.with_town(|town| town.is_storyteller(user)).await? {
        return Ok(());
    }
    if ctx.with_town(|town| town.is_player(user)).await? {
        leave(&ctx, user).await?;
    }
    ctx.with_town(|town| town.add_storyteller(user)).await?;
    ctx.sync_nicknames(&[user]).await?;
    ctx.add_town_role(user, RoleKind::Storyteller).await
}

pub async fn unstorytell(ctx: CommandContext) -> CommandResult {
    let storytellers = ctx.with_town(|town| town.take_storytellers()).await?;
    ctx.sync_nicknames(&storytellers).await?;
    for storyteller in storytellers {
        ctx.remove_town_role(storyteller, RoleKind::Storyteller).await?;
    }
    Ok(())
}

pub async fn sit(mut ctx: CommandContext) -> CommandResult {
    let seat = ctx.parser.get_number()?;
    let arg = ctx.remaining_member_arg().await?;
    let author = ctx.author_id();
    let moved = ctx
        .try_with_town(|town| {
            let user = town.resolve_player(arg, author)?;
            town.sit(user, seat)
        })
        .await?;
    ctx.sync_nicknames(&moved).await
}

pub async fn shuffle(ctx: CommandContext) -> CommandResult {
    ctx.parser.ensure_done()?;
    let moved = ctx
        .with_town(|town| town.shuffle(&mut rand::thread_rng()))
        .await?;
    ctx.sync_nicknames(&moved).await
}
