use crate::core::CommandContext;
use crate::error::CommandResult;
use crate::town::RoleKind;

pub async fn lock(ctx: CommandContext) -> CommandResult {
    ctx.with_town(|town| town.lock()).await?;
    ctx.acknowledge().await
}

pub async fn unlock(ctx: CommandContext) -> CommandResult {
    ctx.with_town(|town| town.unlock()).await?;
    ctx.acknowledge().await
}

/// Ends the game: names are restored, town roles taken away and the town forgotten.
pub async fn clear(ctx: CommandContext) -> CommandResult {
    let guild_id = ctx.get_guild_id()?;
    let category = ctx.get_category()?;
    let town = match ctx.bot_context.remove_town(category) {
        Some(town) => town,
        None => return ctx.acknowledge().await,
    };

    let everyone = town.everyone();
    let names = everyone
        .iter()
        .map(|user| {
            let display_name = ctx.display_name(*user);
            let restored = town.format().restored_nickname(&display_name);
            (*user, display_name, restored)
        })
        .collect();
    ctx.apply_nicknames(names).await?;

    for user in everyone {
        let kinds = [
            (RoleKind::Player, town.is_player(user)),
            (RoleKind::Traveler, town.is_traveler(user)),
            (RoleKind::Storyteller, town.is_storyteller(user)),
        ];
        for (kind, holds) in kinds.iter() {
            if let (Some(role), true) = (town.role(*kind), *holds) {
                ctx.set_role(guild_id, user, role, false).await;
            }
        }
    }

    ctx.acknowledge().await
}
