use twilight_util::builder::embed::{EmbedAuthorBuilder, EmbedBuilder, ImageSource};

use crate::core::CommandContext;
use crate::error::{CommandResult, ParseError, TownError};
use crate::parser::MemberToken;
use crate::town::digits::{vote_reactions, MAX_VOTES};
use crate::town::Nomination;
use crate::translation::{FluArgs, TownString};
use crate::utils::escape_markdown;

const EXECUTION_COLOR: u32 = 0x2e_cc71;
const EXILE_COLOR: u32 = 0xf1_c40f;

/// Makes room below a nomination for the reactions that record the votes.
const VOTE_SPACER: &str = "\n||\n||";

pub async fn nominate(mut ctx: CommandContext) -> CommandResult {
    ctx.try_with_town(|town| town.ensure_no_nomination()).await?;

    let mut tokens = vec![];
    while let Some(part) = ctx.parser.get_next() {
        tokens.push(MemberToken::classify(part));
    }
    if tokens.is_empty() {
        return Err(ParseError::MissingArgument.into());
    }
    if tokens.len() > 2 {
        return Err(ParseError::TooManyArguments.into());
    }

    let target_arg = ctx.member_arg(tokens.pop()).await?;
    let nominator_arg = match tokens.pop() {
        Some(token) => Some(ctx.member_arg(Some(token)).await?),
        None => None,
    };

    let author = ctx.author_id();
    let (nominator, target, exile) = ctx
        .try_with_town(|town| {
            let nominator = match nominator_arg {
                Some(arg) => town.resolve_player(arg, author)?,
                None => author,
            };
            let target = town.resolve_player(target_arg, author)?;
            Ok((nominator, target, town.is_traveler(target)))
        })
        .await?;

    let nominator_name = ctx.display_name(nominator);
    let target_name = ctx.display_name(target);
    let (nominator_nick, target_nick) = ctx
        .with_town(move |town| {
            let format = town.format();
            (
                escape_markdown(format.base_nick(&nominator_name)),
                escape_markdown(format.base_nick(&target_name)),
            )
        })
        .await?;

    let (key, color) = if exile {
        (TownString::NominationExile, EXILE_COLOR)
    } else {
        (TownString::NominationExecution, EXECUTION_COLOR)
    };
    let args = FluArgs::with_capacity(2)
        .insert("nominator", nominator_nick.as_str())
        .insert("target", target_nick.as_str())
        .generate();
    let announcement = ctx.translate_with_args(key, &args);

    let author = EmbedAuthorBuilder::new(nominator_nick.clone()).icon_url(ImageSource::url(ctx.avatar_url(nominator))?);
    let embed = EmbedBuilder::new()
        .color(color)
        .description(announcement.clone())
        .author(author)
        .thumbnail(ImageSource::url(ctx.avatar_url(target))?)
        .build();

    let message = ctx
        .reply_with_embed(&format!("{}{}", announcement, VOTE_SPACER), embed)
        .await?;
    let nomination = Nomination {
        channel_id: message.channel_id,
        message_id: message.id,
    };

    // someone else could have nominated while this one was being sent
    if let Err(e) = ctx.try_with_town(|town| town.start_nomination(nomination)).await {
        ctx.delete_message(nomination.channel_id, nomination.message_id).await?;
        return Err(e);
    }
    Ok(())
}

/// Records the vote tally on the current nomination, or the previous one when none is open.
pub async fn votes(mut ctx: CommandContext) -> CommandResult {
    let votes = ctx.parser.get_number()?;
    ctx.parser.ensure_done()?;
    if votes < 0 || votes > MAX_VOTES as i64 {
        return Err(TownError::InvalidVoteCount(votes).into());
    }
    let reactions = vote_reactions(votes as u8)?;

    let nomination = ctx.try_with_town(|town| town.vote_target()).await?;
    ctx.bot_context
        .http
        .delete_all_reactions(nomination.channel_id, nomination.message_id)
        .await?;
    for reaction in reactions {
        ctx.react(nomination.channel_id, nomination.message_id, reaction)
            .await?;
    }
    ctx.with_town(|town| town.record_votes(nomination)).await?;
    Ok(())
}

pub async fn cancel(ctx: CommandContext) -> CommandResult {
    let nomination = ctx.try_with_town(|town| town.cancel_nomination()).await?;
    ctx.delete_message(nomination.channel_id, nomination.message_id).await
}
