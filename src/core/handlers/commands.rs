use std::sync::Arc;

use log::trace;
use twilight_gateway::Event;

use crate::core::BotContext;
use crate::error::EventHandlerError;
use crate::parser::Parser;

pub async fn handle_event(event: Event, ctx: Arc<BotContext>) -> Result<(), EventHandlerError> {
    match event {
        Event::MessageCreate(msg) if !msg.author.bot => {
            trace!("Received a message from {}, saying {}", msg.author.name, msg.content);

            if let Some(prefix) = find_prefix(&msg.content, &ctx.config.prefix, ctx.bot_user.id.get()) {
                Parser::figure_it_out(&prefix, msg.0, ctx).await?;
            }
        }
        _ => (),
    }

    Ok(())
}

/// The prefix a message starts with, either the configured one or a mention of the bot.
fn find_prefix(content: &str, prefix: &str, bot_id: u64) -> Option<String> {
    if !prefix.is_empty() && content.starts_with(prefix) {
        return Some(prefix.to_string());
    }
    let mention_1 = format!("<@{}>", bot_id);
    let mention_2 = format!("<@!{}>", bot_id);
    if content.starts_with(&mention_1) {
        Some(mention_1)
    } else if content.starts_with(&mention_2) {
        Some(mention_2)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_and_mentions_are_found() {
        assert_eq!(find_prefix(".play", ".", 42), Some(String::from(".")));
        assert_eq!(find_prefix("<@42> play", ".", 42), Some(String::from("<@42>")));
        assert_eq!(find_prefix("<@!42>play", ".", 42), Some(String::from("<@!42>")));
        assert_eq!(find_prefix("<@43> play", ".", 42), None);
        assert_eq!(find_prefix("play", ".", 42), None);
        assert_eq!(find_prefix("play", "", 42), None);
    }
}
