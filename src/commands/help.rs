use crate::commands::meta::nodes::{CommandGroup, CommandNode};
use crate::commands::ROOT_NODE;
use crate::core::CommandContext;
use crate::error::CommandResult;
use crate::translation::{FluArgs, TownString, Translations, DEFAULT_LANG};
use crate::utils::Emoji;

pub async fn help(mut ctx: CommandContext) -> CommandResult {
    let path = ctx.parser.get_remaining();
    let text = help_text(&ctx.bot_context.translations, ctx.prefix(), &path);
    ctx.reply_raw(&text).await?;
    Ok(())
}

/// An overview of every group, or the details of the command at `path`.
fn help_text(translations: &Translations, prefix: &str, path: &str) -> String {
    let parts = path.split_whitespace().collect::<Vec<_>>();
    if parts.is_empty() {
        return overview(translations, prefix);
    }

    let nodes = ROOT_NODE.find(parts.iter().copied());
    match nodes.last() {
        Some(node) if nodes.len() == parts.len() => command_help(translations, prefix, node),
        _ => translations.get_text_with_args(
            &DEFAULT_LANG,
            TownString::HelpUnknownCommand,
            &FluArgs::with_capacity(2)
                .insert("no", Emoji::No.for_chat())
                .insert("name", parts.join(" "))
                .generate(),
        ),
    }
}

fn overview(translations: &Translations, prefix: &str) -> String {
    let mut lines = vec![translations.get_text_with_args(
        &DEFAULT_LANG,
        TownString::HelpOverviewHeader,
        &FluArgs::with_capacity(1).insert("prefix", prefix).generate(),
    )];
    for group in CommandGroup::ALL.iter() {
        let commands = match ROOT_NODE.by_group.get(group) {
            Some(commands) if !commands.is_empty() => commands,
            _ => continue,
        };
        let args = FluArgs::with_capacity(2)
            .insert("group", group.get_name())
            .insert("commands", name_list(commands.iter().map(|node| node.name.as_str())))
            .generate();
        lines.push(translations.get_text_with_args(&DEFAULT_LANG, TownString::HelpGroupLine, &args));
    }
    lines.join("\n")
}

fn command_help(translations: &Translations, prefix: &str, node: &CommandNode) -> String {
    let args = FluArgs::with_capacity(3)
        .insert("prefix", prefix)
        .insert("usage", node.usage)
        .insert("description", node.description)
        .generate();
    let mut lines = vec![translations.get_text_with_args(&DEFAULT_LANG, TownString::HelpCommandUsage, &args)];

    if !node.aliases.is_empty() {
        let args = FluArgs::with_capacity(1)
            .insert("aliases", name_list(node.aliases.iter().map(String::as_str)))
            .generate();
        lines.push(translations.get_text_with_args(&DEFAULT_LANG, TownString::HelpAliases, &args));
    }
    if !node.node_list.is_empty() {
        let args = FluArgs::with_capacity(1)
            .insert("commands", name_list(node.node_list.iter().map(|sub| sub.name.as_str())))
            .generate();
        lines.push(translations.get_text_with_args(&DEFAULT_LANG, TownString::HelpSubcommands, &args));
    }
    lines.join("\n")
}

fn name_list<'a, I>(names: I) -> String
where
    I: Iterator<Item = &'a str>,
{
    names.map(|name| format!("`{}`", name)).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::translation::load_translations_from;

    fn translations() -> Translations {
        load_translations_from(&Path::new(env!("CARGO_MANIFEST_DIR")).join("lang")).unwrap()
    }

    #[test]
    fn overview_lists_every_group() {
        let text = help_text(&translations(), ".", "");
        assert!(text.starts_with("Use `.help <command>`"));
        for group in CommandGroup::ALL.iter() {
            assert!(text.contains(group.get_name()), "{}", group.get_name());
        }
        assert!(text.contains("`townsquare`"));
    }

    #[test]
    fn commands_show_usage_and_aliases() {
        let text = help_text(&translations(), "!", "ts");
        assert!(text.starts_with("`!townsquare`"));
        assert!(text.contains("Aliases: `ts`"));

        let text = help_text(&translations(), "!", "nominate");
        assert!(text.contains("`votes`, `cancel`"));

        let text = help_text(&translations(), "!", "nom vote");
        assert!(text.starts_with("`!nominate votes <number>`"));
    }

    #[test]
    fn unknown_commands_are_named() {
        let text = help_text(&translations(), ".", "town bogus");
        assert!(text.contains("`town bogus`"));
        assert!(text.starts_with(Emoji::No.for_chat()));
    }
}
