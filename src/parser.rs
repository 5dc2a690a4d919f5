use std::sync::Arc;

use log::{debug, trace};
use twilight_model::channel::Message;

use crate::commands::meta::nodes::CommandNode;
use crate::commands::ROOT_NODE;
use crate::core::{BotContext, CommandContext, CommandMessage};
use crate::error::{EventHandlerError, ParseError};
use crate::utils::matchers;

/// Raw snowflakes are at least this long, anything shorter is a seat number.
const MIN_SNOWFLAKE_LENGTH: usize = 15;

/// How a member was referred to in a command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberToken {
    Seat(i64),
    Id(u64),
    Name(String),
}

impl MemberToken {
    /// Classifies an argument that points at a member: a seat number, a mention or raw id, or a name.
    pub fn classify(input: &str) -> Self {
        let input = input.trim();
        if let Some(id) = matchers::get_mention(input) {
            return MemberToken::Id(id);
        }
        if input.len() < MIN_SNOWFLAKE_LENGTH {
            if let Ok(seat) = input.parse::<i64>() {
                return MemberToken::Seat(seat);
            }
        } else if let Ok(id) = input.parse::<u64>() {
            return MemberToken::Id(id);
        }
        MemberToken::Name(input.strip_prefix('@').unwrap_or(input).to_string())
    }

    /// Same as [`classify`](Self::classify) for arguments that can't be seats.
    pub fn classify_name(input: &str) -> Self {
        let input = input.trim();
        match matchers::get_mention(input).or_else(|| input.parse().ok()) {
            Some(id) => MemberToken::Id(id),
            None => MemberToken::Name(input.strip_prefix('@').unwrap_or(input).to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Parser {
    pub parts: Vec<String>,
    pub index: usize,
}

impl Parser {
    pub fn new(content: &str) -> Self {
        let temp = content.split_whitespace().collect::<Vec<&str>>();
        let mut parts = vec![];
        let mut index = 0;
        while index < temp.len() {
            let mut part = temp[index].to_string();
            index += 1;
            if part.starts_with('"') && !(part.len() > 1 && part.ends_with('"')) {
                let mut new_part = part.clone();
                let mut new_index = index;
                while new_index < temp.len() {
                    new_part += " ";
                    new_part += temp[new_index];
                    new_index += 1;
                    if new_part.ends_with('"') {
                        index = new_index;
                        part = new_part.clone();
                        break;
                    }
                }
            }
            if let Some(unquoted) = part.strip_prefix('"').and_then(|p| p.strip_suffix('"')) {
                part = unquoted.to_string();
            }

            parts.push(part);
        }
        Parser { parts, index: 0 }
    }

    pub fn get_command(&mut self) -> Vec<Arc<CommandNode>> {
        let nodes = ROOT_NODE.find(self.parts[self.index..].iter().map(String::as_str));
        for node in &nodes {
            debug!("Found a command node: {}", node.name);
        }
        self.index += nodes.len();
        nodes
    }

    /// Returns the next part of a message if the end of the
    /// message hasn't yet been reached.
    pub fn get_next(&mut self) -> Option<&str> {
        if self.index < self.parts.len() {
            let result = &self.parts[self.index];
            self.index += 1;
            Some(result)
        } else {
            None
        }
    }

    pub fn peek(&self) -> Option<&str> {
        self.parts.get(self.index).map(String::as_str)
    }

    /// Everything that is left, consuming it.
    pub fn get_remaining(&mut self) -> String {
        let remaining = self.parts[self.index..].join(" ");
        self.index = self.parts.len();
        remaining
    }

    pub fn has_next(&self) -> bool {
        self.index < self.parts.len()
    }

    pub fn get_number(&mut self) -> Result<i64, ParseError> {
        let input = self.get_next().ok_or(ParseError::MissingArgument)?;
        input
            .parse()
            .map_err(|_| ParseError::WrongArgumentType(String::from("number")))
    }

    /// The rest of the message as a seat, mention, id or name, `None` when nothing is left.
    pub fn get_member_token(&mut self) -> Option<MemberToken> {
        if self.has_next() {
            Some(MemberToken::classify(&self.get_remaining()))
        } else {
            None
        }
    }

    pub fn ensure_done(&self) -> Result<(), ParseError> {
        if self.has_next() {
            Err(ParseError::TooManyArguments)
        } else {
            Ok(())
        }
    }

    pub async fn figure_it_out(prefix: &str, message: Message, ctx: Arc<BotContext>) -> Result<(), EventHandlerError> {
        //Create parser to process message
        let mut parser = Parser::new(&message.content[prefix.len()..]);
        trace!("Parser processing message: {:?}", &message.content);

        //parse the message to get the nodes
        let command_nodes = parser.get_command();

        //Do we even have a node to execute?
        let node = match command_nodes.last() {
            Some(node) => node.clone(),
            None => return Ok(()),
        };

        let path = command_nodes
            .iter()
            .map(|node| node.name.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let command_message = CommandMessage {
            id: message.id,
            channel_id: message.channel_id,
            guild_id: message.guild_id,
            author: message.author,
            content: message.content,
        };

        let context = CommandContext::new(ctx, command_message, parser, path);
        context.execute(&node).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(content: &str) -> Vec<String> {
        Parser::new(content).parts
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(parts("nominate  1\t2"), vec!["nominate", "1", "2"]);
        assert!(parts("   ").is_empty());
    }

    #[test]
    fn quoted_parts_stay_together() {
        assert_eq!(
            parts(r#"nominate "Crab Person" "Ferris the Crab""#),
            vec!["nominate", "Crab Person", "Ferris the Crab"]
        );
        assert_eq!(parts(r#"play "Ferris""#), vec!["play", "Ferris"]);
        // an unclosed quote is kept as it was typed
        assert_eq!(parts(r#"say "hello there"#), vec!["say", "\"hello", "there"]);
        assert_eq!(parts(r#"say ""#), vec!["say", "\""]);
    }

    #[test]
    fn cursor_moves_through_the_parts() {
        let mut parser = Parser::new("sit 3 Crab Person");
        assert_eq!(parser.get_next(), Some("sit"));
        assert_eq!(parser.peek(), Some("3"));
        assert_eq!(parser.get_number().unwrap(), 3);
        assert!(parser.has_next());
        assert_eq!(parser.get_remaining(), "Crab Person");
        assert!(!parser.has_next());
        assert_eq!(parser.get_next(), None);
        assert!(parser.ensure_done().is_ok());
    }

    #[test]
    fn numbers_are_checked() {
        let mut parser = Parser::new("votes many");
        parser.get_next();
        assert!(matches!(parser.get_number(), Err(ParseError::WrongArgumentType(_))));
        assert!(matches!(parser.get_number(), Err(ParseError::MissingArgument)));
    }

    #[test]
    fn commands_are_found_by_name_and_alias() {
        let mut parser = Parser::new("N Votes 5");
        let nodes = parser.get_command();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].name, "nominate");
        assert_eq!(nodes[1].name, "votes");
        assert_eq!(parser.get_number().unwrap(), 5);

        let mut parser = Parser::new("unknown stuff");
        assert!(parser.get_command().is_empty());
        assert_eq!(parser.index, 0);
    }

    #[test]
    fn member_arguments_are_classified() {
        assert_eq!(MemberToken::classify("4"), MemberToken::Seat(4));
        assert_eq!(MemberToken::classify("-1"), MemberToken::Seat(-1));
        assert_eq!(MemberToken::classify("<@!80351110224678912>"), MemberToken::Id(80351110224678912));
        assert_eq!(MemberToken::classify("80351110224678912"), MemberToken::Id(80351110224678912));
        assert_eq!(MemberToken::classify("@Ferris"), MemberToken::Name(String::from("Ferris")));
        assert_eq!(
            MemberToken::classify("Crab Person#0001"),
            MemberToken::Name(String::from("Crab Person#0001"))
        );
        assert_eq!(MemberToken::classify_name("4"), MemberToken::Id(4));
        assert_eq!(MemberToken::classify_name("Ferris"), MemberToken::Name(String::from("Ferris")));
    }
}
