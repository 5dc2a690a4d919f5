use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bitflags::bitflags;

use crate::core::CommandContext;
use crate::error::CommandResult;

pub type CommandResultOuter = Pin<Box<dyn Future<Output = CommandResult> + Send>>;
pub type CommandHandler = Box<dyn Fn(CommandContext) -> CommandResultOuter + Send + Sync>;

pub struct RootNode {
    pub all_commands: HashMap<String, Arc<CommandNode>>,
    pub command_list: Vec<Arc<CommandNode>>,
    pub by_group: HashMap<CommandGroup, Vec<Arc<CommandNode>>>,
}

impl RootNode {
    pub fn new(commands: Vec<Arc<CommandNode>>) -> Self {
        let (all_commands, command_list) = index_nodes(commands);
        let mut by_group: HashMap<CommandGroup, Vec<Arc<CommandNode>>> = HashMap::new();
        for command in &command_list {
            by_group.entry(command.group).or_default().push(command.clone());
        }
        RootNode {
            all_commands,
            command_list,
            by_group,
        }
    }

    /// Follows a path of command names and aliases as far as it goes.
    pub fn find<'a, I>(&self, path: I) -> Vec<Arc<CommandNode>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut nodes: Vec<Arc<CommandNode>> = vec![];
        for name in path {
            let name = name.to_lowercase();
            let found = match nodes.last() {
                Some(node) => node.sub_nodes.get(&name),
                None => self.all_commands.get(&name),
            };
            match found {
                Some(node) => nodes.push(node.clone()),
                None => break,
            }
        }
        nodes
    }
}

/// Builds the name and alias lookup for a list of nodes.
///
/// Panics when two nodes claim the same name, the command tree is static so this fails on startup.
pub fn index_nodes(nodes: Vec<Arc<CommandNode>>) -> (HashMap<String, Arc<CommandNode>>, Vec<Arc<CommandNode>>) {
    let mut map = HashMap::new();
    for node in &nodes {
        for name in std::iter::once(&node.name).chain(node.aliases.iter()) {
            if map.insert(name.clone(), node.clone()).is_some() {
                panic!(
                    "Tried to register command {} but a command is already registered under this name",
                    name
                );
            }
        }
    }
    (map, nodes)
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum CommandGroup {
    Setup,
    Storytellers,
    Players,
    Manage,
    General,
}

impl CommandGroup {
    pub const ALL: [CommandGroup; 5] = [
        CommandGroup::Setup,
        CommandGroup::Storytellers,
        CommandGroup::Players,
        CommandGroup::Manage,
        CommandGroup::General,
    ];

    pub fn get_name(&self) -> &'static str {
        match self {
            CommandGroup::Setup => "Setup",
            CommandGroup::Storytellers => "Storytellers",
            CommandGroup::Players => "Players",
            CommandGroup::Manage => "Manage Towns",
            CommandGroup::General => "General",
        }
    }
}

bitflags! {
    /// What has to hold before a command runs, and what happens to the message that invoked it.
    pub struct CommandFlags: u32 {
        const GUILD_ONLY            = 0x001;
        /// Only answers inside a category that is enabled as a town, stays silent elsewhere.
        const TOWN_CATEGORY         = 0x002;
        const UNLOCKED_TOWN         = 0x004;
        const LOCKED_TOWN           = 0x008;
        const STORYTELLER           = 0x010;
        const MANAGE_CHANNELS       = 0x020;
        const DELETE_INVOCATION     = 0x040;
        const DELETE_IMMEDIATELY    = 0x080;

        const GAME                  = Self::GUILD_ONLY.bits | Self::TOWN_CATEGORY.bits;
        const SETUP                 = Self::GAME.bits | Self::UNLOCKED_TOWN.bits | Self::DELETE_INVOCATION.bits;
        const IN_GAME               = Self::GAME.bits | Self::LOCKED_TOWN.bits | Self::DELETE_INVOCATION.bits;
        const STORYTELLING          = Self::GAME.bits | Self::STORYTELLER.bits | Self::DELETE_INVOCATION.bits;
        const MANAGE                = Self::GUILD_ONLY.bits | Self::MANAGE_CHANNELS.bits | Self::DELETE_INVOCATION.bits;
    }
}

pub struct CommandNode {
    pub name: String,
    pub aliases: Vec<String>,
    pub handler: CommandHandler,
    pub sub_nodes: HashMap<String, Arc<CommandNode>>,
    pub node_list: Vec<Arc<CommandNode>>,
    pub flags: CommandFlags,
    pub group: CommandGroup,
    pub usage: &'static str,
    pub description: &'static str,
}
