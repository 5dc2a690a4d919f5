use lazy_static::lazy_static;

use crate::command;
use crate::commands::meta::nodes::{CommandFlags, CommandGroup, RootNode};

mod help;
mod manage;
pub mod meta;
mod nominations;
mod players;
mod setup;
mod storytellers;

lazy_static! {
    pub static ref ROOT_NODE: RootNode = RootNode::new(vec![
        command!(
            name: "play",
            aliases: [],
            handler: setup::play,
            group: CommandGroup::Setup,
            flags: CommandFlags::SETUP,
            usage: "play [name]",
            description: "Join the game yourself, or add someone by their exact name or tag.",
        ),
        command!(
            name: "unplay",
            aliases: ["quit"],
            handler: setup::unplay,
            group: CommandGroup::Setup,
            flags: CommandFlags::SETUP,
            usage: "unplay [seat|name]",
            description: "Leave the game, restoring your name. Everyone after you moves up a seat.",
        ),
        command!(
            name: "travel",
            aliases: [],
            handler: setup::travel,
            group: CommandGroup::Setup,
            flags: CommandFlags::SETUP,
            usage: "travel [seat|name]",
            description: "Join the game as a traveler.",
        ),
        command!(
            name: "untravel",
            aliases: [],
            handler: setup::untravel,
            group: CommandGroup::Setup,
            flags: CommandFlags::SETUP,
            usage: "untravel [seat|name]",
            description: "Stop traveling but keep playing.",
        ),
        command!(
            name: "storytell",
            aliases: ["st"],
            handler: setup::storytell,
            group: CommandGroup::Setup,
            flags: CommandFlags::SETUP,
            usage: "storytell [name]",
            description: "Become a storyteller for the game.",
        ),
        command!(
            name: "unstorytell",
            aliases: ["unst"],
            handler: setup::unstorytell,
            group: CommandGroup::Setup,
            flags: CommandFlags::SETUP,
            usage: "unstorytell",
            description: "Remove all storytellers from the game.",
        ),
        command!(
            name: "sit",
            aliases: [],
            handler: setup::sit,
            group: CommandGroup::Setup,
            flags: CommandFlags::SETUP,
            usage: "sit <new-seat> [seat|name]",
            description: "Move to another seat. The occupant and everyone in between shift toward your old seat.",
        ),
        command!(
            name: "shuffle",
            aliases: [],
            handler: setup::shuffle,
            group: CommandGroup::Setup,
            flags: CommandFlags::SETUP,
            usage: "shuffle",
            description: "Shuffle the seat order.",
        ),
        command!(
            name: "lock",
            aliases: [],
            handler: storytellers::lock,
            group: CommandGroup::Storytellers,
            flags: CommandFlags::STORYTELLING,
            usage: "lock",
            description: "Start the game, freezing the player list and seat order.",
        ),
        command!(
            name: "unlock",
            aliases: [],
            handler: storytellers::unlock,
            group: CommandGroup::Storytellers,
            flags: CommandFlags::STORYTELLING,
            usage: "unlock",
            description: "Pause the game so players and seats can be changed again.",
        ),
        command!(
            name: "clear",
            aliases: [],
            handler: storytellers::clear,
            group: CommandGroup::Storytellers,
            flags: CommandFlags::STORYTELLING,
            usage: "clear",
            description: "End the game, restoring everyone's name and removing the town roles.",
        ),
        command!(
            name: "dead",
            aliases: [],
            handler: players::dead,
            group: CommandGroup::Players,
            flags: CommandFlags::GAME.union(CommandFlags::DELETE_INVOCATION),
            usage: "dead [seat|name]",
            description: "Mark a player as dead, with one ghost vote left.",
        ),
        command!(
            name: "voted",
            aliases: [],
            handler: players::voted,
            group: CommandGroup::Players,
            flags: CommandFlags::GAME.union(CommandFlags::DELETE_INVOCATION),
            usage: "voted [seat|name]",
            description: "Mark a dead player as having used their ghost vote.",
        ),
        command!(
            name: "alive",
            aliases: [],
            handler: players::alive,
            group: CommandGroup::Players,
            flags: CommandFlags::GAME.union(CommandFlags::DELETE_INVOCATION),
            usage: "alive [seat|name]",
            description: "Mark a player as alive again.",
        ),
        command!(
            name: "townsquare",
            aliases: ["ts"],
            handler: players::townsquare,
            group: CommandGroup::Players,
            flags: CommandFlags::IN_GAME,
            usage: "townsquare",
            description: "Show the seats, who is dead and how many votes an execution takes.",
        ),
        command!(
            name: "count",
            aliases: [],
            handler: players::count,
            group: CommandGroup::Players,
            flags: CommandFlags::IN_GAME,
            usage: "count",
            description: "Show how many of each character type this game has.",
        ),
        command!(
            name: "nominate",
            aliases: ["nom", "n"],
            handler: nominations::nominate,
            group: CommandGroup::Players,
            flags: CommandFlags::IN_GAME,
            usage: "nominate [nominator] <target>",
            description: "Nominate a player by seat or exact name. With two players the first one is the nominator.",
            subcommands: [
                command!(
                    name: "votes",
                    aliases: ["vote"],
                    handler: nominations::votes,
                    group: CommandGroup::Players,
                    flags: CommandFlags::IN_GAME,
                    usage: "nominate votes <number>",
                    description: "Mark the current or previous nomination with the number of votes it got.",
                ),
                command!(
                    name: "cancel",
                    aliases: ["delete", "del"],
                    handler: nominations::cancel,
                    group: CommandGroup::Players,
                    flags: CommandFlags::IN_GAME,
                    usage: "nominate cancel",
                    description: "Delete the current or previous nomination.",
                ),
            ],
        ),
        command!(
            name: "public",
            aliases: ["pub", "say"],
            handler: players::public,
            group: CommandGroup::Players,
            flags: CommandFlags::IN_GAME,
            usage: "public <text>",
            description: "Make a public statement that stands out.",
        ),
        command!(
            name: "go",
            aliases: [],
            handler: players::go,
            group: CommandGroup::Players,
            flags: CommandFlags::GAME.union(CommandFlags::DELETE_IMMEDIATELY),
            usage: "go [sidebar-number|name]",
            description: "Move to a voice channel of this town, 0 being the top one. Without a number you go to the top one.",
        ),
        command!(
            name: "town",
            aliases: [],
            handler: manage::town,
            group: CommandGroup::Manage,
            flags: CommandFlags::MANAGE,
            usage: "town",
            description: "Show the settings of this town category. Use the sub-commands to change them.",
            subcommands: [
                command!(
                    name: "enable",
                    aliases: [],
                    handler: manage::enable,
                    group: CommandGroup::Manage,
                    flags: CommandFlags::MANAGE,
                    usage: "town enable [category]",
                    description: "Enable the town commands in this or the given category.",
                ),
                command!(
                    name: "disable",
                    aliases: [],
                    handler: manage::disable,
                    group: CommandGroup::Manage,
                    flags: CommandFlags::MANAGE,
                    usage: "town disable [category]",
                    description: "Disable the town commands in this or the given category.",
                ),
                command!(
                    name: "create",
                    aliases: [],
                    handler: manage::create,
                    group: CommandGroup::Manage,
                    flags: CommandFlags::MANAGE,
                    usage: "town create [private] <name>",
                    description: "Create a town category with a text channel, the Town Square and sidebars.",
                ),
                command!(
                    name: "setemoji",
                    aliases: [],
                    handler: manage::set_emoji,
                    group: CommandGroup::Manage,
                    flags: CommandFlags::MANAGE,
                    usage: "town setemoji <dead|vote|novote|traveling> <emoji>",
                    description: "Change an emoji used in nicknames.",
                ),
                command!(
                    name: "unsetemoji",
                    aliases: [],
                    handler: manage::unset_emoji,
                    group: CommandGroup::Manage,
                    flags: CommandFlags::MANAGE,
                    usage: "town unsetemoji <dead|vote|novote|traveling>",
                    description: "Go back to the default emoji.",
                ),
                command!(
                    name: "setrole",
                    aliases: [],
                    handler: manage::set_role,
                    group: CommandGroup::Manage,
                    flags: CommandFlags::MANAGE,
                    usage: "town setrole <player|traveler|storyteller> [role]",
                    description: "Set the role handed out during games, a new role is created when none is given.",
                ),
                command!(
                    name: "unsetrole",
                    aliases: [],
                    handler: manage::unset_role,
                    group: CommandGroup::Manage,
                    flags: CommandFlags::MANAGE,
                    usage: "town unsetrole <player|traveler|storyteller>",
                    description: "Stop handing out a role during games.",
                ),
                command!(
                    name: "set",
                    aliases: [],
                    handler: manage::set,
                    group: CommandGroup::Manage,
                    flags: CommandFlags::MANAGE,
                    usage: "town set <key> <value>",
                    description: "Set any town setting directly.",
                ),
                command!(
                    name: "unset",
                    aliases: [],
                    handler: manage::unset,
                    group: CommandGroup::Manage,
                    flags: CommandFlags::MANAGE,
                    usage: "town unset <key>",
                    description: "Return a town setting to its default.",
                ),
            ],
        ),
        command!(
            name: "help",
            aliases: [],
            handler: help::help,
            group: CommandGroup::General,
            flags: CommandFlags::empty(),
            usage: "help [command]",
            description: "List the commands, or explain one of them.",
        ),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_lead_to_the_same_command() {
        assert_eq!(ROOT_NODE.find(["ts"])[0].name, "townsquare");
        assert_eq!(ROOT_NODE.find(["QUIT"])[0].name, "unplay");
        let path = ROOT_NODE.find(["n", "vote"]);
        assert_eq!(path.len(), 2);
        assert_eq!(path[1].name, "votes");
    }

    #[test]
    fn lookup_stops_at_arguments() {
        let path = ROOT_NODE.find(["town", "create", "private", "Ravenswood"]);
        assert_eq!(path.len(), 2);
        assert_eq!(path[1].name, "create");
        assert!(ROOT_NODE.find(["ravenswood"]).is_empty());
    }

    #[test]
    fn usage_starts_with_the_command_path() {
        for command in &ROOT_NODE.command_list {
            assert!(command.usage.starts_with(&command.name), "{}", command.name);
            for sub in &command.node_list {
                assert!(sub.usage.starts_with(&format!("{} {}", command.name, sub.name)), "{}", sub.name);
            }
        }
    }

    #[test]
    fn every_group_has_commands() {
        for group in CommandGroup::ALL.iter() {
            assert!(ROOT_NODE.by_group.get(group).map_or(false, |commands| !commands.is_empty()));
        }
    }

    #[test]
    fn game_commands_are_limited_to_towns() {
        for command in &ROOT_NODE.command_list {
            match command.group {
                CommandGroup::Setup | CommandGroup::Storytellers | CommandGroup::Players => {
                    assert!(command.flags.contains(CommandFlags::GAME), "{}", command.name)
                }
                CommandGroup::Manage => assert!(command.flags.contains(CommandFlags::MANAGE_CHANNELS)),
                CommandGroup::General => assert!(command.flags.is_empty()),
            }
        }
    }
}
