use super::handlers;
use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

impl Command {
    fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

impl<'a> CommandInvocation<'a> {
    pub fn args_iter(&self) -> impl Iterator<Item = &'a str> {
        self.args.split_whitespace()
    }

    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args_iter().nth(index)
    }

    pub fn args_len(&self) -> usize {
        self.args_iter().count()
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands().iter().find(|command| command.answers_to(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "claude",
        aliases: &[],
        usage: "/claude",
        help: "Switch to Claude",
        handler: handlers::provider::handle_claude,
    },
    Command {
        name: "chatgpt",
        aliases: &["gpt"],
        usage: "/chatgpt",
        help: "Switch to ChatGPT",
        handler: handlers::provider::handle_chatgpt,
    },
    Command {
        name: "provider",
        aliases: &[],
        usage: "/provider [id]",
        help: "Show the current provider or switch to another",
        handler: handlers::provider::handle_provider,
    },
    Command {
        name: "personality",
        aliases: &[],
        usage: "/personality <name>",
        help: "Change the main AI's personality (clears its history)",
        handler: handlers::core::handle_personality,
    },
    Command {
        name: "personalities",
        aliases: &[],
        usage: "/personalities",
        help: "List available personalities",
        handler: handlers::core::handle_personalities,
    },
    Command {
        name: "addfriend",
        aliases: &[],
        usage: "/addfriend <name> [personality]",
        help: "Add a friend persona",
        handler: handlers::friends::handle_add_friend,
    },
    Command {
        name: "friends",
        aliases: &[],
        usage: "/friends",
        help: "List all friends",
        handler: handlers::friends::handle_friends,
    },
    Command {
        name: "befriend",
        aliases: &[],
        usage: "/befriend <name>",
        help: "Talk to a friend",
        handler: handlers::friends::handle_befriend,
    },
    Command {
        name: "back",
        aliases: &[],
        usage: "/back",
        help: "Switch back to the main AI",
        handler: handlers::friends::handle_back,
    },
    Command {
        name: "removefriend",
        aliases: &[],
        usage: "/removefriend <name>",
        help: "Remove a friend and their history",
        handler: handlers::friends::handle_remove_friend,
    },
    Command {
        name: "groupchat",
        aliases: &[],
        usage: "/groupchat <name1> <name2> ...",
        help: "Start a group chat",
        handler: handlers::friends::handle_group_chat,
    },
    Command {
        name: "endgroupchat",
        aliases: &[],
        usage: "/endgroupchat",
        help: "End group chat mode",
        handler: handlers::friends::handle_end_group_chat,
    },
    Command {
        name: "clear",
        aliases: &[],
        usage: "/clear [name]",
        help: "Clear the current (or a friend's) conversation history",
        handler: handlers::core::handle_clear,
    },
    Command {
        name: "history",
        aliases: &[],
        usage: "/history [name]",
        help: "Show the current (or a friend's) conversation history",
        handler: handlers::core::handle_history,
    },
    Command {
        name: "help",
        aliases: &[],
        usage: "/help",
        help: "Show this help message",
        handler: handlers::core::handle_help,
    },
    Command {
        name: "quit",
        aliases: &["exit"],
        usage: "/quit",
        help: "Exit the chatbot",
        handler: handlers::core::handle_quit,
    },
];
