mod handlers;
mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation};

use crate::core::app::App;

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    Quit,
    ProcessAsMessage(String),
}

/// Dispatch one line of input. Lines that are not commands come back as
/// [`CommandResult::ProcessAsMessage`]; blank lines are ignored.
pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return CommandResult::Continue;
    }
    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(trimmed.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, char::is_whitespace);
    let command_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    match find_command(command_name) {
        Some(command) => {
            let invocation = CommandInvocation {
                input: trimmed,
                args,
            };
            (command.handler)(app, invocation)
        }
        None => {
            app.warning(format!(
                "Unknown command: /{command_name}. Type /help for available commands."
            ));
            CommandResult::Continue
        }
    }
}
