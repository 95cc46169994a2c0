use super::{report_error, usage_warning};
use crate::commands::registry::CommandInvocation;
use crate::commands::{all_commands, CommandResult};
use crate::core::app::App;
use crate::core::error::ChatError;
use crate::core::message::{Notice, Role};
use crate::core::personality::Personality;

const USAGE_PERSONALITY: &str = "/personality <name>";
const RULE: &str = "------------------------------------------------------------";
pub(crate) const HISTORY_PREVIEW_CHARS: usize = 100;

/// Shorten `text` to its first `limit` characters, marking the cut.
pub(crate) fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

pub(crate) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    let mut help = String::from("Available commands:");
    for command in all_commands() {
        help.push_str(&format!("\n  {:width$}  {}", command.usage, command.help));
    }
    app.notify(Notice::listing(help));
    CommandResult::Continue
}

pub(crate) fn handle_quit(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.notify(Notice::listing("👋 Goodbye! Thanks for chatting!"));
    CommandResult::Quit
}

pub(crate) fn handle_personality(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args_len() != 1 {
        let mut text = format!("Usage: {USAGE_PERSONALITY}\nAvailable personalities:");
        for personality in Personality::ALL {
            text.push_str(&format!(
                "\n  - {personality}: {}",
                preview(personality.system_prompt(), 60)
            ));
        }
        text.push_str("\n\nOr use: /personalities to see full list");
        app.notify(Notice::listing(text));
        return CommandResult::Continue;
    }

    match invocation.args.parse::<Personality>() {
        Ok(personality) => {
            app.session.set_personality(personality);
            app.info(format!("Personality changed to: {personality}"));
            app.notify(Notice::listing(format!(
                "  {}",
                preview(personality.system_prompt(), HISTORY_PREVIEW_CHARS)
            )));
            CommandResult::Continue
        }
        Err(label) => report_error(app, ChatError::invalid_personality(label)),
    }
}

pub(crate) fn handle_personalities(
    app: &mut App,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    let current = app.session.personality();
    let mut text = format!("🎭 Available Personalities:\n{RULE}");
    for personality in Personality::ALL {
        let marker = if personality == current { " (current)" } else { "" };
        text.push_str(&format!(
            "\n{}{marker}:\n  {}",
            personality.as_str().to_uppercase(),
            personality.system_prompt()
        ));
    }
    text.push_str(&format!("\n{RULE}"));
    app.notify(Notice::listing(text));
    CommandResult::Continue
}

pub(crate) fn handle_clear(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args_len() > 1 {
        return usage_warning(app, "/clear [name]");
    }
    match app.session.clear_history(invocation.arg(0)) {
        Ok(cleared) => {
            app.info(format!(
                "Conversation history cleared for: {}",
                cleared.join(", ")
            ));
            CommandResult::Continue
        }
        Err(err) => report_error(app, err),
    }
}

pub(crate) fn handle_history(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args_len() > 1 {
        return usage_warning(app, "/history [name]");
    }
    let owners = match app.session.resolve_owners(invocation.arg(0)) {
        Ok(owners) => owners,
        Err(err) => return report_error(app, err),
    };

    for (speaker, owner) in owners {
        let turns = match app.session.history(&owner) {
            Ok(turns) => turns,
            Err(err) => return report_error(app, err),
        };
        if turns.is_empty() {
            app.notify(Notice::listing(format!(
                "No conversation history yet for {speaker}."
            )));
            continue;
        }

        let mut text = format!("📜 Conversation History ({speaker}):\n{RULE}");
        for (index, turn) in turns.iter().enumerate() {
            let who = match turn.role {
                Role::User => "You",
                Role::Assistant => speaker.as_str(),
            };
            text.push_str(&format!(
                "\n{}. {who}: {}",
                index + 1,
                preview(&turn.text, HISTORY_PREVIEW_CHARS)
            ));
        }
        text.push_str(&format!("\n{RULE}"));
        app.notify(Notice::listing(text));
    }
    CommandResult::Continue
}
