use super::{report_error, required_arg, usage_warning};
use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::App;
use crate::core::error::ChatError;
use crate::core::message::Notice;
use crate::core::mode::Mode;
use crate::core::personality::DEFAULT_FRIEND_PERSONALITY;

const USAGE_ADD_FRIEND: &str = "/addfriend <name> [personality]  (e.g. /addfriend Alex funny)";
const USAGE_BEFRIEND: &str = "/befriend <name>  (e.g. /befriend Alex)";
const USAGE_REMOVE_FRIEND: &str = "/removefriend <name>";
const RULE: &str = "------------------------------------------------------------";

pub(crate) fn handle_add_friend(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args_len() > 2 {
        return usage_warning(app, USAGE_ADD_FRIEND);
    }
    let Some(name) = required_arg(app, &invocation, 0, USAGE_ADD_FRIEND) else {
        return CommandResult::Continue;
    };
    let personality = invocation
        .arg(1)
        .unwrap_or(DEFAULT_FRIEND_PERSONALITY.as_str());

    match app.session.add_friend(name, personality) {
        Ok(persona) => {
            app.info(format!(
                "Friend '{}' added with {} personality!",
                persona.name, persona.personality
            ));
            CommandResult::Continue
        }
        Err(err) => report_error(app, err),
    }
}

pub(crate) fn handle_friends(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let session = &app.session;
    if session.registry().is_empty() {
        app.notify(Notice::listing(
            "No friends added yet. Use /addfriend <name> to add one!",
        ));
        return CommandResult::Continue;
    }

    let mut text = format!("👥 Your Friends:\n{RULE}");
    for persona in session.registry().list() {
        let marker = match session.mode() {
            Mode::ActiveFriend(active) if persona.matches(active) => " (active)",
            Mode::GroupChat(members) if members.iter().any(|m| persona.matches(m)) => {
                " (in group chat)"
            }
            _ => "",
        };
        text.push_str(&format!(
            "\n  • {}{marker}: {} personality",
            persona.name, persona.personality
        ));
    }
    text.push_str(&format!("\n{RULE}"));
    app.notify(Notice::listing(text));
    CommandResult::Continue
}

pub(crate) fn handle_befriend(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args_len() > 1 {
        return usage_warning(app, USAGE_BEFRIEND);
    }
    let Some(name) = required_arg(app, &invocation, 0, USAGE_BEFRIEND) else {
        return CommandResult::Continue;
    };

    match app.session.switch_to_friend(name).map(|p| p.name.clone()) {
        Ok(name) => {
            app.info(format!("Switched to {name}'s perspective"));
            CommandResult::Continue
        }
        Err(err) => report_error(app, err),
    }
}

pub(crate) fn handle_back(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    if app.session.back_to_main() {
        app.info("Switched back to main AI chatbot");
    } else {
        app.notify(Notice::listing("You're already using the main AI chatbot."));
    }
    CommandResult::Continue
}

pub(crate) fn handle_remove_friend(
    app: &mut App,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if invocation.args_len() > 1 {
        return usage_warning(app, USAGE_REMOVE_FRIEND);
    }
    let Some(name) = required_arg(app, &invocation, 0, USAGE_REMOVE_FRIEND) else {
        return CommandResult::Continue;
    };

    match app.session.remove_friend(name) {
        Ok(removal) => {
            app.info(format!("Friend '{}' removed.", removal.persona.name));
            if removal.returned_to_main {
                app.info("Switched back to main AI chatbot");
            }
            CommandResult::Continue
        }
        Err(err) => report_error(app, err),
    }
}

pub(crate) fn handle_group_chat(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let names: Vec<&str> = invocation.args_iter().collect();

    match app.session.start_group_chat(names.as_slice()) {
        Ok(start) => {
            if !start.skipped.is_empty() {
                app.warning(format!(
                    "Skipping unknown friends: {}",
                    start.skipped.join(", ")
                ));
            }
            app.info(format!(
                "Group chat started with: {}",
                start.members.join(", ")
            ));
            app.notify(Notice::listing(
                "Friends will take turns responding. Type /endgroupchat to stop.",
            ));
            CommandResult::Continue
        }
        Err(ChatError::NotFound(_)) => {
            app.error("No valid friends found. Add friends first with /addfriend");
            CommandResult::Continue
        }
        Err(err) => report_error(app, err),
    }
}

pub(crate) fn handle_end_group_chat(
    app: &mut App,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    if app.session.end_group_chat() {
        app.info("Group chat ended");
    } else {
        app.warning("No group chat is running.");
    }
    CommandResult::Continue
}
