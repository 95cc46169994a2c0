use super::usage_warning;
use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::App;
use crate::core::builtin_providers::ProviderId;
use crate::core::message::Notice;

const USAGE_PROVIDER: &str = "/provider [claude|chatgpt]";

pub(crate) fn handle_claude(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    switch_provider(app, ProviderId::Claude)
}

pub(crate) fn handle_chatgpt(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    switch_provider(app, ProviderId::ChatGpt)
}

pub(crate) fn handle_provider(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    match invocation.args_len() {
        0 => {
            let mut lines = vec![format!(
                "Current provider: {} ({})",
                app.providers.preferred().display_name(),
                app.providers.preferred()
            )];
            let preferred = app.providers.preferred();
            if let Some(active) = app.providers.active().filter(|id| *id != preferred) {
                lines.push(format!("Answering via fallback: {}", active.display_name()));
            }
            let available: Vec<_> = app
                .providers
                .available()
                .into_iter()
                .map(ProviderId::as_str)
                .collect();
            lines.push(format!("Configured: {}", available.join(", ")));
            app.notify(Notice::listing(lines.join("\n")));
            CommandResult::Continue
        }
        1 => match invocation.args.parse::<ProviderId>() {
            Ok(id) => switch_provider(app, id),
            Err(message) => {
                app.error(message);
                CommandResult::Continue
            }
        },
        _ => usage_warning(app, USAGE_PROVIDER),
    }
}

fn switch_provider(app: &mut App, id: ProviderId) -> CommandResult {
    match app.providers.switch(id) {
        Ok(()) => app.info(format!("Switched to {}", id.display_name())),
        Err(_) => app.error(format!(
            "{} not available (check API key)",
            id.display_name()
        )),
    }
    CommandResult::Continue
}
