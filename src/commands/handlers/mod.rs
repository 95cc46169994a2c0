pub(super) mod core;
pub(super) mod friends;
pub(super) mod provider;

use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::App;
use crate::core::error::ChatError;

pub(super) fn usage_warning(app: &mut App, usage: &'static str) -> CommandResult {
    app.warning(format!("Usage: {usage}"));
    CommandResult::Continue
}

pub(super) fn required_arg<'a>(
    app: &mut App,
    invocation: &CommandInvocation<'a>,
    index: usize,
    usage: &'static str,
) -> Option<&'a str> {
    match invocation.arg(index) {
        Some(value) => Some(value),
        None => {
            usage_warning(app, usage);
            None
        }
    }
}

pub(super) fn report_error(app: &mut App, err: ChatError) -> CommandResult {
    app.error(err.to_string());
    CommandResult::Continue
}
