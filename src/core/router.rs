//! Routing one user message to whoever must answer it.
//!
//! A round appends the user turn to every target history first, snapshots
//! each history, then asks the provider for all replies concurrently.
//! Replies are recorded and returned in the mode's persona order, never in
//! completion order, and no target sees another target's reply from the
//! same round.

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::core::error::{ChatError, ProviderError};
use crate::core::message::Role;
use crate::core::provider::ProviderClient;
use crate::core::session::ChatSession;

/// One speaker's outcome for a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReply {
    pub speaker: String,
    pub outcome: Result<String, ProviderError>,
}

impl RoundReply {
    pub fn text(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn error(&self) -> Option<&ProviderError> {
        self.outcome.as_ref().err()
    }

    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }

    /// `speaker: text`, or the failure reason marked with ❌.
    pub fn render(&self) -> String {
        match &self.outcome {
            Ok(text) => format!("{}: {text}", self.speaker),
            Err(err) => format!("❌ {}: {err}", self.speaker),
        }
    }
}

pub struct ReplyRouter;

impl ReplyRouter {
    /// Run one round under the session's current mode.
    ///
    /// Provider failures become per-speaker error replies and never abort
    /// the round. The user turn stays in a failed speaker's history. An
    /// `Err` is returned only when the mode names a friend the session no
    /// longer knows, in which case nothing is recorded.
    pub async fn route(
        session: &mut ChatSession,
        client: &dyn ProviderClient,
        message: &str,
    ) -> Result<Vec<RoundReply>, ChatError> {
        let targets = session.reply_targets()?;
        debug!(mode = %session.mode().label(), targets = targets.len(), "routing message");

        let mut contexts = Vec::with_capacity(targets.len());
        for target in &targets {
            session
                .store_mut()
                .append(&target.owner, Role::User, message)?;
            contexts.push(session.store().snapshot(&target.owner)?);
        }

        let requests = targets
            .iter()
            .zip(&contexts)
            .map(|(target, context)| client.generate(context, target.system_prompt));
        let results = join_all(requests).await;

        let mut replies = Vec::with_capacity(targets.len());
        for (target, outcome) in targets.into_iter().zip(results) {
            match &outcome {
                Ok(text) => {
                    session
                        .store_mut()
                        .append(&target.owner, Role::Assistant, text.as_str())?;
                }
                Err(err) => warn!(speaker = %target.speaker, error = %err, "reply failed"),
            }
            replies.push(RoundReply {
                speaker: target.speaker,
                outcome,
            });
        }
        Ok(replies)
    }
}
