use tracing::warn;

use crate::core::config::Config;
use crate::core::error::ChatError;
use crate::core::message::Notice;
use crate::core::mode::Mode;
use crate::core::personality::{Personality, DEFAULT_FRIEND_PERSONALITY};
use crate::core::provider::ProviderSet;
use crate::core::router::{ReplyRouter, RoundReply};
use crate::core::session::ChatSession;

/// Runtime state behind both the prompt loop and the web server.
pub struct App {
    pub session: ChatSession,
    pub providers: ProviderSet,
    notices: Vec<Notice>,
}

impl App {
    pub fn new(session: ChatSession, providers: ProviderSet) -> Self {
        Self {
            session,
            providers,
            notices: Vec::new(),
        }
    }

    /// Build the session described by `config`: main-bot personality and
    /// the configured friends. Bad entries are skipped with a warning
    /// notice rather than failing startup.
    pub fn from_config(config: &Config, providers: ProviderSet) -> Self {
        let mut notices = Vec::new();

        let personality = config.main_personality().unwrap_or_else(|label| {
            warn!(personality = %label, "unknown personality in config");
            notices.push(Notice::warning(format!(
                "Unknown personality '{label}' in config, using default"
            )));
            Personality::default()
        });

        let mut session = ChatSession::new(personality);
        for friend in &config.friends {
            let label = friend
                .personality
                .as_deref()
                .unwrap_or(DEFAULT_FRIEND_PERSONALITY.as_str());
            if let Err(err) = session.add_friend(&friend.name, label) {
                warn!(name = %friend.name, error = %err, "skipping friend from config");
                notices.push(Notice::warning(format!(
                    "Skipping friend '{}' from config: {err}",
                    friend.name
                )));
            }
        }

        let mut app = Self::new(session, providers);
        app.notices = notices;
        app
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notify(Notice::info(text));
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.notify(Notice::warning(text));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notify(Notice::error(text));
    }

    /// Drain pending notices in the order they were raised.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub async fn send_message(&mut self, message: &str) -> Result<Vec<RoundReply>, ChatError> {
        ReplyRouter::route(&mut self.session, &self.providers, message).await
    }

    /// Status line shown while a round is in flight.
    pub fn thinking_label(&self) -> String {
        match self.session.mode() {
            Mode::GroupChat(_) => "[GROUP CHAT] Friends discussing...".to_string(),
            _ => {
                let provider = self.providers.active().unwrap_or(self.providers.preferred());
                format!("[{}] Thinking...", provider.as_str().to_uppercase())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builtin_providers::ProviderId;
    use crate::core::config::FriendConfig;
    use crate::core::message::NoticeKind;
    use crate::utils::test_utils::ScriptedProvider;
    use std::sync::Arc;

    fn providers() -> ProviderSet {
        ProviderSet::new(ProviderId::Claude)
            .with_client(ProviderId::Claude, Arc::new(ScriptedProvider::new()))
    }

    #[test]
    fn config_friends_are_registered_and_bad_ones_skipped() {
        let config = Config {
            personality: Some("wise".to_string()),
            friends: vec![
                FriendConfig {
                    name: "Alex".to_string(),
                    personality: Some("funny".to_string()),
                },
                FriendConfig {
                    name: "Sam".to_string(),
                    personality: None,
                },
                FriendConfig {
                    name: "Bad".to_string(),
                    personality: Some("grumpy".to_string()),
                },
                FriendConfig {
                    name: "alex".to_string(),
                    personality: None,
                },
            ],
            ..Default::default()
        };

        let mut app = App::from_config(&config, providers());

        assert_eq!(app.session.personality(), Personality::Wise);
        let registry = app.session.registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("Sam").unwrap().personality,
            DEFAULT_FRIEND_PERSONALITY
        );

        let notices = app.take_notices();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.kind == NoticeKind::Warning));
        assert!(app.take_notices().is_empty());
    }

    #[tokio::test]
    async fn send_message_routes_through_the_preferred_provider() {
        let mut app = App::new(ChatSession::new(Personality::Funny), providers());
        let replies = app.send_message("knock knock").await.unwrap();
        assert_eq!(replies[0].text(), Some("funny: knock knock"));
    }

    #[test]
    fn thinking_label_reflects_mode_and_provider() {
        let mut app = App::new(ChatSession::default(), providers());
        assert_eq!(app.thinking_label(), "[CLAUDE] Thinking...");

        app.session.add_friend("Alex", "funny").unwrap();
        app.session.start_group_chat(&["Alex"]).unwrap();
        assert_eq!(app.thinking_label(), "[GROUP CHAT] Friends discussing...");
    }
}
