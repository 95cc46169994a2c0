use crate::core::conversation::OwnerKey;

/// Where the next user message is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    MainBot,
    ActiveFriend(String),
    /// Friends answer in this order on every round.
    GroupChat(Vec<String>),
}

impl Mode {
    /// Histories that a plain message (or `/clear`, `/history`) touches in
    /// this mode, in reply order.
    pub fn owners(&self) -> Vec<OwnerKey> {
        match self {
            Mode::MainBot => vec![OwnerKey::MainBot],
            Mode::ActiveFriend(name) => vec![OwnerKey::persona(name)],
            Mode::GroupChat(names) => names.iter().map(|n| OwnerKey::persona(n)).collect(),
        }
    }

    pub fn active_friend(&self) -> Option<&str> {
        match self {
            Mode::ActiveFriend(name) => Some(name),
            _ => None,
        }
    }

    pub fn group_members(&self) -> &[String] {
        match self {
            Mode::GroupChat(names) => names,
            _ => &[],
        }
    }

    pub fn is_group_chat(&self) -> bool {
        matches!(self, Mode::GroupChat(_))
    }

    pub fn label(&self) -> String {
        match self {
            Mode::MainBot => "main AI".to_string(),
            Mode::ActiveFriend(name) => format!("friend {name}"),
            Mode::GroupChat(names) => format!("group chat with {}", names.join(", ")),
        }
    }
}
