use serde::{Deserialize, Serialize};

/// Speaker of a recorded conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_assistant(self) -> bool {
        self == Role::Assistant
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(format!("invalid turn role: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

/// One entry of a conversation history, replayed as context on every
/// provider call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

/// Severity for app-authored output shown to the user but never
/// transmitted to a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational message (e.g., mode changes, listings).
    Info,

    /// Warning message for rejected input or degraded behaviour.
    Warning,

    /// Error message for failed operations.
    Error,

    /// Multi-line output such as help text, listings and history dumps.
    Listing,
}

impl NoticeKind {
    pub fn prefix(self) -> &'static str {
        match self {
            NoticeKind::Info => "✓",
            NoticeKind::Warning => "⚠",
            NoticeKind::Error => "❌",
            NoticeKind::Listing => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, text)
    }

    pub fn listing(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Listing, text)
    }

    /// Text as printed to the terminal, prefix included.
    pub fn render(&self) -> String {
        match self.kind.prefix() {
            "" => self.text.clone(),
            prefix => format!("{prefix} {}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_role_strings_are_rejected() {
        assert!(Role::try_from("system").is_err());
        assert_eq!(Role::try_from("assistant"), Ok(Role::Assistant));
    }

    #[test]
    fn turns_serialize_with_plain_role_strings() {
        let json = serde_json::to_string(&Turn::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","text":"hi"}"#);
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert!(back.role.is_user());
    }

    #[test]
    fn notice_constructors_set_kind() {
        assert_eq!(Notice::warning("w").kind, NoticeKind::Warning);
        assert_eq!(Notice::error("e").kind.prefix(), "❌");
    }

    #[test]
    fn listings_render_without_prefix() {
        assert_eq!(Notice::info("Switched").render(), "✓ Switched");
        assert_eq!(Notice::listing("  • Alex").render(), "  • Alex");
    }
}
