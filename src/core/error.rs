//! Error taxonomy shared by the registry, the conversation store, the
//! router and the provider clients.
//!
//! Every variant is recoverable: the command layer turns it into a
//! user-visible notice and the session carries on.

use std::time::Duration;

use thiserror::Error;

use crate::core::conversation::OwnerKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("A friend named '{0}' already exists.")]
    DuplicateName(String),

    #[error("Friend '{0}' not found. Use /addfriend to create them.")]
    NotFound(String),

    #[error("Unknown personality: {label}. Available personalities: {available}")]
    InvalidPersonality { label: String, available: String },

    #[error("Invalid friend name '{0}': names must be non-empty, contain no spaces, and not start with '/'.")]
    InvalidName(String),

    #[error("No conversation history is registered for {0}.")]
    UnknownOwner(OwnerKey),

    #[error("No friends given. Usage: /groupchat <friend1> <friend2> ...")]
    EmptyGroupList,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ChatError {
    pub fn invalid_personality(label: impl Into<String>) -> Self {
        ChatError::InvalidPersonality {
            label: label.into(),
            available: crate::core::personality::Personality::available_labels(),
        }
    }
}

/// Failure reported by a [`crate::core::provider::ProviderClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{provider} is not available (no API key configured)")]
    MissingCredentials { provider: String },

    #[error("{provider} did not answer within {}s", .timeout.as_secs())]
    Timeout { provider: String, timeout: Duration },

    #[error("{provider} API error {status}: {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: String },
}

impl ProviderError {
    /// Human readable reason, as shown in a failed reply placeholder.
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Whether the provider rejected the requested model itself, which is
    /// the only failure that warrants trying another model.
    pub fn is_model_rejection(&self) -> bool {
        match self {
            ProviderError::Api {
                status, message, ..
            } => {
                let lowered = message.to_ascii_lowercase();
                *status == 404 || lowered.contains("model") || lowered.contains("not found")
            }
            _ => false,
        }
    }
}
