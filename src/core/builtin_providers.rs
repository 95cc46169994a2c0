//! Built-in provider configuration
//!
//! This module loads the provider table embedded from
//! `builtin_providers.toml` at build time and maps it onto [`ProviderId`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinProvider {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub base_url: String,
    pub mode: Option<String>,
    pub api_key_env: String,
    pub base_url_env: String,
    pub default_model: String,
    #[serde(default)]
    pub fallback_models: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BuiltinProvidersConfig {
    providers: Vec<BuiltinProvider>,
}

impl BuiltinProvider {
    /// Get the wire protocol for this provider
    pub fn api_mode(&self) -> &str {
        self.mode.as_deref().unwrap_or("openai")
    }

    /// Check if this provider speaks the Anthropic Messages API
    pub fn is_anthropic_mode(&self) -> bool {
        self.api_mode() == "anthropic"
    }

    fn answers_to(&self, name: &str) -> bool {
        self.id.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// Load built-in providers from the embedded configuration
pub fn load_builtin_providers() -> Vec<BuiltinProvider> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_providers.toml");

    let config: BuiltinProvidersConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_providers.toml");

    config.providers
}

/// Find a built-in provider by ID or alias (case-insensitive)
pub fn find_builtin_provider(name: &str) -> Option<BuiltinProvider> {
    load_builtin_providers()
        .into_iter()
        .find(|p| p.answers_to(name.trim()))
}

/// The two providers a session can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Claude,
    ChatGpt,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::Claude, ProviderId::ChatGpt];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::Claude => "claude",
            ProviderId::ChatGpt => "chatgpt",
        }
    }

    /// The provider used when this one has no credentials.
    pub fn other(self) -> ProviderId {
        match self {
            ProviderId::Claude => ProviderId::ChatGpt,
            ProviderId::ChatGpt => ProviderId::Claude,
        }
    }

    /// Table entry for this provider.
    pub fn builtin(self) -> BuiltinProvider {
        find_builtin_provider(self.as_str())
            .expect("builtin_providers.toml must list every ProviderId")
    }

    pub fn display_name(self) -> String {
        self.builtin().display_name
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let provider = find_builtin_provider(value).ok_or_else(|| {
            format!("Unknown provider '{value}'. Use 'claude' or 'chatgpt'.")
        })?;
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == provider.id)
            .ok_or_else(|| format!("Provider '{}' has no client.", provider.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin_providers() {
        let providers = load_builtin_providers();
        let provider_ids: Vec<&str> = providers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(provider_ids, vec!["claude", "chatgpt"]);
    }

    #[test]
    fn test_find_builtin_provider_by_alias() {
        let provider = find_builtin_provider("Anthropic").expect("alias should resolve");
        assert_eq!(provider.id, "claude");

        let provider = find_builtin_provider("GPT").expect("alias should resolve");
        assert_eq!(provider.display_name, "ChatGPT");

        assert!(find_builtin_provider("nonexistent").is_none());
    }

    #[test]
    fn test_api_modes() {
        assert!(ProviderId::Claude.builtin().is_anthropic_mode());
        assert_eq!(ProviderId::ChatGpt.builtin().api_mode(), "openai");
    }

    #[test]
    fn test_provider_id_parsing() {
        assert_eq!("CLAUDE".parse::<ProviderId>(), Ok(ProviderId::Claude));
        assert_eq!("openai".parse::<ProviderId>(), Ok(ProviderId::ChatGpt));
        assert!("gemini".parse::<ProviderId>().is_err());
        assert_eq!(ProviderId::Claude.other(), ProviderId::ChatGpt);
    }

    #[test]
    fn test_provider_properties() {
        for id in ProviderId::ALL {
            let provider = id.builtin();
            assert!(provider.base_url.starts_with("https://"));
            assert!(!provider.default_model.is_empty());
            assert!(provider.api_key_env.ends_with("_API_KEY"));
        }
        assert_eq!(ProviderId::Claude.builtin().fallback_models.len(), 3);
    }
}
