//! Settings management for the `set` and `unset` subcommands.
//!
//! Each configuration key is served by a [`SettingHandler`]:
//!
//! - `default-provider` and `personality` hold a single value
//! - `default-model` and `request-timeout` tune provider requests
//! - `friend` adds or removes a friend registered at startup
//!
//! [`SettingRegistry`] keeps the handlers in display order for the bare
//! `banter set` listing.

use std::error::Error;

use thiserror::Error;

use crate::core::builtin_providers::ProviderId;
use crate::core::config::{Config, ConfigOrchestrator, FriendConfig};
use crate::core::error::ChatError;
use crate::core::persona::validate_name;
use crate::core::personality::{Personality, DEFAULT_FRIEND_PERSONALITY};

/// Errors that can occur when modifying configuration settings.
#[derive(Debug, Error)]
pub enum SettingError {
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Unknown provider: {0}. Use 'claude' or 'chatgpt'.")]
    UnknownProvider(String),

    #[error("{0}")]
    InvalidValue(String),

    /// Required arguments are missing.
    #[error("{hint}")]
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },

    #[error("Failed to save configuration: {0}")]
    Config(String),
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
            other => eprintln!("❌ {other}"),
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Handles one configuration key.
pub trait SettingHandler: Send + Sync {
    fn key(&self) -> &'static str;

    /// Set the value from the arguments that followed the key and return
    /// the confirmation to print.
    fn set(&self, args: &[String], store: &ConfigOrchestrator) -> Result<String, SettingError>;

    /// Clear the value. `arg` selects an entry for keyed settings.
    fn unset(&self, arg: Option<&str>, store: &ConfigOrchestrator)
        -> Result<String, SettingError>;

    /// Current value as shown by `banter set`.
    fn format(&self, config: &Config) -> String;
}

fn mutate_config<F>(store: &ConfigOrchestrator, mutator: F) -> Result<(), SettingError>
where
    F: FnOnce(&mut Config) -> Result<(), Box<dyn Error>>,
{
    store
        .mutate(mutator)
        .map_err(|err| SettingError::Config(err.to_string()))
}

fn validate_provider(input: &str) -> Result<ProviderId, SettingError> {
    input
        .parse()
        .map_err(|_| SettingError::UnknownProvider(input.to_string()))
}

fn validate_personality(input: &str) -> Result<Personality, SettingError> {
    input
        .parse()
        .map_err(|_| SettingError::InvalidValue(ChatError::invalid_personality(input).to_string()))
}

fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}

fn unset_label(value: Option<&str>) -> &str {
    value.unwrap_or("(unset)")
}

pub struct DefaultProviderHandler;

impl SettingHandler for DefaultProviderHandler {
    fn key(&self) -> &'static str {
        "default-provider"
    }

    fn set(&self, args: &[String], store: &ConfigOrchestrator) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set a default provider, specify the provider:",
                example: "banter set default-provider chatgpt",
            });
        };
        let provider = validate_provider(input)?;
        mutate_config(store, move |config| {
            config.default_provider = Some(provider.as_str().to_string());
            Ok(())
        })?;
        Ok(success_set(self.key(), provider.as_str()))
    }

    fn unset(
        &self,
        _arg: Option<&str>,
        store: &ConfigOrchestrator,
    ) -> Result<String, SettingError> {
        mutate_config(store, |config| {
            config.default_provider = None;
            Ok(())
        })?;
        Ok(success_unset(self.key()))
    }

    fn format(&self, config: &Config) -> String {
        format!(
            "  default-provider: {}",
            unset_label(config.default_provider.as_deref())
        )
    }
}

pub struct PersonalityHandler;

impl SettingHandler for PersonalityHandler {
    fn key(&self) -> &'static str {
        "personality"
    }

    fn set(&self, args: &[String], store: &ConfigOrchestrator) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set the main personality, specify one:",
                example: "banter set personality wise",
            });
        };
        let personality = validate_personality(input)?;
        mutate_config(store, move |config| {
            config.personality = Some(personality.as_str().to_string());
            Ok(())
        })?;
        Ok(success_set(self.key(), personality.as_str()))
    }

    fn unset(
        &self,
        _arg: Option<&str>,
        store: &ConfigOrchestrator,
    ) -> Result<String, SettingError> {
        mutate_config(store, |config| {
            config.personality = None;
            Ok(())
        })?;
        Ok(success_unset(self.key()))
    }

    fn format(&self, config: &Config) -> String {
        format!("  personality: {}", unset_label(config.personality.as_deref()))
    }
}

pub struct DefaultModelHandler;

impl SettingHandler for DefaultModelHandler {
    fn key(&self) -> &'static str {
        "default-model"
    }

    fn set(&self, args: &[String], store: &ConfigOrchestrator) -> Result<String, SettingError> {
        let (Some(input), true) = (args.first(), args.len() >= 2) else {
            return Err(SettingError::MissingArgs {
                hint: "To set a default model, specify the provider and model:",
                example: "banter set default-model chatgpt gpt-4o-mini",
            });
        };
        let provider = validate_provider(input)?;
        let model = args[1..].join(" ");
        let message = format!(
            "✅ Set default-model for provider '{}' to: {model}",
            provider.as_str()
        );
        mutate_config(store, move |config| {
            config.set_default_model(provider.as_str(), model);
            Ok(())
        })?;
        Ok(message)
    }

    fn unset(&self, arg: Option<&str>, store: &ConfigOrchestrator) -> Result<String, SettingError> {
        let Some(input) = arg else {
            return Err(SettingError::MissingArgs {
                hint: "To unset a default model, specify the provider:",
                example: "banter unset default-model chatgpt",
            });
        };
        let provider = validate_provider(input)?;
        mutate_config(store, move |config| {
            config.unset_default_model(provider.as_str());
            Ok(())
        })?;
        Ok(format!(
            "✅ Unset default-model for provider: {}",
            provider.as_str()
        ))
    }

    fn format(&self, config: &Config) -> String {
        if config.default_models.is_empty() {
            return "  default-model: (none set)".to_string();
        }
        let mut models: Vec<_> = config.default_models.iter().collect();
        models.sort();
        let mut out = String::from("  default-model:");
        for (provider, model) in models {
            out.push_str(&format!("\n    {provider}: {model}"));
        }
        out
    }
}

pub struct RequestTimeoutHandler;

impl SettingHandler for RequestTimeoutHandler {
    fn key(&self) -> &'static str {
        "request-timeout"
    }

    fn set(&self, args: &[String], store: &ConfigOrchestrator) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set the request timeout, give a number of seconds:",
                example: "banter set request-timeout 30",
            });
        };
        let secs = input
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                SettingError::InvalidValue(format!(
                    "Invalid request-timeout '{input}': expected a positive number of seconds"
                ))
            })?;
        mutate_config(store, move |config| {
            config.request_timeout_secs = Some(secs);
            Ok(())
        })?;
        Ok(success_set(self.key(), &format!("{secs}s")))
    }

    fn unset(
        &self,
        _arg: Option<&str>,
        store: &ConfigOrchestrator,
    ) -> Result<String, SettingError> {
        mutate_config(store, |config| {
            config.request_timeout_secs = None;
            Ok(())
        })?;
        Ok(success_unset(self.key()))
    }

    fn format(&self, config: &Config) -> String {
        format!("  request-timeout: {}s", config.request_timeout().as_secs())
    }
}

/// Friends listed in the config are registered every time banter starts.
pub struct FriendHandler;

impl SettingHandler for FriendHandler {
    fn key(&self) -> &'static str {
        "friend"
    }

    fn set(&self, args: &[String], store: &ConfigOrchestrator) -> Result<String, SettingError> {
        let Some(name) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To add a friend, specify a name and optionally a personality:",
                example: "banter set friend Alex funny",
            });
        };
        validate_name(name).map_err(|err| SettingError::InvalidValue(err.to_string()))?;
        let personality = match args.get(1) {
            Some(label) => validate_personality(label)?,
            None => DEFAULT_FRIEND_PERSONALITY,
        };

        let entry = FriendConfig {
            name: name.clone(),
            personality: Some(personality.as_str().to_string()),
        };
        mutate_config(store, move |config| {
            match config
                .friends
                .iter_mut()
                .find(|friend| friend.name.eq_ignore_ascii_case(&entry.name))
            {
                Some(existing) => *existing = entry,
                None => config.friends.push(entry),
            }
            Ok(())
        })?;
        Ok(format!("✅ Set friend {name} ({personality})"))
    }

    fn unset(&self, arg: Option<&str>, store: &ConfigOrchestrator) -> Result<String, SettingError> {
        let Some(name) = arg else {
            return Err(SettingError::MissingArgs {
                hint: "To remove a friend, specify the name:",
                example: "banter unset friend Alex",
            });
        };

        let config = store
            .load_with_cache()
            .map_err(|err| SettingError::Config(err.to_string()))?;
        if !config
            .friends
            .iter()
            .any(|friend| friend.name.eq_ignore_ascii_case(name))
        {
            return Err(SettingError::InvalidValue(format!(
                "No friend named '{name}' in config"
            )));
        }

        let target = name.to_string();
        mutate_config(store, move |config| {
            config
                .friends
                .retain(|friend| !friend.name.eq_ignore_ascii_case(&target));
            Ok(())
        })?;
        Ok(format!("✅ Unset friend {name}"))
    }

    fn format(&self, config: &Config) -> String {
        if config.friends.is_empty() {
            return "  friend: (none)".to_string();
        }
        let mut out = String::from("  friend:");
        for friend in &config.friends {
            let personality = friend
                .personality
                .as_deref()
                .unwrap_or(DEFAULT_FRIEND_PERSONALITY.as_str());
            out.push_str(&format!("\n    {} ({personality})", friend.name));
        }
        out
    }
}

/// All setting handlers, in display order.
pub struct SettingRegistry {
    handlers: Vec<Box<dyn SettingHandler>>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        Self {
            handlers: vec![
                Box::new(DefaultProviderHandler),
                Box::new(PersonalityHandler),
                Box::new(DefaultModelHandler),
                Box::new(RequestTimeoutHandler),
                Box::new(FriendHandler),
            ],
        }
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.key() == key)
            .map(|handler| handler.as_ref())
    }

    pub fn set(
        &self,
        key: &str,
        args: &[String],
        store: &ConfigOrchestrator,
    ) -> Result<String, SettingError> {
        self.handler(key)?.set(args, store)
    }

    pub fn unset(
        &self,
        key: &str,
        arg: Option<&str>,
        store: &ConfigOrchestrator,
    ) -> Result<String, SettingError> {
        self.handler(key)?.unset(arg, store)
    }

    /// Run `banter set`: with no key, list every setting; otherwise hand
    /// the arguments to the key's handler, even when there are none.
    pub fn apply(
        &self,
        key: Option<&str>,
        args: &[String],
        store: &ConfigOrchestrator,
    ) -> Result<String, SettingError> {
        match key {
            None => store
                .load_with_cache()
                .map(|config| self.describe(&config))
                .map_err(|err| SettingError::Config(err.to_string())),
            Some(key) => self.set(key, args, store),
        }
    }

    /// Every setting with its current value.
    pub fn describe(&self, config: &Config) -> String {
        let mut out = String::from("Current configuration:");
        for handler in &self.handlers {
            out.push('\n');
            out.push_str(&handler.format(config));
        }
        out
    }

    fn handler(&self, key: &str) -> Result<&dyn SettingHandler, SettingError> {
        self.get(key)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ConfigOrchestrator) {
        let dir = TempDir::new().unwrap();
        let store = ConfigOrchestrator::new(dir.path().join("config.toml"));
        (dir, store)
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn default_provider_is_stored_canonically() {
        let (_dir, store) = store();
        let registry = SettingRegistry::new();

        let message = registry
            .set("default-provider", &args(&["openai"]), &store)
            .unwrap();
        assert_eq!(message, "✅ Set default-provider to: chatgpt");
        assert_eq!(
            store.load_with_cache().unwrap().default_provider.as_deref(),
            Some("chatgpt")
        );

        registry.unset("default-provider", None, &store).unwrap();
        assert!(store.load_with_cache().unwrap().default_provider.is_none());
    }

    #[test]
    fn unknown_values_are_rejected_without_writing() {
        let (dir, store) = store();
        let registry = SettingRegistry::new();

        assert!(matches!(
            registry.set("default-provider", &args(&["gemini"]), &store),
            Err(SettingError::UnknownProvider(_))
        ));
        assert!(matches!(
            registry.set("personality", &args(&["grumpy"]), &store),
            Err(SettingError::InvalidValue(_))
        ));
        assert!(matches!(
            registry.set("request-timeout", &args(&["0"]), &store),
            Err(SettingError::InvalidValue(_))
        ));
        assert!(matches!(
            registry.set("theme", &args(&["dark"]), &store),
            Err(SettingError::UnknownKey(_))
        ));
        assert!(!dir.path().join("config.toml").exists());
    }

    #[test]
    fn default_model_needs_provider_and_model() {
        let (_dir, store) = store();
        let registry = SettingRegistry::new();

        assert!(matches!(
            registry.set("default-model", &args(&["chatgpt"]), &store),
            Err(SettingError::MissingArgs { .. })
        ));

        registry
            .set("default-model", &args(&["ChatGPT", "gpt-4o-mini"]), &store)
            .unwrap();
        let config = store.load_with_cache().unwrap();
        assert_eq!(
            config.get_default_model("chatgpt").map(String::as_str),
            Some("gpt-4o-mini")
        );

        registry
            .unset("default-model", Some("gpt"), &store)
            .unwrap();
        assert!(store.load_with_cache().unwrap().default_models.is_empty());
    }

    #[test]
    fn friends_are_upserted_and_removed_by_name() {
        let (_dir, store) = store();
        let registry = SettingRegistry::new();

        registry.set("friend", &args(&["Alex"]), &store).unwrap();
        registry
            .set("friend", &args(&["alex", "wise"]), &store)
            .unwrap();
        registry
            .set("friend", &args(&["Sam", "funny"]), &store)
            .unwrap();

        let config = store.load_with_cache().unwrap();
        assert_eq!(config.friends.len(), 2);
        assert_eq!(config.friends[0].personality.as_deref(), Some("wise"));

        assert!(matches!(
            registry.set("friend", &args(&["/alex"]), &store),
            Err(SettingError::InvalidValue(_))
        ));
        assert!(matches!(
            registry.unset("friend", Some("Jordan"), &store),
            Err(SettingError::InvalidValue(_))
        ));

        registry.unset("friend", Some("SAM"), &store).unwrap();
        let config = store.load_with_cache().unwrap();
        assert_eq!(config.friends.len(), 1);
        assert_eq!(config.friends[0].name, "alex");
    }

    #[test]
    fn known_key_without_value_shows_its_usage_hint() {
        let (dir, store) = store();
        let registry = SettingRegistry::new();

        for key in [
            "default-provider",
            "personality",
            "default-model",
            "request-timeout",
            "friend",
        ] {
            assert!(
                matches!(
                    registry.apply(Some(key), &[], &store),
                    Err(SettingError::MissingArgs { .. })
                ),
                "key: {key}"
            );
        }
        assert!(!dir.path().join("config.toml").exists());

        let listing = registry.apply(None, &[], &store).unwrap();
        assert!(listing.starts_with("Current configuration:"));
    }

    #[test]
    fn describe_lists_every_key_in_order() {
        let config = Config {
            personality: Some("wise".to_string()),
            request_timeout_secs: Some(30),
            friends: vec![FriendConfig {
                name: "Alex".to_string(),
                personality: None,
            }],
            ..Default::default()
        };

        let text = SettingRegistry::new().describe(&config);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Current configuration:");
        assert_eq!(lines[1], "  default-provider: (unset)");
        assert_eq!(lines[2], "  personality: wise");
        assert_eq!(lines[3], "  default-model: (none set)");
        assert_eq!(lines[4], "  request-timeout: 30s");
        assert_eq!(lines[6], "    Alex (casual)");
    }
}
