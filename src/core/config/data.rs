use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::personality::Personality;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A friend registered at startup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FriendConfig {
    pub name: String,
    /// Personality label; friends default to casual.
    pub personality: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Preferred provider id or alias ("claude", "chatgpt", ...)
    pub default_provider: Option<String>,
    /// Main-bot personality label
    pub personality: Option<String>,
    /// Provider id -> model override
    #[serde(default)]
    pub default_models: HashMap<String, String>,
    /// Provider id -> base URL override
    #[serde(default)]
    pub base_urls: HashMap<String, String>,
    pub request_timeout_secs: Option<u64>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    #[serde(default)]
    pub friends: Vec<FriendConfig>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

// Provider keys are written by hand, so match them case-insensitively.
fn lookup<'a>(map: &'a HashMap<String, String>, provider: &str) -> Option<&'a String> {
    map.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(provider))
        .map(|(_, value)| value)
}

impl Config {
    pub fn get_default_model(&self, provider: &str) -> Option<&String> {
        lookup(&self.default_models, provider)
    }

    pub fn set_default_model(&mut self, provider: &str, model: String) {
        self.unset_default_model(provider);
        self.default_models.insert(provider.to_lowercase(), model);
    }

    pub fn unset_default_model(&mut self, provider: &str) {
        self.default_models
            .retain(|key, _| !key.eq_ignore_ascii_case(provider));
    }

    pub fn get_base_url(&self, provider: &str) -> Option<&String> {
        lookup(&self.base_urls, provider)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Main-bot personality, or an error naming the bad label.
    pub fn main_personality(&self) -> Result<Personality, String> {
        match self.personality.as_deref() {
            Some(label) => label.parse(),
            None => Ok(Personality::default()),
        }
    }
}
