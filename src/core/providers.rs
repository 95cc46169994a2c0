//! Credential and provider resolution at startup.

use std::error::Error;
use std::fmt;

use tracing::{debug, warn};

use crate::core::builtin_providers::ProviderId;
use crate::core::config::Config;

const QUICK_FIXES: &[&str] = &[
    "export ANTHROPIC_API_KEY=sk-ant-...   # Use Claude",
    "export OPENAI_API_KEY=sk-...          # Use ChatGPT",
    "echo 'OPENAI_API_KEY=sk-...' >> .env  # Or keep keys in a .env file",
];

/// Everything needed to build a client for one provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub id: ProviderId,
    pub display_name: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Models to try, in order, after `model` is rejected.
    pub fallback_models: Vec<String>,
}

#[derive(Debug)]
pub struct ProviderResolutionError {
    message: String,
    quick_fixes: &'static [&'static str],
    exit_code: i32,
}

impl ProviderResolutionError {
    pub fn missing_authentication() -> Self {
        Self::new(
            "❌ No API keys found!\n\nPlease set at least one of the following environment variables:\n   export ANTHROPIC_API_KEY=\"your-key-here\"\n   export OPENAI_API_KEY=\"your-key-here\"",
            QUICK_FIXES,
            2,
        )
    }

    pub fn unknown_provider(provider: &str) -> Self {
        Self::new(
            format!("Unknown provider '{provider}'. Use 'claude' or 'chatgpt'."),
            QUICK_FIXES,
            2,
        )
    }

    fn new(
        message: impl Into<String>,
        quick_fixes: &'static [&'static str],
        exit_code: i32,
    ) -> Self {
        Self {
            message: message.into(),
            quick_fixes,
            exit_code,
        }
    }

    pub fn quick_fixes(&self) -> &'static [&'static str] {
        self.quick_fixes
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

impl fmt::Display for ProviderResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ProviderResolutionError {}

/// Where API keys and base URL overrides are read from.
pub trait CredentialSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment (after `.env` has been loaded).
pub struct EnvSource;

impl CredentialSource for EnvSource {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Credentials for every provider that has an API key, in
/// [`ProviderId::ALL`] order.
///
/// Base URL precedence is environment, then config, then the built-in
/// table. The model comes from config or the built-in default.
pub fn resolve_credentials<S: CredentialSource>(
    source: &S,
    config: &Config,
) -> Vec<ProviderCredentials> {
    ProviderId::ALL
        .into_iter()
        .filter_map(|id| {
            let builtin = id.builtin();
            let Some(api_key) = source.var(&builtin.api_key_env) else {
                debug!(provider = %id, env = %builtin.api_key_env, "no API key");
                return None;
            };
            let base_url = source
                .var(&builtin.base_url_env)
                .or_else(|| config.get_base_url(id.as_str()).cloned())
                .unwrap_or(builtin.base_url);
            let model = config
                .get_default_model(id.as_str())
                .cloned()
                .unwrap_or(builtin.default_model);
            Some(ProviderCredentials {
                id,
                display_name: builtin.display_name,
                api_key,
                base_url,
                model,
                fallback_models: builtin.fallback_models,
            })
        })
        .collect()
}

/// Pick the preferred provider: the command-line override, then the
/// configured default, then Claude.
///
/// An unknown override is an error; an unknown configured default is
/// ignored with a warning. A preference without credentials is kept, the
/// provider set falls back at request time.
pub fn resolve_preferred(
    config: &Config,
    provider_override: Option<&str>,
) -> Result<ProviderId, ProviderResolutionError> {
    if let Some(name) = provider_override.filter(|value| !value.trim().is_empty()) {
        return name
            .parse()
            .map_err(|_| ProviderResolutionError::unknown_provider(name));
    }

    if let Some(name) = config.default_provider.as_deref() {
        match name.parse() {
            Ok(id) => return Ok(id),
            Err(_) => warn!(provider = %name, "ignoring unknown default_provider in config"),
        }
    }

    Ok(ProviderId::Claude)
}
