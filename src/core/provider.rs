//! Talking to the completion providers.
//!
//! [`ProviderClient`] is the single network-facing seam of the chat core:
//! it turns a history and a system prompt into one reply. The router only
//! ever sees this trait, so tests substitute a scripted client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{ChatRequest, ChatResponse, MessagesRequest, MessagesResponse};
use crate::core::builtin_providers::{BuiltinProvider, ProviderId};
use crate::core::config::Config;
use crate::core::error::ProviderError;
use crate::core::message::Turn;
use crate::core::providers::ProviderCredentials;
use crate::utils::auth::add_auth_headers;
use crate::utils::url::construct_api_url;

#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Produce one reply for `context` (oldest turn first) under
    /// `system_prompt`.
    async fn generate(&self, context: &[Turn], system_prompt: &str)
        -> Result<String, ProviderError>;
}

/// Request tuning shared by every provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestSettings {
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl RequestSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.request_timeout(),
            max_tokens: config.max_tokens(),
            temperature: config.temperature(),
        }
    }
}

/// Non-streaming HTTP client for one provider.
pub struct HttpProviderClient {
    client: reqwest::Client,
    provider: BuiltinProvider,
    credentials: ProviderCredentials,
    settings: RequestSettings,
}

impl HttpProviderClient {
    pub fn new(credentials: ProviderCredentials, settings: RequestSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            provider: credentials.id.builtin(),
            credentials,
            settings,
        }
    }

    fn name(&self) -> &str {
        &self.credentials.display_name
    }

    /// The configured model first, then the fallbacks not already tried.
    fn models_to_try(&self) -> Vec<&str> {
        let mut models = vec![self.credentials.model.as_str()];
        for model in &self.credentials.fallback_models {
            if !models.contains(&model.as_str()) {
                models.push(model.as_str());
            }
        }
        models
    }

    async fn generate_anthropic(
        &self,
        context: &[Turn],
        system_prompt: &str,
    ) -> Result<String, ProviderError> {
        let models = self.models_to_try();
        let mut last_error = None;
        for model in models {
            let request =
                MessagesRequest::build(model, system_prompt, context, self.settings.max_tokens);
            match self.post::<_, MessagesResponse>("messages", &request).await {
                Ok(response) => {
                    return response.into_text().ok_or_else(|| ProviderError::EmptyResponse {
                        provider: self.name().to_string(),
                    });
                }
                Err(err) if err.is_model_rejection() => {
                    debug!(provider = %self.name(), model, error = %err, "model rejected, trying next");
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_error.unwrap_or_else(|| ProviderError::EmptyResponse {
            provider: self.name().to_string(),
        }))
    }

    async fn generate_openai(
        &self,
        context: &[Turn],
        system_prompt: &str,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest::build(
            &self.credentials.model,
            system_prompt,
            context,
            self.settings.max_tokens,
            self.settings.temperature,
        );
        let response: ChatResponse = self.post("chat/completions", &request).await?;
        response.into_text().ok_or_else(|| ProviderError::EmptyResponse {
            provider: self.name().to_string(),
        })
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = construct_api_url(&self.credentials.base_url, endpoint);
        debug!(provider = %self.name(), %url, "sending request");

        let request = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        let request = add_auth_headers(request, &self.provider, &self.credentials.api_key);

        let exchange = async {
            let response = request.json(body).send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = tokio::time::timeout(self.settings.timeout, exchange)
            .await
            .map_err(|_| ProviderError::Timeout {
                provider: self.name().to_string(),
                timeout: self.settings.timeout,
            })?
            .map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                provider: self.name().to_string(),
                status: status.as_u16(),
                message: summarize_api_error(&text),
            });
        }

        serde_json::from_str(&text).map_err(|err| ProviderError::Transport {
            provider: self.name().to_string(),
            message: format!("unreadable response: {err}"),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            return ProviderError::Timeout {
                provider: self.name().to_string(),
                timeout: self.settings.timeout,
            };
        }
        ProviderError::Transport {
            provider: self.name().to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    async fn generate(
        &self,
        context: &[Turn],
        system_prompt: &str,
    ) -> Result<String, ProviderError> {
        if self.provider.is_anthropic_mode() {
            self.generate_anthropic(context, system_prompt).await
        } else {
            self.generate_openai(context, system_prompt).await
        }
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// One-line description of an error body: the JSON `error.message` when
/// there is one, otherwise the collapsed body text.
fn summarize_api_error(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&value).filter(|s| !s.is_empty()) {
            return summary;
        }
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The configured clients plus the provider the user prefers.
pub struct ProviderSet {
    clients: HashMap<ProviderId, Arc<dyn ProviderClient>>,
    preferred: ProviderId,
}

impl ProviderSet {
    pub fn new(preferred: ProviderId) -> Self {
        Self {
            clients: HashMap::new(),
            preferred,
        }
    }

    /// Build HTTP clients for every provider that has credentials.
    pub fn from_credentials(
        preferred: ProviderId,
        credentials: Vec<ProviderCredentials>,
        settings: RequestSettings,
    ) -> Self {
        let mut set = Self::new(preferred);
        for creds in credentials {
            let id = creds.id;
            set = set.with_client(id, Arc::new(HttpProviderClient::new(creds, settings)));
        }
        set
    }

    pub fn with_client(mut self, id: ProviderId, client: Arc<dyn ProviderClient>) -> Self {
        self.clients.insert(id, client);
        self
    }

    pub fn preferred(&self) -> ProviderId {
        self.preferred
    }

    pub fn is_available(&self, id: ProviderId) -> bool {
        self.clients.contains_key(&id)
    }

    pub fn available(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|id| self.is_available(*id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Prefer `id` from now on. Fails, leaving the preference unchanged,
    /// when `id` has no credentials.
    pub fn switch(&mut self, id: ProviderId) -> Result<(), ProviderError> {
        if !self.is_available(id) {
            return Err(ProviderError::MissingCredentials {
                provider: id.display_name(),
            });
        }
        self.preferred = id;
        Ok(())
    }

    /// The provider that will actually answer the next request.
    pub fn active(&self) -> Option<ProviderId> {
        if self.is_available(self.preferred) {
            Some(self.preferred)
        } else {
            Some(self.preferred.other()).filter(|id| self.is_available(*id))
        }
    }

    fn select(&self) -> Result<&Arc<dyn ProviderClient>, ProviderError> {
        let id = self.active().ok_or_else(|| ProviderError::MissingCredentials {
            provider: self.preferred.display_name(),
        })?;
        if id != self.preferred {
            warn!(
                preferred = %self.preferred,
                fallback = %id,
                "preferred provider not configured, falling back"
            );
        }
        self.clients
            .get(&id)
            .ok_or_else(|| ProviderError::MissingCredentials {
                provider: id.display_name(),
            })
    }
}

#[async_trait]
impl ProviderClient for ProviderSet {
    async fn generate(
        &self,
        context: &[Turn],
        system_prompt: &str,
    ) -> Result<String, ProviderError> {
        self.select()?.generate(context, system_prompt).await
    }
}
