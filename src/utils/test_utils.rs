//! Test doubles shared across modules.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::app::App;
use crate::core::builtin_providers::ProviderId;
use crate::core::error::ProviderError;
use crate::core::message::Turn;
use crate::core::personality::Personality;
use crate::core::provider::{ProviderClient, ProviderSet};
use crate::core::session::ChatSession;

/// An app whose only provider is `provider`, registered as Claude.
pub fn create_test_app_with(provider: ScriptedProvider) -> App {
    let providers =
        ProviderSet::new(ProviderId::Claude).with_client(ProviderId::Claude, Arc::new(provider));
    App::new(ChatSession::default(), providers)
}

pub fn create_test_app() -> App {
    create_test_app_with(ScriptedProvider::new())
}

/// What a [`ScriptedProvider`] was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub personality: Option<Personality>,
    pub context: Vec<Turn>,
}

/// A provider that answers from a script instead of the network.
///
/// Callers are told apart by the personality whose prompt they send, so
/// give each friend in a test its own personality. Unless a fixed or
/// queued reply applies, the answer is `"<personality>: <last user text>"`.
#[derive(Default)]
pub struct ScriptedProvider {
    fixed: Option<String>,
    queued: Mutex<VecDeque<Result<String, ProviderError>>>,
    delays: HashMap<Personality, Duration>,
    failures: HashMap<Personality, ProviderError>,
    calls: Mutex<Vec<RecordedCall>>,
    completed: Mutex<Vec<Option<Personality>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `text`.
    pub fn fixed(text: &str) -> Self {
        Self {
            fixed: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// Answer the next call with `reply`, ahead of any other rule except
    /// failures.
    pub fn queue(self, reply: Result<String, ProviderError>) -> Self {
        self.queued
            .lock()
            .expect("queue lock")
            .push_back(reply);
        self
    }

    pub fn delay_for(mut self, personality: Personality, delay: Duration) -> Self {
        self.delays.insert(personality, delay);
        self
    }

    pub fn fail_for(mut self, personality: Personality, error: ProviderError) -> Self {
        self.failures.insert(personality, error);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Personalities in the order their replies finished.
    pub fn completion_order(&self) -> Vec<Option<Personality>> {
        self.completed.lock().expect("completed lock").clone()
    }
}

pub fn provider_error(reason: &str) -> ProviderError {
    ProviderError::Api {
        provider: "Scripted".to_string(),
        status: 500,
        message: reason.to_string(),
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    async fn generate(
        &self,
        context: &[Turn],
        system_prompt: &str,
    ) -> Result<String, ProviderError> {
        let personality = Personality::ALL
            .into_iter()
            .find(|p| p.system_prompt() == system_prompt);

        self.calls.lock().expect("calls lock").push(RecordedCall {
            personality,
            context: context.to_vec(),
        });

        if let Some(delay) = personality.and_then(|p| self.delays.get(&p)) {
            tokio::time::sleep(*delay).await;
        }
        self.completed
            .lock()
            .expect("completed lock")
            .push(personality);

        if let Some(err) = personality.and_then(|p| self.failures.get(&p)) {
            return Err(err.clone());
        }
        if let Some(reply) = self.queued.lock().expect("queue lock").pop_front() {
            return reply;
        }
        if let Some(text) = &self.fixed {
            return Ok(text.clone());
        }

        let last_user = context
            .iter()
            .rev()
            .find(|turn| turn.role.is_user())
            .map_or("", |turn| turn.text.as_str());
        let label = personality.map_or("unknown", Personality::as_str);
        Ok(format!("{label}: {last_user}"))
    }
}
