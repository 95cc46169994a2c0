//! Wire payloads for the two completion APIs.

use serde::{Deserialize, Serialize};

use crate::core::message::Turn;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        ChatMessage::new(turn.role.as_str(), turn.text.clone())
    }
}

/// OpenAI-style `chat/completions` request. The system prompt travels as
/// the first message.
#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn build(
        model: &str,
        system_prompt: &str,
        context: &[Turn],
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        let mut messages = Vec::with_capacity(context.len() + 1);
        messages.push(ChatMessage::new("system", system_prompt));
        messages.extend(context.iter().map(ChatMessage::from));
        Self {
            model: model.to_string(),
            messages,
            max_tokens,
            temperature,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChatResponseChoice {
    pub message: ChatResponseMessage,
}

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatResponseChoice>,
}

impl ChatResponse {
    pub fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Anthropic `messages` request. The system prompt is a top-level field.
#[derive(Serialize, Debug)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

impl MessagesRequest {
    pub fn build(model: &str, system_prompt: &str, context: &[Turn], max_tokens: u32) -> Self {
        Self {
            model: model.to_string(),
            max_tokens,
            system: system_prompt.to_string(),
            messages: context.iter().map(ChatMessage::from).collect(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl MessagesResponse {
    /// Concatenate the text blocks of the reply.
    pub fn into_text(self) -> Option<String> {
        let text: String = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}
