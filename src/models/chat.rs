//! Chat completion wire types (OpenAI-compatible).
//!
//! K_i: The OpenAI chat schema is the de facto standard; the Meridian
//! gateway, judge evaluation, and router training all speak it.

use serde::{Deserialize, Serialize};

/// Message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Parameters for a chat completion request.
///
/// The `model` field is optional: router execution overwrites it with the
/// versioned router name before the request reaches the gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionCreateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    pub messages: Vec<ChatMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl CompletionCreateParams {
    /// Request with just a message list, everything else server-default.
    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }
}

/// A single completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    pub message: ChatMessage,
}

/// Token accounting reported by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Chat completion response.
///
/// `model` states which underlying model actually served the request; for a
/// routed completion this is the routing decision, as far as the client can
/// observe it. `cost` is the server-reported cost in USD, when available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub id: String,

    #[serde(default = "default_object")]
    pub object: String,

    #[serde(default)]
    pub created: i64,

    pub model: String,

    pub choices: Vec<ChatChoice>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<ChatUsage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

fn default_object() -> String {
    "chat.completion".to_string()
}

impl ChatCompletion {
    /// The first choice's message, when the completion has one.
    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|c| &c.message)
    }
}
