pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::chat::{ChatHistoryMessage, MessageSource, QuickAction};

/// Outbound payload for one user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub pathname: String,
    pub history: Vec<ChatHistoryMessage>,
}

/// Body of a successful responder answer. `message` is the only required field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    #[serde(default)]
    pub actions: Option<Vec<QuickAction>>,
    #[serde(default)]
    pub suggested_prompts: Option<Vec<String>>,
    #[serde(default)]
    pub source: Option<MessageSource>,
}

impl ChatReply {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            actions: None,
            suggested_prompts: None,
            source: None,
        }
    }
}

/// Every way an exchange with the responder can go wrong. The widget treats
/// all of them alike; the variants are kept apart for the log.
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("responder returned HTTP {0}")]
    Status(u16),

    #[error("malformed reply: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait Responder: Send + Sync {
    fn name(&self) -> &str;
    async fn respond(&self, request: &ChatRequest) -> Result<ChatReply, ResponderError>;
}
