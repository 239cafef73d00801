use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CortexResult;

/// A single chat turn passed to an LLM adjudicator (spec §4.4 Stage 3,
/// spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
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
}

/// Request options for a chat completion call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatOptions {
    pub model: Option<String>,
    /// JSON schema the response must conform to, when the provider
    /// supports structured output.
    pub json_schema: Option<serde_json::Value>,
    pub temperature: Option<f32>,
}

/// LLM adjudicator used by belief revision Stage 3 (spec §4.4, §6).
/// Never required for correctness: callers must tolerate this provider
/// being unconfigured and fall back to the deterministic policy.
#[async_trait]
pub trait ILlmProvider: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], options: &ChatOptions) -> CortexResult<String>;

    fn name(&self) -> &str;
}
