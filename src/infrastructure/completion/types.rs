//! Wire types for OpenAI-compatible `/chat/completions`
use serde::{Deserialize, Serialize};

use crate::domain::models::ChatMessage;

/// Request body for `/chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,

    pub messages: &'a [ChatMessage],

    pub max_tokens: u32,

    /// Structured-output schema understood by the proxy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<&'a serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_options_mode: Option<&'a str>,
}

/// Response body for `/chat/completions`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if any
    pub fn into_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}
