//! Data service port: message sink and per-chat template lookup.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ForwardPayload, Template};

#[async_trait]
pub trait DataService: Send + Sync {
    /// Sends a message, with or without extracted rows, to the message sink.
    async fn forward(&self, payload: &ForwardPayload) -> DomainResult<()>;

    /// Looks up the report template bound to `chat_id`.
    ///
    /// # Errors
    /// - `DomainError::TemplateNotFound` when the chat has no usable template.
    ///   Callers must not substitute a default.
    async fn get_template(&self, chat_id: &str) -> DomainResult<Template>;
}
