//! Domain errors for the field report agent.

use thiserror::Error;

use super::ports::CompletionError;

/// Domain-level errors that can occur while handling a chat message.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Template not found for chat {0}")]
    TemplateNotFound(String),

    #[error("Completion service failed: {0}")]
    CompletionFailed(#[from] CompletionError),

    #[error("Delivery to {user} failed: {reason}")]
    DeliveryFailed { user: String, reason: String },

    #[error("Forwarding message {message_id} failed: {reason}")]
    ForwardingFailed { message_id: String, reason: String },

    #[error("Invalid response from {service}: {reason}")]
    InvalidResponse { service: String, reason: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
