//! Completion service port
//!
//! The language model is an external collaborator used as an extraction
//! oracle. The agent only needs one operation from it: given ordered
//! role-tagged turns (and optionally a JSON schema constraining the answer),
//! return the content of the single assistant turn it produces.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::models::ChatMessage;

/// Request sent to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Ordered conversation turns
    pub messages: Vec<ChatMessage>,

    /// JSON schema the response must follow, for structured requests
    pub response_schema: Option<serde_json::Value>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            response_schema: None,
        }
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Errors that can occur when calling the completion service
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Invalid request parameters (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing API key (HTTP 401/403)
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Model or endpoint not found (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded - too many requests")]
    RateLimitExceeded,

    /// Server error from the completion service (HTTP 5xx)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network or connection error
    #[error("Network error: {0}")]
    Network(String),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Response body did not carry an assistant turn
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Unknown or unexpected status
    #[error("Unknown error ({0}): {1}")]
    Unknown(StatusCode, String),
}

impl CompletionError {
    /// Returns true if this error is transient and should be retried
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded | Self::ServerError(_, _) | Self::Timeout | Self::Network(_)
        )
    }

    /// Returns true if this is a permanent error that should not be retried
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Classifies a non-success HTTP status
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::InvalidRequest(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized(body),
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded,
            status if status.is_server_error() => Self::ServerError(status, body),
            status => Self::Unknown(status, body),
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Port trait for completion service implementations
///
/// Implementations must be `Send + Sync`: fragments of one message are
/// extracted concurrently through the same client.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the content of the assistant turn answering `request`.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
