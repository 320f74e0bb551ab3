//! In-memory adapters for tests.
//!
//! Each adapter records what it was asked to do so tests can assert on the
//! agent's side effects.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ForwardPayload, PendingMessage, Template};
use crate::domain::ports::{
    CompletionClient, CompletionError, CompletionRequest, DataService, Messenger,
    PendingMessageStore,
};

/// Completion client answering from scripted rules and a queue.
///
/// Rules match when the last user turn contains their needle and are
/// checked in insertion order before the queue. With neither, the request
/// fails as malformed.
#[derive(Default)]
pub struct ScriptedCompletionClient {
    rules: Arc<RwLock<Vec<(String, String)>>>,
    queue: Arc<RwLock<VecDeque<Result<String, CompletionError>>>>,
    requests: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl ScriptedCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `response` whenever the last user turn contains `needle`.
    pub async fn respond_when(&self, needle: impl Into<String>, response: impl Into<String>) {
        self.rules.write().await.push((needle.into(), response.into()));
    }

    /// Answer the next unmatched request with `result`.
    pub async fn enqueue(&self, result: Result<String, CompletionError>) {
        self.queue.write().await.push_back(result);
    }

    /// Requests received so far, in arrival order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let last_user = request
            .messages
            .iter()
            .rev()
            .find(|turn| turn.role == crate::domain::models::Role::User)
            .map(|turn| turn.content.clone())
            .unwrap_or_default();
        self.requests.write().await.push(request);

        let rule = self
            .rules
            .read()
            .await
            .iter()
            .find(|(needle, _)| last_user.contains(needle.as_str()))
            .map(|(_, response)| response.clone());
        if let Some(response) = rule {
            return Ok(response);
        }

        self.queue
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::MalformedResponse("no scripted response".into())))
    }
}

/// A delivery captured by [`RecordingMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Text { user: String, text: String },
    Image { user: String, image: String },
}

/// Messenger that records deliveries, optionally failing them.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Arc<RwLock<Vec<SentMessage>>>,
    fail: bool,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messenger whose deliveries all fail (and are not recorded).
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }

    pub async fn texts(&self) -> Vec<String> {
        self.sent
            .read()
            .await
            .iter()
            .filter_map(|m| match m {
                SentMessage::Text { text, .. } => Some(text.clone()),
                SentMessage::Image { .. } => None,
            })
            .collect()
    }

    async fn record(&self, user: &str, message: SentMessage) -> DomainResult<()> {
        if self.fail {
            return Err(DomainError::DeliveryFailed {
                user: user.to_string(),
                reason: "mock delivery failure".to_string(),
            });
        }
        self.sent.write().await.push(message);
        Ok(())
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, user: &str, text: &str) -> DomainResult<()> {
        let message = SentMessage::Text {
            user: user.to_string(),
            text: text.to_string(),
        };
        self.record(user, message).await
    }

    async fn send_image(&self, user: &str, image: &str) -> DomainResult<()> {
        let message = SentMessage::Image {
            user: user.to_string(),
            image: image.to_string(),
        };
        self.record(user, message).await
    }
}

/// Data service with in-memory templates that records forwards.
#[derive(Default)]
pub struct RecordingDataService {
    templates: Arc<RwLock<HashMap<String, Template>>>,
    forwarded: Arc<RwLock<Vec<ForwardPayload>>>,
    fail_forwarding: bool,
}

impl RecordingDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data service whose forwards all fail (and are not recorded).
    pub fn failing_forwards() -> Self {
        Self {
            fail_forwarding: true,
            ..Self::default()
        }
    }

    pub async fn set_template(&self, chat_id: impl Into<String>, template: Template) {
        self.templates.write().await.insert(chat_id.into(), template);
    }

    /// Make later template lookups for `chat_id` fail.
    pub async fn remove_template(&self, chat_id: &str) {
        self.templates.write().await.remove(chat_id);
    }

    pub async fn forwarded(&self) -> Vec<ForwardPayload> {
        self.forwarded.read().await.clone()
    }

    /// Forwards that carried extracted rows.
    pub async fn data_forwards(&self) -> Vec<ForwardPayload> {
        self.forwarded
            .read()
            .await
            .iter()
            .filter(|p| p.data.is_some())
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DataService for RecordingDataService {
    async fn forward(&self, payload: &ForwardPayload) -> DomainResult<()> {
        if self.fail_forwarding {
            return Err(DomainError::ForwardingFailed {
                message_id: payload.message_id.clone(),
                reason: "mock forwarding failure".to_string(),
            });
        }
        self.forwarded.write().await.push(payload.clone());
        Ok(())
    }

    async fn get_template(&self, chat_id: &str) -> DomainResult<Template> {
        self.templates
            .read()
            .await
            .get(chat_id)
            .cloned()
            .ok_or_else(|| DomainError::TemplateNotFound(chat_id.to_string()))
    }
}

/// Pending-message store that records what it receives.
#[derive(Default)]
pub struct RecordingPendingStore {
    stored: Arc<RwLock<Vec<(String, PendingMessage)>>>,
}

impl RecordingPendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(chat_id, message)` pairs in arrival order.
    pub async fn stored(&self) -> Vec<(String, PendingMessage)> {
        self.stored.read().await.clone()
    }
}

#[async_trait]
impl PendingMessageStore for RecordingPendingStore {
    async fn store(&self, chat_id: &str, message: &PendingMessage) -> DomainResult<()> {
        self.stored
            .write()
            .await
            .push((chat_id.to_string(), message.clone()));
        Ok(())
    }
}
