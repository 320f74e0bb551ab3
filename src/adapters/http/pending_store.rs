use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::data_service::{ChatRecord, HttpDataService};
use super::{build_client, check_status, join_url};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::PendingMessage;
use crate::domain::ports::PendingMessageStore;

/// Pending-message store keyed by the chat's setting.
///
/// The setting id is looked up on the chat document for every store call.
#[derive(Debug, Clone)]
pub struct HttpPendingStore {
    http: Client,
    base_url: String,
    chats: HttpDataService,
}

impl HttpPendingStore {
    pub fn new(
        base_url: impl Into<String>,
        chats: HttpDataService,
        timeout_secs: u64,
    ) -> DomainResult<Self> {
        Ok(Self {
            http: build_client(timeout_secs)?,
            base_url: base_url.into(),
            chats,
        })
    }
}

#[async_trait]
impl PendingMessageStore for HttpPendingStore {
    #[instrument(skip(self, message), err)]
    async fn store(&self, chat_id: &str, message: &PendingMessage) -> DomainResult<()> {
        let message_id = message.extra["message_id"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let failed = |reason: String| DomainError::ForwardingFailed {
            message_id: message_id.clone(),
            reason,
        };

        let chat = self.chats.get_chat(chat_id).await?;
        let setting_id = ChatRecord::id_of(&chat.setting_id)
            .ok_or_else(|| failed(format!("chat {chat_id} has no setting")))?;

        let response = self
            .http
            .post(join_url(
                &self.base_url,
                &format!("setting/{setting_id}/message_pending"),
            ))
            .json(message)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;
        check_status(response).await.map_err(failed)?;

        debug!(%setting_id, "pending message stored");
        Ok(())
    }
}
