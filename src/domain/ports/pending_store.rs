//! Pending-message store port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::PendingMessage;

/// Persists accepted reports until they are aggregated into a spreadsheet.
#[async_trait]
pub trait PendingMessageStore: Send + Sync {
    async fn store(&self, chat_id: &str, message: &PendingMessage) -> DomainResult<()>;
}
