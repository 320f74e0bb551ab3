//! Messenger port: direct replies to a sender.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Delivers text and images to a user of the originating messenger.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, user: &str, text: &str) -> DomainResult<()>;

    /// `image` is a data URL or a plain base64 payload.
    async fn send_image(&self, user: &str, image: &str) -> DomainResult<()>;
}
