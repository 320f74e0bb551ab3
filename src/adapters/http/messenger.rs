use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{build_client, check_status, join_url};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::Messenger;

#[derive(Serialize)]
struct TextBody<'a> {
    user: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct ImageBody<'a> {
    user: &'a str,
    image: &'a str,
}

/// Messenger service reached over `/send_message` and `/send_image`.
#[derive(Debug, Clone)]
pub struct HttpMessenger {
    http: Client,
    base_url: String,
}

impl HttpMessenger {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> DomainResult<Self> {
        Ok(Self {
            http: build_client(timeout_secs)?,
            base_url: base_url.into(),
        })
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, user: &str, body: &B) -> DomainResult<()> {
        let failed = |reason: String| DomainError::DeliveryFailed {
            user: user.to_string(),
            reason,
        };

        let response = self
            .http
            .post(join_url(&self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;
        check_status(response).await.map_err(failed)?;

        debug!(path, "delivered");
        Ok(())
    }
}

#[async_trait]
impl Messenger for HttpMessenger {
    #[instrument(skip(self, text), fields(chars = text.chars().count()), err)]
    async fn send_text(&self, user: &str, text: &str) -> DomainResult<()> {
        self.post("send_message", user, &TextBody { user, text }).await
    }

    #[instrument(skip(self, image), err)]
    async fn send_image(&self, user: &str, image: &str) -> DomainResult<()> {
        self.post("send_image", user, &ImageBody { user, image }).await
    }
}
