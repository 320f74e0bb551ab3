use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{build_client, check_status, join_url};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ForwardPayload, Template};
use crate::domain::ports::DataService;

const SERVICE: &str = "data service";

/// Chat document as stored by the data service.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRecord {
    #[serde(default)]
    pub template_id: Value,
    #[serde(default)]
    pub setting_id: Value,
}

impl ChatRecord {
    /// Identifier as text; absent, null, zero and empty ids yield `None`.
    pub fn id_of(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) if n.as_i64() != Some(0) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Data service client: message sink, chats and templates.
#[derive(Debug, Clone)]
pub struct HttpDataService {
    http: Client,
    base_url: String,
}

impl HttpDataService {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> DomainResult<Self> {
        Ok(Self {
            http: build_client(timeout_secs)?,
            base_url: base_url.into(),
        })
    }

    fn invalid(reason: impl Into<String>) -> DomainError {
        DomainError::InvalidResponse {
            service: SERVICE.to_string(),
            reason: reason.into(),
        }
    }

    /// Fetch the chat document; `TemplateNotFound` when the chat is unknown.
    #[instrument(skip(self), err)]
    pub async fn get_chat(&self, chat_id: &str) -> DomainResult<ChatRecord> {
        let response = self
            .http
            .get(join_url(&self.base_url, &format!("api/chats/{chat_id}")))
            .send()
            .await
            .map_err(|e| Self::invalid(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DomainError::TemplateNotFound(chat_id.to_string()));
        }
        let response = check_status(response).await.map_err(Self::invalid)?;

        response
            .json::<ChatRecord>()
            .await
            .map_err(|e| Self::invalid(format!("chat {chat_id}: {e}")))
    }
}

#[async_trait]
impl DataService for HttpDataService {
    #[instrument(skip(self, payload), fields(message_id = %payload.message_id, rows = payload.data.as_ref().map_or(0, Vec::len)), err)]
    async fn forward(&self, payload: &ForwardPayload) -> DomainResult<()> {
        let failed = |reason: String| DomainError::ForwardingFailed {
            message_id: payload.message_id.clone(),
            reason,
        };

        let response = self
            .http
            .post(join_url(&self.base_url, "api/chats/new_message"))
            .json(payload)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;
        check_status(response).await.map_err(failed)?;

        debug!("message forwarded");
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn get_template(&self, chat_id: &str) -> DomainResult<Template> {
        let chat = self.get_chat(chat_id).await?;
        let template_id = ChatRecord::id_of(&chat.template_id)
            .ok_or_else(|| DomainError::TemplateNotFound(chat_id.to_string()))?;

        let response = self
            .http
            .get(join_url(&self.base_url, "api/templates"))
            .query(&[("id", template_id.as_str())])
            .send()
            .await
            .map_err(|e| Self::invalid(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DomainError::TemplateNotFound(chat_id.to_string()));
        }
        let response = check_status(response).await.map_err(Self::invalid)?;

        let template: Template = response
            .json()
            .await
            .map_err(|e| Self::invalid(format!("template {template_id}: {e}")))?;
        debug!(%template_id, columns = template.columns.len(), "template loaded");
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_of() {
        assert_eq!(ChatRecord::id_of(&json!(7)), Some("7".to_string()));
        assert_eq!(ChatRecord::id_of(&json!("abc")), Some("abc".to_string()));
        assert_eq!(ChatRecord::id_of(&json!(0)), None);
        assert_eq!(ChatRecord::id_of(&json!("")), None);
        assert_eq!(ChatRecord::id_of(&Value::Null), None);
    }
}
