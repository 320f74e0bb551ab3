use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response, header};
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::retry::RetryPolicy;
use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::domain::models::{CompletionConfig, RetryConfig};
use crate::domain::ports::{CompletionClient, CompletionError, CompletionRequest};
use crate::infrastructure::logging::scrub_api_key;

/// HTTP client for an OpenAI-compatible chat completions endpoint
///
/// Pools connections, authenticates with a bearer token and retries
/// transient failures with exponential backoff.
pub struct OpenAiCompatibleClient {
    http_client: ReqwestClient,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    reasoning_mode: Option<String>,
    retry_policy: RetryPolicy,
}

impl OpenAiCompatibleClient {
    /// Build a client from the `completion` and `retry` config sections
    pub fn new(config: &CompletionConfig, retry: &RetryConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            api_key = %scrub_api_key(&config.api_key),
            "completion client configured"
        );

        Ok(Self {
            http_client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            reasoning_mode: config.reasoning_mode.clone().filter(|m| !m.is_empty()),
            retry_policy: RetryPolicy::from(retry),
        })
    }

    async fn send_once(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: &request.messages,
            max_tokens: self.max_tokens,
            json_schema: request.response_schema.as_ref(),
            reasoning_options_mode: self.reasoning_mode.as_deref(),
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let response = Self::handle_error_response(response).await?;
        let parsed: ChatCompletionResponse = response.json().await?;

        parsed
            .into_content()
            .ok_or_else(|| CompletionError::MalformedResponse("no assistant turn".to_string()))
    }

    async fn handle_error_response(response: Response) -> Result<Response, CompletionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        debug!(%status, body = %body, "completion service returned error status");
        Err(CompletionError::from_status(status, body))
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    #[instrument(
        skip(self, request),
        fields(turns = request.messages.len(), structured = request.response_schema.is_some()),
        err
    )]
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.retry_policy
            .execute(|| self.send_once(&request))
            .await
    }
}
