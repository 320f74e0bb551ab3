//! HTTP adapters for the messenger, data service and pending-message store.

pub mod data_service;
pub mod messenger;
pub mod pending_store;

pub use data_service::HttpDataService;
pub use messenger::HttpMessenger;
pub use pending_store::HttpPendingStore;

use reqwest::{Client, Response};
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};

/// Shared client settings for collaborator services.
pub(crate) fn build_client(timeout_secs: u64) -> DomainResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| DomainError::Configuration(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Status line and body of a non-success response, or the response itself.
pub(crate) async fn check_status(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(format!("{status}: {body}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://a:1/", "/send_message"), "http://a:1/send_message");
        assert_eq!(join_url("http://a:1", "api/chats"), "http://a:1/api/chats");
    }
}
