//! OpenAI-compatible completion service client
//!
//! Implements the `CompletionClient` port over HTTP with retry and
//! exponential backoff for transient failures.

pub mod client;
pub mod retry;
pub mod types;

pub use client::OpenAiCompatibleClient;
pub use retry::RetryPolicy;
