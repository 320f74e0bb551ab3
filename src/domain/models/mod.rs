//! Domain models for report extraction and the clarification dialogue.

pub mod agent_state;
pub mod chat;
pub mod config;
pub mod message;
pub mod report;
pub mod row;
pub mod template;

pub use agent_state::{AgentState, Phase};
pub use chat::{ChatMessage, Role};
pub use config::{
    CompletionConfig, Config, LoggingConfig, PipelineConfig, RetryConfig, ServicesConfig,
};
pub use message::{ForwardPayload, NewMessage, PendingMessage};
pub use report::{ExtractionOutcome, MessageKind, ValidationVerdict};
pub use row::Row;
pub use template::Template;
