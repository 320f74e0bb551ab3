//! Field Report Agent
//!
//! Turns free-form chat messages describing farm field operations into
//! validated tabular rows, using an OpenAI-compatible completion service as
//! the extraction oracle. Incomplete extractions from direct messages start a
//! clarification dialogue with the sender that lasts until a usable table
//! arrives.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, ports and errors
//! - **Service Layer** (`services`): classifier, splitter, extractor,
//!   validator, clarification dialogue and the per-sender agent
//! - **Adapters** (`adapters`): HTTP collaborators, SVG table rendering and
//!   in-memory test doubles
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging and
//!   the completion client
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use field_report_agent::adapters::SvgTableRenderer;
//! use field_report_agent::adapters::mock::{
//!     RecordingDataService, RecordingMessenger, RecordingPendingStore, ScriptedCompletionClient,
//! };
//! use field_report_agent::domain::models::{NewMessage, PipelineConfig};
//! use field_report_agent::services::{AgentPorts, AgentRegistry, ReportAgent};
//!
//! # async fn example(message: NewMessage) -> anyhow::Result<()> {
//! let ports = AgentPorts {
//!     completion: Arc::new(ScriptedCompletionClient::new()),
//!     messenger: Arc::new(RecordingMessenger::new()),
//!     data_service: Arc::new(RecordingDataService::new()),
//!     pending_store: Arc::new(RecordingPendingStore::new()),
//!     renderer: Arc::new(SvgTableRenderer::default()),
//! };
//! let agent = ReportAgent::new(ports, &PipelineConfig::default());
//! let registry = AgentRegistry::new(Arc::new(agent));
//! registry.dispatch(message).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::models::{
    AgentState, Config, ExtractionOutcome, NewMessage, Phase, Row, Template, ValidationVerdict,
};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AgentRegistry, ReportAgent, parse_table_block};
