//! Service layer: the extraction pipeline, the clarification dialogue and
//! the per-sender agent composing them.

pub mod agent;
pub mod agent_registry;
pub mod clarification;
pub mod classifier;
pub mod conversation;
pub mod extractor;
pub mod prompts;
pub mod report_pipeline;
pub mod splitter;
pub mod table_parser;
pub mod validator;

pub use agent::{AgentPorts, ReportAgent};
pub use agent_registry::AgentRegistry;
pub use clarification::{ClarificationManager, ReplyOutcome, compose_questions, rows_to_csv};
pub use classifier::ReportClassifier;
pub use conversation::ConversationService;
pub use extractor::RowExtractor;
pub use report_pipeline::{PipelineResult, ReportPipeline};
pub use splitter::ReportSplitter;
pub use table_parser::{Delimiter, FenceStyle, parse_table_block};
pub use validator::FieldValidator;
