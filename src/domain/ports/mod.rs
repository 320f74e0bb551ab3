//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces the agent uses to reach its external
//! collaborators:
//! - CompletionClient: the language model completion service
//! - Messenger: direct replies to senders
//! - DataService: message sink and template lookup
//! - PendingMessageStore: persistence of accepted reports
//! - TableRenderer: visual aid shown during clarification
//!
//! Services depend on these traits, never on concrete adapters.

pub mod completion;
pub mod data_service;
pub mod messenger;
pub mod pending_store;
pub mod table_renderer;

pub use completion::{CompletionClient, CompletionError, CompletionRequest};
pub use data_service::DataService;
pub use messenger::Messenger;
pub use pending_store::PendingMessageStore;
pub use table_renderer::TableRenderer;
