//! Common test utilities for integration tests
//!
//! Builds a registry wired to in-memory adapters and provides message and
//! template fixtures plus completion scripting helpers.

#![allow(dead_code)]

use std::sync::Arc;

use field_report_agent::adapters::SvgTableRenderer;
use field_report_agent::adapters::mock::{
    RecordingDataService, RecordingMessenger, RecordingPendingStore, ScriptedCompletionClient,
};
use field_report_agent::domain::models::{NewMessage, PipelineConfig, Template};
use field_report_agent::services::{AgentPorts, AgentRegistry, ReportAgent, prompts};

pub const CHAT_ID: &str = "chat-1";
pub const SENDER_ID: &str = "79990001122";
pub const CONFIRMATION: &str = "Спасибо! Отчёт принят.";
pub const FALLBACK_QUESTION: &str = "Не удалось разобрать отчёт, уточните данные.";

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Template used by the scenarios: date, operation, area, division.
pub fn template() -> Template {
    Template::new(
        vec![
            "Дата".to_string(),
            "Операция".to_string(),
            "Площадь".to_string(),
            "Отделение".to_string(),
        ],
        vec![
            "Операция".to_string(),
            "Площадь".to_string(),
            "Отделение".to_string(),
        ],
    )
}

pub fn private_message(id: &str, text: &str) -> NewMessage {
    NewMessage {
        message_id: id.to_string(),
        source_name: "telegram".to_string(),
        chat_id: CHAT_ID.to_string(),
        text: text.to_string(),
        sender_id: SENDER_ID.to_string(),
        sender_name: "Иван".to_string(),
        image: None,
        voice: None,
        is_private: true,
    }
}

pub fn group_message(id: &str, text: &str) -> NewMessage {
    NewMessage {
        is_private: false,
        ..private_message(id, text)
    }
}

/// Registry over in-memory adapters, with handles for assertions.
pub struct Harness {
    pub completion: Arc<ScriptedCompletionClient>,
    pub messenger: Arc<RecordingMessenger>,
    pub data_service: Arc<RecordingDataService>,
    pub pending_store: Arc<RecordingPendingStore>,
    pub registry: Arc<AgentRegistry>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_parts(
            Arc::new(RecordingMessenger::new()),
            Arc::new(RecordingDataService::new()),
        )
        .await
    }

    pub async fn with_parts(
        messenger: Arc<RecordingMessenger>,
        data_service: Arc<RecordingDataService>,
    ) -> Self {
        setup_test_logging();
        data_service.set_template(CHAT_ID, template()).await;

        let completion = Arc::new(ScriptedCompletionClient::new());
        let pending_store = Arc::new(RecordingPendingStore::new());
        let ports = AgentPorts {
            completion: completion.clone(),
            messenger: messenger.clone(),
            data_service: data_service.clone(),
            pending_store: pending_store.clone(),
            renderer: Arc::new(SvgTableRenderer::default()),
        };
        let config = PipelineConfig {
            confirmation: CONFIRMATION.to_string(),
            fallback_question: FALLBACK_QUESTION.to_string(),
            ..PipelineConfig::default()
        };
        let agent = ReportAgent::new(ports, &config);

        Self {
            completion,
            messenger,
            data_service,
            pending_store,
            registry: Arc::new(AgentRegistry::new(Arc::new(agent))),
        }
    }

    /// Classifier answers `answer` for every message.
    pub async fn classify_as(&self, answer: &str) {
        self.completion
            .respond_when(prompts::classify_user_turn(""), answer)
            .await;
    }

    /// Splitter answers with `fragments`.
    pub async fn split_into(&self, fragments: &[&str]) {
        let response = serde_json::json!({ "separated_reports": fragments }).to_string();
        self.completion
            .respond_when(prompts::split_user_turn(""), response)
            .await;
    }

    /// Extractor answers `response` for `fragment`.
    pub async fn extract(&self, fragment: &str, response: &str) {
        self.completion
            .respond_when(prompts::extract_user_turn(fragment), response)
            .await;
    }
}
