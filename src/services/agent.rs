//! Per-sender agent: routes each inbound message through classification,
//! extraction, the clarification dialogue and the downstream collaborators.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::clarification::{ClarificationManager, ReplyOutcome};
use super::classifier::ReportClassifier;
use super::conversation::ConversationService;
use super::report_pipeline::{PipelineResult, ReportPipeline};
use super::validator::FieldValidator;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentState, ForwardPayload, MessageKind, NewMessage, PendingMessage, PipelineConfig, Row,
    Template,
};
use crate::domain::ports::{
    CompletionClient, DataService, Messenger, PendingMessageStore, TableRenderer,
};

/// External collaborators the agent talks to.
#[derive(Clone)]
pub struct AgentPorts {
    pub completion: Arc<dyn CompletionClient>,
    pub messenger: Arc<dyn Messenger>,
    pub data_service: Arc<dyn DataService>,
    pub pending_store: Arc<dyn PendingMessageStore>,
    pub renderer: Arc<dyn TableRenderer>,
}

pub struct ReportAgent {
    classifier: ReportClassifier,
    pipeline: ReportPipeline,
    conversation: Arc<ConversationService>,
    clarification: ClarificationManager,
    messenger: Arc<dyn Messenger>,
    data_service: Arc<dyn DataService>,
    pending_store: Arc<dyn PendingMessageStore>,
    confirmation: String,
}

impl ReportAgent {
    pub fn new(ports: AgentPorts, config: &PipelineConfig) -> Self {
        let conversation = Arc::new(ConversationService::new(
            Arc::clone(&ports.completion),
            config.max_history_turns,
        ));

        Self {
            classifier: ReportClassifier::new(Arc::clone(&ports.completion)),
            pipeline: ReportPipeline::new(
                Arc::clone(&ports.completion),
                FieldValidator::new(config.date_format.clone()),
            ),
            clarification: ClarificationManager::new(
                Arc::clone(&ports.messenger),
                ports.renderer,
                Arc::clone(&conversation),
                config.fallback_question.clone(),
            ),
            conversation,
            messenger: ports.messenger,
            data_service: ports.data_service,
            pending_store: ports.pending_store,
            confirmation: config.confirmation.clone(),
        }
    }

    /// Handle a direct message from the sender owning `state`.
    #[instrument(
        skip(self, state, message),
        fields(
            message_id = %message.message_id,
            sender_id = %message.sender_id,
            chat_id = %message.chat_id,
            phase = if state.is_follow_up() { "follow_up" } else { "none" },
        ),
        err
    )]
    pub async fn handle_private(
        &self,
        state: &mut AgentState,
        message: NewMessage,
    ) -> DomainResult<()> {
        if state.is_follow_up() {
            return self.continue_dialogue(state, &message).await;
        }

        let text = message.content();
        match self.classify(&text).await {
            MessageKind::Talk => {
                let reply = self.conversation.chat(state, &text).await?;
                self.messenger.send_text(&message.sender_id, &reply).await
            }
            MessageKind::Report => {
                self.forward_initial(&message).await;
                let template = self.template_for(&message.chat_id).await?;
                let result = self.pipeline.run(&text, &template).await;

                if result.is_success() {
                    let rows = result.verdict.accepted_rows;
                    self.accept(&message, &template.columns, rows).await;
                    self.confirm(&message.sender_id).await;
                } else {
                    self.clarification
                        .begin(state, message, &template.columns, &result)
                        .await;
                }
                Ok(())
            }
        }
    }

    /// Handle a group message. Groups never enter the clarification
    /// dialogue: a report that fails validation is dropped.
    #[instrument(
        skip(self, message),
        fields(message_id = %message.message_id, chat_id = %message.chat_id),
        err
    )]
    pub async fn handle_group(&self, message: NewMessage) -> DomainResult<()> {
        self.forward_initial(&message).await;

        let text = message.content();
        if self.classify(&text).await == MessageKind::Talk {
            debug!("group message is not a report");
            return Ok(());
        }

        let template = self.template_for(&message.chat_id).await?;
        let result: PipelineResult = self.pipeline.run(&text, &template).await;

        if result.is_success() {
            self.accept(&message, &template.columns, result.verdict.accepted_rows)
                .await;
        } else {
            info!(
                rows = result.verdict.accepted_rows.len(),
                "group report failed validation, dropped"
            );
        }
        Ok(())
    }

    async fn continue_dialogue(
        &self,
        state: &mut AgentState,
        message: &NewMessage,
    ) -> DomainResult<()> {
        match self
            .clarification
            .handle_reply(state, &message.content())
            .await?
        {
            ReplyOutcome::Continued { .. } => Ok(()),
            ReplyOutcome::Resolved {
                pending,
                columns,
                rows,
            } => {
                self.accept(&pending, &columns, rows).await;
                self.confirm(&message.sender_id).await;
                Ok(())
            }
        }
    }

    /// Classification failures fall back to conversation.
    async fn classify(&self, text: &str) -> MessageKind {
        match self.classifier.classify(text).await {
            Ok(kind) => kind,
            Err(err) => {
                warn!(error = %err, "classification failed, treating as conversation");
                MessageKind::Talk
            }
        }
    }

    async fn template_for(&self, chat_id: &str) -> DomainResult<Template> {
        self.data_service.get_template(chat_id).await.map_err(|err| {
            error!(error = %err, chat_id, "template unavailable, report not processed");
            match err {
                DomainError::TemplateNotFound(_) => err,
                other => DomainError::TemplateNotFound(format!("{chat_id}: {other}")),
            }
        })
    }

    async fn forward_initial(&self, message: &NewMessage) {
        if let Err(err) = self
            .data_service
            .forward(&ForwardPayload::initial(message))
            .await
        {
            warn!(error = %err, "initial forward failed");
        }
    }

    /// Send accepted rows downstream. Failures are logged, never surfaced.
    async fn accept(&self, message: &NewMessage, columns: &[String], rows: Vec<Row>) {
        let pending = PendingMessage::from_rows(message, columns, &rows);

        if let Err(err) = self
            .data_service
            .forward(&ForwardPayload::with_rows(message, rows))
            .await
        {
            warn!(error = %err, message_id = %message.message_id, "row forward failed");
        }

        if let Err(err) = self.pending_store.store(&message.chat_id, &pending).await {
            warn!(error = %err, message_id = %message.message_id, "pending store failed");
        }

        info!(message_id = %message.message_id, "report accepted");
    }

    async fn confirm(&self, user: &str) {
        if let Err(err) = self.messenger.send_text(user, &self.confirmation).await {
            warn!(error = %err, "failed to deliver confirmation");
        }
    }
}
