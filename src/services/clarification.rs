//! Clarification dialogue for incomplete extractions.
//!
//! Entering the dialogue shows the sender what was understood (a table
//! image when renderable) and asks the collected questions. Replies are run
//! through a repair conversation until the assistant emits a fenced table.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::conversation::ConversationService;
use super::prompts;
use super::report_pipeline::PipelineResult;
use super::table_parser::parse_table_block;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentState, ChatMessage, ExtractionOutcome, NewMessage, Row};
use crate::domain::ports::{Messenger, TableRenderer};

/// What a reply inside the dialogue led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The repaired table arrived; the dialogue is over. `rows` are bound
    /// to `columns`, the template columns captured when the dialogue began.
    Resolved {
        pending: NewMessage,
        columns: Vec<String>,
        rows: Vec<Row>,
    },
    /// The assistant answered in prose and the dialogue goes on.
    Continued { reply: String },
}

pub struct ClarificationManager {
    messenger: Arc<dyn Messenger>,
    renderer: Arc<dyn TableRenderer>,
    conversation: Arc<ConversationService>,
    fallback_question: String,
}

impl ClarificationManager {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        renderer: Arc<dyn TableRenderer>,
        conversation: Arc<ConversationService>,
        fallback_question: impl Into<String>,
    ) -> Self {
        Self {
            messenger,
            renderer,
            conversation,
            fallback_question: fallback_question.into(),
        }
    }

    /// Ask the sender to repair `result` and move `state` into the dialogue.
    ///
    /// Delivery failures are logged; the state still enters the dialogue.
    #[instrument(
        skip(self, state, message, columns, result),
        fields(sender_id = %state.sender_id, message_id = %message.message_id)
    )]
    pub async fn begin(
        &self,
        state: &mut AgentState,
        message: NewMessage,
        columns: &[String],
        result: &PipelineResult,
    ) {
        let rows = &result.verdict.accepted_rows;
        let user = message.sender_id.clone();

        if let Some(image) = self.renderer.render(columns, rows) {
            if let Err(err) = self.messenger.send_image(&user, &image).await {
                warn!(error = %err, "failed to deliver table image");
            }
        }

        let question = compose_questions(&result.outcomes, &self.fallback_question);
        if let Err(err) = self.messenger.send_text(&user, &question).await {
            warn!(error = %err, "failed to deliver clarification question");
        }

        let table = rows_to_csv(columns, rows);
        let context = if table.is_empty() {
            message.content()
        } else {
            table
        };
        let seed = seed_history(context, question);

        state.begin_follow_up(message, columns.to_vec(), seed);
        info!(rows = rows.len(), "clarification dialogue started");
    }

    /// Feed a sender reply into the repair conversation.
    ///
    /// Prose answers are relayed to the sender. A completion failure leaves
    /// the dialogue untouched.
    #[instrument(skip(self, state, text), fields(sender_id = %state.sender_id), err)]
    pub async fn handle_reply(
        &self,
        state: &mut AgentState,
        text: &str,
    ) -> DomainResult<ReplyOutcome> {
        if !state.is_follow_up() {
            return Err(DomainError::ValidationFailed(
                "no clarification dialogue in progress".to_string(),
            ));
        }

        let reply = self.conversation.exchange(state, text).await?;
        let rows = parse_table_block(&reply);

        if rows.is_empty() {
            if let Err(err) = self.messenger.send_text(&state.sender_id, &reply).await {
                warn!(error = %err, "failed to relay dialogue reply");
            }
            return Ok(ReplyOutcome::Continued { reply });
        }

        let (pending, columns) = state.resolve().ok_or_else(|| {
            DomainError::ValidationFailed("dialogue resolved without a pending message".to_string())
        })?;
        let rows = if columns.is_empty() {
            rows
        } else {
            rows.iter().map(|row| row.conform(&columns)).collect()
        };
        info!(
            rows = rows.len(),
            message_id = %pending.message_id,
            "clarification dialogue resolved"
        );
        Ok(ReplyOutcome::Resolved {
            pending,
            columns,
            rows,
        })
    }
}

/// Initial history of the repair conversation.
pub fn seed_history(context: String, question: String) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(prompts::REPAIR_INSTRUCTION),
        ChatMessage::user(context),
        ChatMessage::assistant(question),
    ]
}

/// Comma-delimited CSV with a header line; empty when there are no rows.
///
/// When `columns` is empty the header is the union of the rows' keys in
/// first-seen order.
pub fn rows_to_csv(columns: &[String], rows: &[Row]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let header: Vec<String> = if columns.is_empty() {
        let mut keys: Vec<String> = Vec::new();
        for key in rows.iter().flat_map(Row::keys) {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        keys
    } else {
        columns.to_vec()
    };

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let mut write = || -> Result<Vec<u8>, csv::Error> {
        writer.write_record(&header)?;
        for row in rows {
            writer.write_record(header.iter().map(|column| row.get(column).unwrap_or_default()))?;
        }
        writer.flush()?;
        Ok(writer.get_ref().clone())
    };

    match write() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim_end().to_string(),
        Err(err) => {
            warn!(error = %err, "failed to render rows as CSV");
            String::new()
        }
    }
}

/// One line per outcome that carries a question, numbered by fragment
/// position starting at 1; `fallback` when no outcome asked anything.
pub fn compose_questions(outcomes: &[ExtractionOutcome], fallback: &str) -> String {
    let questions: Vec<String> = outcomes
        .iter()
        .enumerate()
        .filter_map(|(index, outcome)| {
            outcome
                .question
                .as_ref()
                .map(|question| format!("Вопрос по строке номер {}: {question}", index + 1))
        })
        .collect();

    if questions.is_empty() {
        fallback.to_string()
    } else {
        questions.join("\n")
    }
}
