//! Report classifier: a coarse gate deciding whether the extraction
//! pipeline runs for a message at all.

use std::sync::Arc;
use tracing::{debug, instrument};

use super::prompts;
use crate::domain::models::{ChatMessage, MessageKind};
use crate::domain::ports::{CompletionClient, CompletionError, CompletionRequest};

pub struct ReportClassifier {
    client: Arc<dyn CompletionClient>,
}

impl ReportClassifier {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Classify `text`. Transport errors are returned to the caller, which
    /// owns the fallback.
    #[instrument(skip(self, text), fields(chars = text.chars().count()), err)]
    pub async fn classify(&self, text: &str) -> Result<MessageKind, CompletionError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(prompts::CLASSIFIER_INSTRUCTION),
            ChatMessage::user(prompts::classify_user_turn(text)),
        ]);

        let response = self.client.complete(request).await?;
        let kind = interpret(&response);
        debug!(?kind, "message classified");
        Ok(kind)
    }
}

/// A response is a report iff the report marker appears anywhere in it.
///
/// The report marker wins over the talk marker. A response carrying neither
/// counts as talk.
pub fn interpret(response: &str) -> MessageKind {
    if response.contains(prompts::REPORT_MARKER) {
        MessageKind::Report
    } else if response.contains(prompts::TALK_MARKER) {
        MessageKind::Talk
    } else {
        debug!("classifier answer carries no marker, treating as talk");
        MessageKind::Talk
    }
}
