//! Report splitter: one fragment per distinct field operation.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{instrument, warn};

use super::prompts;
use crate::domain::models::{ChatMessage, Template};
use crate::domain::ports::{CompletionClient, CompletionError, CompletionRequest};

#[derive(Debug, Deserialize)]
struct SplitResponse {
    separated_reports: Vec<String>,
}

pub struct ReportSplitter {
    client: Arc<dyn CompletionClient>,
}

impl ReportSplitter {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Split `text` into ordered fragments.
    ///
    /// A malformed structured answer yields no fragments; transport errors
    /// are returned.
    #[instrument(skip(self, text, template), fields(template = %template.name), err)]
    pub async fn split(
        &self,
        text: &str,
        template: &Template,
    ) -> Result<Vec<String>, CompletionError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(prompts::split_instruction(template)),
            ChatMessage::user(prompts::split_user_turn(text)),
        ])
        .with_schema(prompts::split_schema());

        let response = self.client.complete(request).await?;
        Ok(parse_split_response(&response))
    }
}

/// Read `{separated_reports: [...]}` from the outermost braces of `response`.
///
/// Blank fragments are dropped. Anything unparseable yields an empty list.
pub fn parse_split_response(response: &str) -> Vec<String> {
    let Some(json) = outermost_object(response) else {
        warn!("split response carries no JSON object");
        return Vec::new();
    };

    match serde_json::from_str::<SplitResponse>(json) {
        Ok(parsed) => parsed
            .separated_reports
            .into_iter()
            .filter(|fragment| !fragment.trim().is_empty())
            .collect(),
        Err(err) => {
            warn!(error = %err, "malformed split response");
            Vec::new()
        }
    }
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
