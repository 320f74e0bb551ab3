//! Row extraction for a single fragment.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::prompts;
use crate::domain::models::{ChatMessage, ExtractionOutcome, Row, Template};
use crate::domain::ports::{CompletionClient, CompletionRequest};

const CSV_FENCE: &str = "```csv\n";
const QUESTION_FENCE: &str = "```question";
const FENCE_CLOSE: &str = "```";
const FIELD_DELIMITER: char = ';';

pub struct RowExtractor {
    client: Arc<dyn CompletionClient>,
}

impl RowExtractor {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Extract rows and an optional question from one fragment.
    ///
    /// Never fails: a transport error or an answer without a CSV block
    /// gives an unsuccessful outcome.
    #[instrument(skip(self, fragment, template), fields(template = %template.name))]
    pub async fn extract(&self, fragment: &str, template: &Template) -> ExtractionOutcome {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(prompts::extract_instruction(template)),
            ChatMessage::user(prompts::extract_user_turn(fragment)),
        ]);

        match self.client.complete(request).await {
            Ok(response) => {
                let outcome = parse_extraction_response(&response, &template.columns);
                debug!(
                    rows = outcome.rows.len(),
                    has_question = outcome.question.is_some(),
                    "fragment extracted"
                );
                outcome
            }
            Err(err) => {
                warn!(error = %err, "extraction request failed");
                ExtractionOutcome::failed()
            }
        }
    }
}

/// Interpret an extraction answer.
///
/// The first line of the ```` ```csv ```` block is a `;` header; each further
/// non-blank line is zipped with it positionally, truncating to the shorter
/// side. Rows are conformed to `columns` unless no columns are known.
pub fn parse_extraction_response(response: &str, columns: &[String]) -> ExtractionOutcome {
    let rows = csv_block(response)
        .map(parse_semicolon_table)
        .unwrap_or_default()
        .into_iter()
        .map(|row| if columns.is_empty() { row } else { row.conform(columns) })
        .collect();

    ExtractionOutcome::new(rows, question_block(response))
}

fn csv_block(response: &str) -> Option<&str> {
    let start = response.find(CSV_FENCE)? + CSV_FENCE.len();
    let rest = &response[start..];
    let end = rest.find(FENCE_CLOSE).unwrap_or(rest.len());
    Some(&rest[..end])
}

fn question_block(response: &str) -> Option<String> {
    let start = response.find(QUESTION_FENCE)? + QUESTION_FENCE.len();
    let rest = &response[start..];
    let end = rest.find(FENCE_CLOSE).unwrap_or(rest.len());
    let question = rest[..end].trim();
    (!question.is_empty()).then(|| question.to_string())
}

fn parse_semicolon_table(block: &str) -> Vec<Row> {
    let mut lines = block.lines().filter(|line| !line.trim().is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let header: Vec<&str> = header.split(FIELD_DELIMITER).map(str::trim).collect();

    lines
        .map(|line| {
            Row::from_pairs(
                header
                    .iter()
                    .copied()
                    .zip(line.split(FIELD_DELIMITER).map(str::trim)),
            )
        })
        .collect()
}
