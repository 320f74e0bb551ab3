//! Split, extract concurrently, validate.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::extractor::RowExtractor;
use super::splitter::ReportSplitter;
use super::validator::FieldValidator;
use crate::domain::models::{ExtractionOutcome, Template, ValidationVerdict};
use crate::domain::ports::CompletionClient;

/// Result of one extraction pass over a message.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Per-fragment outcomes in fragment order
    pub outcomes: Vec<ExtractionOutcome>,
    pub verdict: ValidationVerdict,
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        self.verdict.overall_success
    }
}

pub struct ReportPipeline {
    splitter: ReportSplitter,
    extractor: RowExtractor,
    validator: FieldValidator,
}

impl ReportPipeline {
    pub fn new(client: Arc<dyn CompletionClient>, validator: FieldValidator) -> Self {
        Self {
            splitter: ReportSplitter::new(Arc::clone(&client)),
            extractor: RowExtractor::new(client),
            validator,
        }
    }

    /// Run the pipeline over `text`.
    ///
    /// A failed split is treated as zero fragments, which yields a failed
    /// verdict.
    #[instrument(skip(self, text, template), fields(template = %template.name))]
    pub async fn run(&self, text: &str, template: &Template) -> PipelineResult {
        let fragments = match self.splitter.split(text, template).await {
            Ok(fragments) => fragments,
            Err(err) => {
                warn!(error = %err, "split request failed, treating as no fragments");
                Vec::new()
            }
        };

        // join_all keeps submission order
        let outcomes = join_all(
            fragments
                .iter()
                .map(|fragment| self.extractor.extract(fragment, template)),
        )
        .await;

        let verdict = self.validator.validate(&outcomes, template);
        info!(
            fragments = fragments.len(),
            rows = verdict.accepted_rows.len(),
            success = verdict.overall_success,
            "extraction pass finished"
        );

        PipelineResult { outcomes, verdict }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::ScriptedCompletionClient;
    use crate::domain::ports::CompletionError;
    use crate::services::prompts;

    fn template() -> Template {
        Template::new(
            vec!["Операция".into(), "Площадь".into()],
            vec!["Операция".into(), "Площадь".into()],
        )
    }

    #[tokio::test]
    async fn test_outcomes_follow_fragment_order() {
        let client = Arc::new(ScriptedCompletionClient::new());
        client
            .respond_when(
                prompts::split_user_turn(""),
                r#"{"separated_reports": ["Пахота 120", "Сев 40"]}"#,
            )
            .await;
        client
            .respond_when("Сев 40", "```csv\nОперация;Площадь\nСев;40\n```")
            .await;
        client
            .respond_when("Пахота 120", "```csv\nОперация;Площадь\nПахота;120\n```")
            .await;

        let pipeline = ReportPipeline::new(client, FieldValidator::new("%d.%m.%Y"));
        let result = pipeline.run("Пахота 120, Сев 40", &template()).await;

        assert!(result.is_success());
        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.verdict.accepted_rows[0].get("Операция"), Some("Пахота"));
        assert_eq!(result.verdict.accepted_rows[1].get("Операция"), Some("Сев"));
    }

    #[tokio::test]
    async fn test_split_failure_is_failed_verdict() {
        let client = Arc::new(ScriptedCompletionClient::new());
        client.enqueue(Err(CompletionError::Timeout)).await;

        let pipeline = ReportPipeline::new(client, FieldValidator::new("%d.%m.%Y"));
        let result = pipeline.run("Пахота", &template()).await;

        assert!(!result.is_success());
        assert!(result.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_one_bad_fragment_fails_all() {
        let client = Arc::new(ScriptedCompletionClient::new());
        client
            .respond_when(
                prompts::split_user_turn(""),
                r#"{"separated_reports": ["Пахота 120", "непонятно"]}"#,
            )
            .await;
        client
            .respond_when("Пахота 120", "```csv\nОперация;Площадь\nПахота;120\n```")
            .await;
        client.respond_when("непонятно", "не могу разобрать").await;

        let pipeline = ReportPipeline::new(client, FieldValidator::new("%d.%m.%Y"));
        let result = pipeline.run("Пахота 120, непонятно", &template()).await;

        assert!(!result.is_success());
        assert_eq!(result.verdict.accepted_rows.len(), 1);
    }
}
