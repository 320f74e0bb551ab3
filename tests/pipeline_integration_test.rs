//! Extraction pass over multi-fragment messages.

mod common;

use std::sync::Arc;

use common::template;
use field_report_agent::adapters::mock::ScriptedCompletionClient;
use field_report_agent::domain::models::Template;
use field_report_agent::services::prompts;
use field_report_agent::services::{
    FieldValidator, ReportPipeline, compose_questions, rows_to_csv,
};

const PLOUGHING: &str = "Пахота 120 га отд 5";
const SOWING: &str = "Сев 40 га";

async fn scripted(fragments: &[&str], extractions: &[(&str, &str)]) -> Arc<ScriptedCompletionClient> {
    common::setup_test_logging();
    let client = Arc::new(ScriptedCompletionClient::new());
    let split = serde_json::json!({ "separated_reports": fragments }).to_string();
    client
        .respond_when(prompts::split_user_turn(""), format!("Ответ: {split}"))
        .await;
    for (fragment, response) in extractions {
        client
            .respond_when(prompts::extract_user_turn(fragment), *response)
            .await;
    }
    client
}

fn pipeline(client: Arc<ScriptedCompletionClient>) -> ReportPipeline {
    ReportPipeline::new(client, FieldValidator::new("%d.%m.%Y"))
}

#[tokio::test]
async fn test_two_fragments_keep_order_and_default_date() {
    let client = scripted(
        &[PLOUGHING, SOWING],
        &[
            (PLOUGHING, "```csv\nОперация;Площадь;Отделение\nПахота;120;5\n```"),
            (SOWING, "```csv\nОперация;Площадь;Отделение\nСев;40;7\n```"),
        ],
    )
    .await;

    let result = pipeline(client.clone())
        .run(&format!("{PLOUGHING}\n{SOWING}"), &template())
        .await;

    assert!(result.is_success());
    let operations: Vec<&str> = result
        .verdict
        .accepted_rows
        .iter()
        .filter_map(|row| row.get("Операция"))
        .collect();
    assert_eq!(operations, vec!["Пахота", "Сев"]);
    assert!(result.verdict.accepted_rows.iter().all(|row| !row.is_blank("Дата")));

    // one split and one extraction per fragment
    assert_eq!(client.requests().await.len(), 3);
}

#[tokio::test]
async fn test_question_numbering_follows_fragment_position() {
    let client = scripted(
        &[PLOUGHING, SOWING],
        &[
            (PLOUGHING, "```csv\nОперация;Площадь;Отделение\nПахота;120;5\n```"),
            (
                SOWING,
                "```csv\nОперация;Площадь;Отделение\nСев;40;\n```\n```question\nВ каком отделении сев?\n```",
            ),
        ],
    )
    .await;

    let result = pipeline(client)
        .run(&format!("{PLOUGHING}\n{SOWING}"), &template())
        .await;

    assert!(!result.is_success());
    assert_eq!(result.verdict.accepted_rows.len(), 2);
    assert_eq!(
        compose_questions(&result.outcomes, "?"),
        "Вопрос по строке номер 2: В каком отделении сев?"
    );
}

#[tokio::test]
async fn test_unreadable_fragment_fails_whole_message() {
    let client = scripted(
        &[PLOUGHING, SOWING],
        &[
            (PLOUGHING, "```csv\nОперация;Площадь;Отделение\nПахота;120;5\n```"),
            (SOWING, "не понял сообщение"),
        ],
    )
    .await;

    let result = pipeline(client)
        .run(&format!("{PLOUGHING}\n{SOWING}"), &template())
        .await;

    assert!(!result.is_success());
    assert_eq!(result.outcomes.len(), 2);
    assert!(result.outcomes[0].success);
    assert!(!result.outcomes[1].success);
    assert_eq!(result.verdict.accepted_rows.len(), 1);
}

#[tokio::test]
async fn test_template_instructions_reach_the_model() {
    let client = scripted(
        &[PLOUGHING],
        &[(PLOUGHING, "```csv\nОперация;Площадь;Отделение\nПахота;120;5\n```")],
    )
    .await;
    let custom = Template::new(
        vec!["Операция".to_string(), "Площадь".to_string(), "Отделение".to_string()],
        vec!["Операция".to_string()],
    )
    .with_instructions("Раздели по операциям", "Извлеки операции");

    pipeline(client.clone()).run(PLOUGHING, &custom).await;

    let requests = client.requests().await;
    assert_eq!(requests[0].messages[0].content, "Раздели по операциям");
    assert!(requests[0].response_schema.is_some());
    assert!(requests[1].messages[0].content.starts_with("Извлеки операции"));
    assert!(requests[1].messages[0].content.contains("Отделение"));
}

#[tokio::test]
async fn test_partial_rows_seed_clarification_table() {
    let client = scripted(
        &[PLOUGHING],
        &[(PLOUGHING, "```csv\nОперация;Площадь;Отделение\nПахота;120;\n```")],
    )
    .await;
    let template = template();

    let result = pipeline(client).run(PLOUGHING, &template).await;
    let csv = rows_to_csv(&template.columns, &result.verdict.accepted_rows);

    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Дата,Операция,Площадь,Отделение"));
    let row = lines.next().unwrap();
    assert!(row.ends_with(",Пахота,120,"));
    assert!(lines.next().is_none());
}
