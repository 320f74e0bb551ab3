use field_report_agent::domain::models::{ExtractionOutcome, Row, Template};
use field_report_agent::services::table_parser::Delimiter;
use field_report_agent::services::{FenceStyle, parse_table_block};
use field_report_agent::services::validator::validate_outcomes;
use proptest::prelude::*;

fn delimiter_strategy() -> impl Strategy<Value = Delimiter> {
    prop_oneof![
        Just(Delimiter::Comma),
        Just(Delimiter::Tab),
        Just(Delimiter::Semicolon),
    ]
}

fn fence_strategy() -> impl Strategy<Value = (&'static str, &'static str)> {
    prop_oneof![Just(("```csv\n", "\n```")), Just(("<table>\n", "\n</table>"))]
}

fn table(columns: usize, cells: &[Vec<String>], delimiter: Delimiter) -> String {
    let separator = (delimiter.as_byte() as char).to_string();
    let header: Vec<String> = (0..columns).map(|i| format!("col{i}")).collect();
    let mut lines = vec![header.join(&separator)];
    lines.extend(cells.iter().map(|row| row.join(&separator)));
    lines.join("\n")
}

fn outcome_strategy() -> impl Strategy<Value = ExtractionOutcome> {
    prop_oneof![
        Just(ExtractionOutcome::failed()),
        (any::<bool>(), any::<bool>()).prop_map(|(operation, area)| {
            let row = Row::from_pairs([
                ("Дата", ""),
                ("Операция", if operation { "Пахота" } else { "" }),
                ("Площадь", if area { "120" } else { "" }),
            ]);
            ExtractionOutcome::new(vec![row], None)
        }),
    ]
}

fn template() -> Template {
    Template::new(
        vec!["Дата".to_string(), "Операция".to_string(), "Площадь".to_string()],
        vec!["Операция".to_string(), "Площадь".to_string()],
    )
}

proptest! {
    /// Property: any delimiter in either fence style parses to the same cells
    #[test]
    fn prop_fenced_table_round_trips_cells(
        columns in 2usize..6,
        rows in 1usize..6,
        seed in prop::collection::vec("[a-z0-9а-я]{1,8}", 36),
        delimiter in delimiter_strategy(),
        (open, close) in fence_strategy(),
    ) {
        let cells: Vec<Vec<String>> = (0..rows)
            .map(|r| (0..columns).map(|c| seed[r * columns + c].clone()).collect())
            .collect();
        let text = format!("Итог:\n{open}{}{close}\nконец", table(columns, &cells, delimiter));

        prop_assert_eq!(Delimiter::detect(text.lines().nth(2).unwrap_or_default()), delimiter);

        let parsed = parse_table_block(&text);
        prop_assert_eq!(parsed.len(), rows);
        for (row, expected) in parsed.iter().zip(&cells) {
            prop_assert_eq!(row.len(), columns);
            for (c, value) in expected.iter().enumerate() {
                let key = format!("col{c}");
                prop_assert_eq!(row.get(&key), Some(value.as_str()));
            }
        }
    }

    /// Property: text without a fence never yields rows
    #[test]
    fn prop_unfenced_text_has_no_rows(text in "[^`<]{0,200}") {
        prop_assert!(FenceStyle::ALL.iter().all(|style| style.extract(&text).is_none()));
        prop_assert!(parse_table_block(&text).is_empty());
    }

    /// Property: conformed rows carry exactly the requested columns in order
    #[test]
    fn prop_conform_matches_column_shape(
        keys in prop::collection::vec("[a-c ]{1,4}", 0..6),
        columns in prop::collection::vec("[a-c]{1,3}", 0..6),
    ) {
        let row = Row::from_pairs(keys.iter().map(|k| (k.clone(), "v".to_string())));
        let conformed = row.conform(&columns);

        let expected: Vec<&str> = columns.iter().map(String::as_str).collect();
        prop_assert_eq!(conformed.keys().collect::<Vec<_>>(), expected);
    }

    /// Property: adding a failed fragment can never make a verdict succeed
    #[test]
    fn prop_validation_is_monotone(
        outcomes in prop::collection::vec(outcome_strategy(), 0..6),
        position in 0usize..6,
    ) {
        let template = template();
        let mut with_failure = outcomes.clone();
        with_failure.insert(position.min(outcomes.len()), ExtractionOutcome::failed());

        let verdict = validate_outcomes(&with_failure, &template, "18.10.2026");
        prop_assert!(!verdict.overall_success);

        let baseline = validate_outcomes(&outcomes, &template, "18.10.2026");
        prop_assert_eq!(verdict.accepted_rows, baseline.accepted_rows);
    }

    /// Property: every accepted row has its date column filled
    #[test]
    fn prop_accepted_rows_are_dated(
        outcomes in prop::collection::vec(outcome_strategy(), 1..6),
    ) {
        let verdict = validate_outcomes(&outcomes, &template(), "18.10.2026");
        for row in &verdict.accepted_rows {
            prop_assert!(!row.is_blank("Дата"));
        }
    }
}
