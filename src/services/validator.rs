//! Required-field validation over all fragments of a message.

use chrono::Local;
use std::fmt::Write;
use tracing::{debug, warn};

use crate::domain::models::{ExtractionOutcome, Row, Template, ValidationVerdict};

/// Reduces extraction outcomes to a single verdict.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    date_format: String,
}

impl FieldValidator {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    /// Validate against today's local date.
    pub fn validate(&self, outcomes: &[ExtractionOutcome], template: &Template) -> ValidationVerdict {
        let now = Local::now();
        let mut today = String::new();
        if write!(today, "{}", now.format(&self.date_format)).is_err() {
            warn!(format = %self.date_format, "unusable date format, using ISO date");
            today = now.date_naive().to_string();
        }
        validate_outcomes(outcomes, template, &today)
    }
}

/// Verdict for `outcomes`, filling an empty date column with `today` first.
///
/// Any unsuccessful outcome fails the verdict, as does a blank required
/// field on the first row of a successful one. No outcomes at all is a
/// failure. Rows of every successful outcome are accepted either way.
pub fn validate_outcomes(
    outcomes: &[ExtractionOutcome],
    template: &Template,
    today: &str,
) -> ValidationVerdict {
    let date_column = template.date_column();
    let mut overall_success = !outcomes.is_empty();
    let mut accepted_rows = Vec::new();

    for (index, outcome) in outcomes.iter().enumerate() {
        if !outcome.success {
            debug!(fragment = index, "fragment produced no rows");
            overall_success = false;
            continue;
        }

        let rows: Vec<Row> = outcome
            .rows
            .iter()
            .map(|row| fill_date(row, date_column, today))
            .collect();

        if let Some(first) = rows.first() {
            let missing: Vec<&str> = template
                .required_fields
                .iter()
                .map(String::as_str)
                .filter(|field| first.is_blank(field))
                .collect();
            if !missing.is_empty() {
                debug!(fragment = index, ?missing, "required fields missing");
                overall_success = false;
            }
        }

        accepted_rows.extend(rows);
    }

    ValidationVerdict {
        accepted_rows,
        overall_success,
    }
}

fn fill_date(row: &Row, date_column: Option<&str>, today: &str) -> Row {
    let mut row = row.clone();
    if let Some(column) = date_column {
        if row.get(column).is_some_and(|v| v.trim().is_empty()) {
            row.set(column, today);
        }
    }
    row
}
