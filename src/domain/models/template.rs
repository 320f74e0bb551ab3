//! Per-chat report template.

use serde::{Deserialize, Serialize};

/// Report format configured for a chat.
///
/// Fetched fresh for every incoming message and treated as immutable while
/// that message is handled. Field aliases accept the admin panel's camelCase
/// documents as well as snake_case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Human-readable template name
    #[serde(default)]
    pub name: String,

    /// Ordered columns every extracted row carries
    pub columns: Vec<String>,

    /// Subset of `columns` that must be non-empty for a row to be complete
    #[serde(default, alias = "requiredFields")]
    pub required_fields: Vec<String>,

    /// Instruction steering how a message is split into operations
    #[serde(default, alias = "taskSplitPrompt")]
    pub split_instruction: String,

    /// Instruction steering how one operation is turned into rows
    #[serde(default, alias = "systemPrompt")]
    pub extract_instruction: String,

    /// Explicit date column; when unset the first date-like column is used
    #[serde(default, alias = "dateColumn", skip_serializing_if = "Option::is_none")]
    pub date_column: Option<String>,
}

impl Template {
    pub fn new(columns: Vec<String>, required_fields: Vec<String>) -> Self {
        Self {
            name: String::new(),
            columns,
            required_fields,
            split_instruction: String::new(),
            extract_instruction: String::new(),
            date_column: None,
        }
    }

    pub fn with_instructions(
        mut self,
        split_instruction: impl Into<String>,
        extract_instruction: impl Into<String>,
    ) -> Self {
        self.split_instruction = split_instruction.into();
        self.extract_instruction = extract_instruction.into();
        self
    }

    pub fn is_required(&self, column: &str) -> bool {
        self.required_fields.iter().any(|f| f == column)
    }

    /// Column that receives today's date when left empty.
    pub fn date_column(&self) -> Option<&str> {
        if let Some(column) = self.date_column.as_deref() {
            return self.columns.iter().find(|c| *c == column).map(String::as_str);
        }

        self.columns
            .iter()
            .find(|c| {
                let lower = c.to_lowercase();
                lower.contains("дата") || lower.contains("date")
            })
            .map(String::as_str)
    }

    /// Renders the column list as a table definition for the extraction prompt.
    pub fn table_definition(&self) -> String {
        let mut output = String::from("Определение таблицы:\n\n");
        for column in &self.columns {
            output.push_str(&format!("Столбец: {column}\n"));
            let required = if self.is_required(column) { "да" } else { "нет" };
            output.push_str(&format!("Обязательно?: {required}\n\n"));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_camel_case_document_parses() {
        let json = r#"{
            "name": "Полевые работы",
            "columns": ["Дата", "Подразделение", "Операция"],
            "requiredFields": ["Подразделение"],
            "taskSplitPrompt": "split",
            "systemPrompt": "extract"
        }"#;

        let template: Template = serde_json::from_str(json).unwrap();
        assert_eq!(template.columns.len(), 3);
        assert_eq!(template.required_fields, vec!["Подразделение".to_string()]);
        assert_eq!(template.split_instruction, "split");
        assert_eq!(template.extract_instruction, "extract");
    }

    #[test]
    fn test_date_column_detection() {
        let template = Template::new(columns(&["Подразделение", "Дата операции"]), vec![]);
        assert_eq!(template.date_column(), Some("Дата операции"));

        let template = Template::new(columns(&["Operation", "Report date"]), vec![]);
        assert_eq!(template.date_column(), Some("Report date"));

        let template = Template::new(columns(&["Подразделение"]), vec![]);
        assert_eq!(template.date_column(), None);
    }

    #[test]
    fn test_explicit_date_column_must_exist() {
        let mut template = Template::new(columns(&["День", "Дата"]), vec![]);
        template.date_column = Some("День".to_string());
        assert_eq!(template.date_column(), Some("День"));

        template.date_column = Some("Missing".to_string());
        assert_eq!(template.date_column(), None);
    }

    #[test]
    fn test_table_definition_marks_required() {
        let template = Template::new(columns(&["A", "B"]), columns(&["B"]));
        let definition = template.table_definition();
        assert!(definition.contains("Столбец: A\nОбязательно?: нет"));
        assert!(definition.contains("Столбец: B\nОбязательно?: да"));
    }
}
