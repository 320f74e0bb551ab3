//! Structured report row.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered mapping from column name to cell value.
///
/// Rows coming out of the table parser are unbound (whatever header the text
/// carried). Rows bound to a template are produced by [`Row::conform`] and
/// carry exactly the template's columns in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from key/value pairs. A repeated key keeps its last value.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = Self::new();
        for (key, value) in pairs {
            row.set(key, value);
        }
        row
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True when the column is missing or holds only whitespace.
    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).map_or(true, |v| v.trim().is_empty())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Projects this row onto `columns`.
    ///
    /// Keys are matched after collapsing whitespace, unknown keys are dropped
    /// and missing columns become empty strings.
    pub fn conform(&self, columns: &[String]) -> Self {
        let cells = columns
            .iter()
            .map(|column| {
                let wanted = normalize_key(column);
                let value = self
                    .cells
                    .iter()
                    .find(|(k, _)| normalize_key(k) == wanted)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default();
                (column.clone(), value)
            })
            .collect();
        Self { cells }
    }
}

fn normalize_key(key: &str) -> String {
    key.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_conform_fills_and_drops() {
        let raw = Row::from_pairs([("Операция", "Пахота"), ("Лишнее", "x")]);
        let row = raw.conform(&columns(&["Подразделение", "Операция"]));

        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["Подразделение", "Операция"]);
        assert_eq!(row.get("Подразделение"), Some(""));
        assert_eq!(row.get("Операция"), Some("Пахота"));
        assert_eq!(row.get("Лишнее"), None);
    }

    #[test]
    fn test_conform_matches_whitespace_variants() {
        let raw = Row::from_pairs([(" За  день,   га ", "120")]);
        let row = raw.conform(&columns(&["За день, га"]));
        assert_eq!(row.get("За день, га"), Some("120"));
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut row = Row::from_pairs([("a", "1"), ("b", "2")]);
        row.set("a", "3");
        assert_eq!(row.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_is_blank() {
        let row = Row::from_pairs([("a", "  "), ("b", "x")]);
        assert!(row.is_blank("a"));
        assert!(!row.is_blank("b"));
        assert!(row.is_blank("missing"));
    }

    #[test]
    fn test_serializes_as_object() {
        let row = Row::from_pairs([("a", "1"), ("b", "2")]);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json, serde_json::json!({"a": "1", "b": "2"}));
    }
}
