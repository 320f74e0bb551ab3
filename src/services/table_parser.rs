//! Table-block parsing
//!
//! Finds a delimited table inside free-form text (usually a completion
//! service reply), detects its delimiter and reads it into unbound rows.

use tracing::debug;

use crate::domain::models::Row;

/// Fence pair enclosing a table block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceStyle {
    /// ```` ```csv ... ``` ````
    Markdown,
    /// `<table> ... </table>`
    TableTag,
}

impl FenceStyle {
    /// Detection order.
    pub const ALL: [Self; 2] = [Self::Markdown, Self::TableTag];

    const fn markers(self) -> (&'static str, &'static str) {
        match self {
            Self::Markdown => ("```csv\n", "\n```"),
            Self::TableTag => ("<table>\n", "\n</table>"),
        }
    }

    /// Content between the first opening marker and the next closing marker.
    pub fn extract(self, text: &str) -> Option<&str> {
        let (open, close) = self.markers();
        let start = text.find(open)? + open.len();
        let end = text[start..].find(close)? + start;
        Some(&text[start..end])
    }
}

/// Field delimiter of a table block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Semicolon,
}

impl Delimiter {
    /// Detection order.
    pub const ALL: [Self; 3] = [Self::Comma, Self::Tab, Self::Semicolon];

    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Tab => b'\t',
            Self::Semicolon => b';',
        }
    }

    /// First delimiter present in `header_line`, comma when none is.
    pub fn detect(header_line: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|d| header_line.as_bytes().contains(&d.as_byte()))
            .unwrap_or_default()
    }
}

/// Locate the table block in `text`, trying each fence style in order.
pub fn find_table_block(text: &str) -> Option<(FenceStyle, &str)> {
    FenceStyle::ALL
        .into_iter()
        .find_map(|style| style.extract(text).map(|content| (style, content)))
}

/// Parse the first fenced table in `text` into rows.
///
/// Returns an empty list when no fenced block exists. Keys and values are
/// trimmed and columns with an empty header are dropped. Ragged records are
/// read leniently: a short record leaves its trailing columns empty and extra
/// cells are ignored.
pub fn parse_table_block(text: &str) -> Vec<Row> {
    let Some((style, content)) = find_table_block(text) else {
        return Vec::new();
    };

    let header_line = content.lines().next().unwrap_or_default();
    let delimiter = Delimiter::detect(header_line);
    debug!(?style, ?delimiter, "table block found");

    parse_delimited(content, delimiter)
}

/// Read `content` as delimited records with a header line.
pub fn parse_delimited(content: &str, delimiter: Delimiter) -> Vec<Row> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => {
            debug!(error = %err, "unreadable table header");
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                debug!(error = %err, "skipping unreadable table record");
                continue;
            }
        };

        let row = Row::from_pairs(
            headers
                .iter()
                .enumerate()
                .filter(|(_, key)| !key.is_empty())
                .map(|(i, key)| (key, record.get(i).unwrap_or_default())),
        );
        if !row.is_empty() {
            rows.push(row);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fenced(content: &str) -> String {
        format!("Вот таблица:\n```csv\n{content}\n```\nГотово")
    }

    #[test]
    fn test_detects_each_delimiter() {
        for content in ["a,b,c\n1,2,3", "a\tb\tc\n1\t2\t3", "a;b;c\n1;2;3"] {
            let rows = parse_table_block(&fenced(content));
            assert_eq!(rows.len(), 1, "content: {content:?}");
            assert_eq!(rows[0], Row::from_pairs([("a", "1"), ("b", "2"), ("c", "3")]));
        }
    }

    #[test]
    fn test_comma_wins_over_semicolon() {
        assert_eq!(Delimiter::detect("a;b,c"), Delimiter::Comma);
        assert_eq!(Delimiter::detect("a;b\tc"), Delimiter::Tab);
        assert_eq!(Delimiter::detect("single"), Delimiter::Comma);
    }

    #[test]
    fn test_table_tag_fence() {
        let text = "<table>\nОперация;Площадь\nПахота;120\n</table>";
        let rows = parse_table_block(text);
        assert_eq!(rows, vec![Row::from_pairs([("Операция", "Пахота"), ("Площадь", "120")])]);
    }

    #[test]
    fn test_markdown_fence_preferred() {
        let text = "<table>\nx\n1\n</table>\n```csv\ny\n2\n```";
        assert_eq!(find_table_block(text).map(|(s, _)| s), Some(FenceStyle::Markdown));
    }

    #[test]
    fn test_no_fence_yields_nothing() {
        assert!(parse_table_block("Пахота 120 га, Отд 5").is_empty());
        assert!(parse_table_block("```csv\nunterminated").is_empty());
    }

    #[test]
    fn test_trims_and_drops_empty_header() {
        let rows = parse_table_block(&fenced(" a , ,b\n 1 , x , 2 "));
        assert_eq!(rows, vec![Row::from_pairs([("a", "1"), ("b", "2")])]);
    }

    #[test]
    fn test_ragged_rows_degrade() {
        let rows = parse_table_block(&fenced("a,b,c\n1,2\n4,5,6,7"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Row::from_pairs([("a", "1"), ("b", "2"), ("c", "")]));
        assert_eq!(rows[1], Row::from_pairs([("a", "4"), ("b", "5"), ("c", "6")]));
    }

    #[test]
    fn test_short_record_fills_trailing_columns() {
        let rows = parse_table_block(&fenced("a,b,c\n1"));
        assert_eq!(rows, vec![Row::from_pairs([("a", "1"), ("b", ""), ("c", "")])]);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_multiple_rows() {
        let rows = parse_table_block(&fenced("Операция,Площадь\nПахота,120\nСев,40"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("Операция"), Some("Сев"));
    }
}
