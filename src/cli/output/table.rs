//! Table output formatting for CLI commands

use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets};

use crate::domain::models::Row;

/// Rows under the union of their keys, in first-seen order.
pub fn format_rows(rows: &[Row]) -> String {
    let mut header: Vec<&str> = Vec::new();
    for key in rows.iter().flat_map(Row::keys) {
        if !header.contains(&key) {
            header.push(key);
        }
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        header
            .iter()
            .map(|column| Cell::new(column).add_attribute(Attribute::Bold)),
    );

    for row in rows {
        table.add_row(
            header
                .iter()
                .map(|column| Cell::new(row.get(column).unwrap_or_default())),
        );
    }

    table.to_string()
}
