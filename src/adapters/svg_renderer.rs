//! SVG rendering of extracted rows for the clarification message.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::{self, Write};
use tracing::warn;

use crate::domain::models::Row;
use crate::domain::ports::TableRenderer;

/// Draws a header row and a grid of cells as an SVG data URL.
#[derive(Debug, Clone)]
pub struct SvgTableRenderer {
    font_size: u32,
    char_width: u32,
    row_height: u32,
    padding: u32,
}

impl Default for SvgTableRenderer {
    fn default() -> Self {
        Self {
            font_size: 14,
            char_width: 9,
            row_height: 28,
            padding: 8,
        }
    }
}

impl SvgTableRenderer {
    /// Raw SVG document for `rows` under `header`.
    pub fn render_svg(&self, header: &[String], rows: &[Row]) -> Result<String, fmt::Error> {
        let widths: Vec<u32> = header
            .iter()
            .map(|column| {
                let longest = rows
                    .iter()
                    .map(|row| text_width(row.get(column).unwrap_or_default()))
                    .chain(std::iter::once(text_width(column)))
                    .max()
                    .unwrap_or(1);
                longest.max(1) * self.char_width + 2 * self.padding
            })
            .collect();

        let width: u32 = widths.iter().sum();
        let height = self.row_height * (u32::try_from(rows.len()).unwrap_or(u32::MAX - 1) + 1);

        let mut svg = String::new();
        write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" font-family="sans-serif" font-size="{}">"#,
            self.font_size
        )?;
        write!(
            svg,
            r##"<rect width="{width}" height="{}" fill="#e8eef4"/>"##,
            self.row_height
        )?;

        let header_cells = header.iter().map(String::as_str);
        self.write_row(&mut svg, &widths, 0, header_cells, true)?;
        for (index, row) in rows.iter().enumerate() {
            let y = self.row_height * (u32::try_from(index).unwrap_or(0) + 1);
            let cells = header.iter().map(|column| row.get(column).unwrap_or_default());
            self.write_row(&mut svg, &widths, y, cells, false)?;
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    fn write_row<'a>(
        &self,
        svg: &mut String,
        widths: &[u32],
        y: u32,
        cells: impl Iterator<Item = &'a str>,
        bold: bool,
    ) -> fmt::Result {
        let weight = if bold { "bold" } else { "normal" };
        let baseline = y + self.row_height / 2 + self.font_size / 3;
        let mut x = 0;
        for (cell, width) in cells.zip(widths) {
            write!(
                svg,
                r##"<rect x="{x}" y="{y}" width="{width}" height="{}" fill="none" stroke="#555"/><text x="{}" y="{baseline}" font-weight="{weight}">{}</text>"##,
                self.row_height,
                x + self.padding,
                escape_xml(cell)
            )?;
            x += width;
        }
        Ok(())
    }
}

impl TableRenderer for SvgTableRenderer {
    fn render(&self, columns: &[String], rows: &[Row]) -> Option<String> {
        if rows.is_empty() {
            return None;
        }

        let header: Vec<String> = if columns.is_empty() {
            let mut keys: Vec<String> = Vec::new();
            for key in rows.iter().flat_map(Row::keys) {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.to_string());
                }
            }
            keys
        } else {
            columns.to_vec()
        };
        if header.is_empty() {
            return None;
        }

        let svg = match self.render_svg(&header, rows) {
            Ok(svg) => svg,
            Err(err) => {
                warn!(error = %err, "failed to render table image");
                return None;
            }
        };
        Some(format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg)))
    }
}

fn text_width(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX / 64)
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
