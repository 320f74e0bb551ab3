use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::cli::output::table::format_rows;
use crate::services::table_parser::{find_table_block, parse_table_block};

/// Handle the parse-table command
pub async fn execute(file: Option<PathBuf>, json: bool) -> Result<()> {
    let text = match file {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read stdin")?;
            text
        }
    };

    let rows = parse_table_block(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    match find_table_block(&text) {
        None => println!("No table block found."),
        Some(_) if rows.is_empty() => println!("Table block has no data rows."),
        Some((style, _)) => {
            println!("{}", format_rows(&rows));
            println!(
                "\n{} row{} ({style:?} fence)",
                rows.len(),
                if rows.len() == 1 { "" } else { "s" }
            );
        }
    }

    Ok(())
}
