use anyhow::Result;

use crate::cli::types::ConfigCommands;
use crate::domain::models::Config;
use crate::infrastructure::logging::scrub_api_key;

/// Handle config subcommands. `config` has already been loaded and validated.
pub fn execute(command: &ConfigCommands, config: &Config, json: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let mut shown = config.clone();
            shown.completion.api_key = scrub_api_key(&shown.completion.api_key);

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                print!("{}", serde_yaml::to_string(&shown)?);
            }
        }
        ConfigCommands::Validate => {
            if json {
                println!("{}", serde_json::json!({ "valid": true }));
            } else {
                println!("Configuration is valid.");
            }
        }
    }
    Ok(())
}
