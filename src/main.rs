//! Field Report Agent CLI entry point.

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use field_report_agent::cli::{Cli, Commands, commands, handle_error, load_config};
use field_report_agent::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli.command, cli.config.as_deref(), cli.json).await {
        handle_error(&err, cli.json);
    }
}

async fn run(
    command: Commands,
    config_path: Option<&std::path::Path>,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        Commands::Run { input } => {
            let config = load_config(config_path)?;
            let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;
            commands::run::execute(&config, input, json).await
        }
        Commands::ParseTable { file } => {
            init_stderr_logging();
            commands::parse_table::execute(file, json).await
        }
        Commands::Config(command) => {
            init_stderr_logging();
            let config = load_config(config_path)?;
            commands::config::execute(&command, &config, json)
        }
    }
}

/// Quiet diagnostics for one-shot commands, keeping stdout for output.
fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
