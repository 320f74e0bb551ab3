use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::adapters::SvgTableRenderer;
use crate::adapters::http::{HttpDataService, HttpMessenger, HttpPendingStore};
use crate::domain::models::{Config, NewMessage};
use crate::infrastructure::completion::OpenAiCompatibleClient;
use crate::services::{AgentPorts, AgentRegistry, ReportAgent};

/// Counters reported when the input is exhausted.
#[derive(Debug, Default, serde::Serialize)]
pub struct RunSummary {
    /// Correlates this run's log lines
    pub run_id: Uuid,
    pub received: usize,
    pub malformed: usize,
    pub failed: usize,
    pub senders: usize,
}

/// Wire the HTTP collaborators from `config` into a registry.
pub fn build_registry(config: &Config) -> Result<AgentRegistry> {
    let timeout = config.services.timeout_secs;
    let completion = OpenAiCompatibleClient::new(&config.completion, &config.retry)?;
    let data_service = HttpDataService::new(&config.services.data_service_url, timeout)?;
    let pending_store =
        HttpPendingStore::new(&config.services.pending_store_url, data_service.clone(), timeout)?;
    let messenger = HttpMessenger::new(&config.services.messenger_url, timeout)?;

    let ports = AgentPorts {
        completion: Arc::new(completion),
        messenger: Arc::new(messenger),
        data_service: Arc::new(data_service),
        pending_store: Arc::new(pending_store),
        renderer: Arc::new(SvgTableRenderer::default()),
    };
    let agent = ReportAgent::new(ports, &config.pipeline);
    Ok(AgentRegistry::new(Arc::new(agent)))
}

/// Handle the run command
pub async fn execute(config: &Config, input: Option<PathBuf>, json: bool) -> Result<()> {
    let registry = Arc::new(build_registry(config)?);

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
        Some(path) => Box::new(BufReader::new(
            tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let summary = process_events(reader, registry).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Run {}: processed {} message(s) from {} sender(s), {} malformed, {} failed",
            summary.run_id, summary.received, summary.senders, summary.malformed, summary.failed
        );
    }
    Ok(())
}

/// Dispatch every event line through `registry`.
///
/// Direct messages are queued per sender so each sender's messages are
/// handled in arrival order; group messages and distinct senders run
/// concurrently.
pub async fn process_events<R>(reader: R, registry: Arc<AgentRegistry>) -> Result<RunSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = RunSummary {
        run_id: Uuid::new_v4(),
        ..RunSummary::default()
    };
    info!(run_id = %summary.run_id, "reading events");
    let mut tasks: JoinSet<usize> = JoinSet::new();
    let mut queues: HashMap<String, mpsc::UnboundedSender<NewMessage>> = HashMap::new();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        if line.trim().is_empty() {
            continue;
        }
        let message: NewMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "skipping malformed event");
                summary.malformed += 1;
                continue;
            }
        };
        summary.received += 1;

        if !message.is_private {
            let registry = Arc::clone(&registry);
            tasks.spawn(async move { usize::from(!handle(&registry, message).await) });
            continue;
        }

        let queue = queues.entry(message.sender_id.clone()).or_insert_with(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            tasks.spawn(sender_worker(Arc::clone(&registry), rx));
            tx
        });
        if let Err(err) = queue.send(message) {
            error!(message_id = %err.0.message_id, "sender worker stopped, message dropped");
            summary.failed += 1;
        }
    }

    // Closing the queues lets the workers drain and finish.
    drop(queues);

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(failures) => summary.failed += failures,
            Err(err) => {
                error!(error = %err, "message task aborted");
                summary.failed += 1;
            }
        }
    }

    summary.senders = registry.len().await;
    info!(
        run_id = %summary.run_id,
        received = summary.received,
        malformed = summary.malformed,
        failed = summary.failed,
        "input exhausted"
    );
    Ok(summary)
}

async fn sender_worker(
    registry: Arc<AgentRegistry>,
    mut queue: mpsc::UnboundedReceiver<NewMessage>,
) -> usize {
    let mut failures = 0;
    while let Some(message) = queue.recv().await {
        if !handle(&registry, message).await {
            failures += 1;
        }
    }
    failures
}

async fn handle(registry: &AgentRegistry, message: NewMessage) -> bool {
    let message_id = message.message_id.clone();
    match registry.dispatch(message).await {
        Ok(()) => true,
        Err(err) => {
            error!(%message_id, error = %err, "message handling failed");
            false
        }
    }
}
