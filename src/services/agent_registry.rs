//! Keyed store of per-sender agent state.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument};

use super::agent::ReportAgent;
use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentState, NewMessage};

/// Owns one `AgentState` per sender and serialises each sender's messages.
///
/// A sender's state stays locked for the whole handling of a message, so a
/// second message from the same sender waits. Different senders proceed
/// concurrently. Entries are never evicted.
pub struct AgentRegistry {
    agent: Arc<ReportAgent>,
    states: RwLock<HashMap<String, Arc<Mutex<AgentState>>>>,
}

impl AgentRegistry {
    pub fn new(agent: Arc<ReportAgent>) -> Self {
        Self {
            agent,
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Route one inbound message.
    ///
    /// Group messages do not touch sender state.
    #[instrument(
        skip(self, message),
        fields(message_id = %message.message_id, private = message.is_private)
    )]
    pub async fn dispatch(&self, message: NewMessage) -> DomainResult<()> {
        if !message.is_private {
            return self.agent.handle_group(message).await;
        }

        let entry = self.state_for(&message.sender_id).await;
        let mut state = entry.lock().await;
        self.agent.handle_private(&mut state, message).await
    }

    /// Number of senders seen so far.
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }

    /// Copy of a sender's state, waiting for any in-flight message.
    pub async fn snapshot(&self, sender_id: &str) -> Option<AgentState> {
        let entry = self.states.read().await.get(sender_id).cloned()?;
        let state = entry.lock().await;
        Some(state.clone())
    }

    async fn state_for(&self, sender_id: &str) -> Arc<Mutex<AgentState>> {
        if let Some(entry) = self.states.read().await.get(sender_id) {
            return Arc::clone(entry);
        }

        let mut states = self.states.write().await;
        Arc::clone(states.entry(sender_id.to_string()).or_insert_with(|| {
            debug!(sender_id, "creating agent state");
            Arc::new(Mutex::new(AgentState::new(sender_id)))
        }))
    }
}
