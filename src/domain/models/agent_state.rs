//! Per-sender conversational state.

use super::chat::ChatMessage;
use super::message::NewMessage;

/// Dialogue phase of a sender.
///
/// The pending message lives inside [`Phase::FollowUp`], so a follow-up
/// without a pending message (or the reverse) cannot be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    /// No clarification in progress
    #[default]
    Idle,
    /// Waiting for the sender to repair an incomplete extraction
    FollowUp {
        /// Message that triggered the clarification
        pending: Box<NewMessage>,
        /// Template columns in force when the dialogue began
        columns: Vec<String>,
    },
}

/// State owned by one sender, created lazily on their first message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    pub sender_id: String,
    phase: Phase,
    history: Vec<ChatMessage>,
}

impl AgentState {
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            phase: Phase::Idle,
            history: Vec::new(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_follow_up(&self) -> bool {
        matches!(self.phase, Phase::FollowUp { .. })
    }

    pub fn pending_message(&self) -> Option<&NewMessage> {
        match &self.phase {
            Phase::FollowUp { pending, .. } => Some(&**pending),
            Phase::Idle => None,
        }
    }

    /// Columns the resolved rows will be bound to.
    pub fn pending_columns(&self) -> Option<&[String]> {
        match &self.phase {
            Phase::FollowUp { columns, .. } => Some(columns),
            Phase::Idle => None,
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Enters the clarification dialogue with a freshly seeded history.
    pub fn begin_follow_up(
        &mut self,
        pending: NewMessage,
        columns: Vec<String>,
        seed: Vec<ChatMessage>,
    ) {
        self.phase = Phase::FollowUp {
            pending: Box::new(pending),
            columns,
        };
        self.history = seed;
    }

    /// Leaves the dialogue, returning the message it was about and its
    /// template columns.
    pub fn resolve(&mut self) -> Option<(NewMessage, Vec<String>)> {
        self.history.clear();
        match std::mem::take(&mut self.phase) {
            Phase::FollowUp { pending, columns } => Some((*pending, columns)),
            Phase::Idle => None,
        }
    }

    pub fn push_turn(&mut self, turn: ChatMessage) {
        self.history.push(turn);
    }

    /// Keeps system turns and at most `max_turns` of the latest other turns.
    pub fn trim_history(&mut self, max_turns: usize) {
        let conversational = self.history.iter().filter(|t| !t.is_system()).count();
        let mut excess = conversational.saturating_sub(max_turns);
        if excess == 0 {
            return;
        }
        self.history.retain(|turn| {
            if excess > 0 && !turn.is_system() {
                excess -= 1;
                false
            } else {
                true
            }
        });
    }
}
