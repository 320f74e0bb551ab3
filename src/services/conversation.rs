//! Free-form conversational completions over a sender's history.

use std::sync::Arc;
use tracing::{debug, instrument};

use super::prompts;
use crate::domain::models::{AgentState, ChatMessage};
use crate::domain::ports::{CompletionClient, CompletionError, CompletionRequest};

pub struct ConversationService {
    client: Arc<dyn CompletionClient>,
    max_history_turns: usize,
}

impl ConversationService {
    pub fn new(client: Arc<dyn CompletionClient>, max_history_turns: usize) -> Self {
        Self {
            client,
            max_history_turns,
        }
    }

    /// Answer a non-report message outside the clarification dialogue.
    ///
    /// History persists between such turns but is bounded to the configured
    /// number of non-system turns.
    #[instrument(skip(self, state, text), fields(sender_id = %state.sender_id), err)]
    pub async fn chat(&self, state: &mut AgentState, text: &str) -> Result<String, CompletionError> {
        if state.history().is_empty() {
            state.push_turn(ChatMessage::system(prompts::CONVERSATION_INSTRUCTION));
        }
        let reply = self.exchange(state, text).await?;
        state.trim_history(self.max_history_turns);
        Ok(reply)
    }

    /// One user/assistant exchange over the whole history.
    ///
    /// Both turns are appended only when the completion succeeds.
    pub async fn exchange(
        &self,
        state: &mut AgentState,
        text: &str,
    ) -> Result<String, CompletionError> {
        let user_turn = ChatMessage::user(text);
        let mut messages = state.history().to_vec();
        messages.push(user_turn.clone());

        let reply = self.client.complete(CompletionRequest::new(messages)).await?;
        debug!(history = state.history().len() + 2, "conversation turn completed");

        state.push_turn(user_turn);
        state.push_turn(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }
}
