pub mod capabilities;

use std::fmt;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::model::chat::{
    normalize_input, ChatHistoryMessage, ChatMessage, ChatRole, HISTORY_WINDOW, MAX_INPUT_CHARS,
};
use crate::responder::{ChatReply, ChatRequest, Responder, ResponderError};
use capabilities::{CurrentPathProvider, IdGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Closed,
    OpenIdle,
    OpenWaiting,
}

impl fmt::Display for WidgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetState::Closed => f.write_str("closed"),
            WidgetState::OpenIdle => f.write_str("open-idle"),
            WidgetState::OpenWaiting => f.write_str("open-waiting"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("message is empty")]
    Empty,
    #[error("still waiting for the previous answer")]
    Busy,
    #[error("assistant is closed")]
    Closed,
    #[error("assistant has shut down")]
    ShutDown,
}

/// An accepted user turn whose answer hasn't been recorded yet.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub ticket: u64,
    pub request: ChatRequest,
    cancel: CancellationToken,
}

impl PendingTurn {
    /// Ask the responder, giving up silently if the widget shuts down first.
    pub async fn exchange(
        &self,
        responder: &dyn Responder,
    ) -> Option<Result<ChatReply, ResponderError>> {
        tokio::select! {
            _ = self.cancel.cancelled() => None,
            result = responder.respond(&self.request) => Some(result),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(SubmitRejected),
    Answered,
    FellBack,
    Discarded,
}

/// The practice assistant chat: transcript, visibility and the
/// one-request-at-a-time waiting flag.
pub struct AssistantWidget {
    messages: Vec<ChatMessage>,
    open: bool,
    pending: Option<u64>,
    next_ticket: u64,
    input: String,
    ids: Box<dyn IdGenerator>,
    path: Box<dyn CurrentPathProvider>,
    cancel: CancellationToken,
}

impl AssistantWidget {
    pub fn new(mut ids: Box<dyn IdGenerator>, path: Box<dyn CurrentPathProvider>) -> Self {
        let welcome = ChatMessage::welcome(ids.next_id());
        Self {
            messages: vec![welcome],
            open: false,
            pending: None,
            next_ticket: 0,
            input: String::new(),
            ids,
            path,
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> WidgetState {
        match (self.open, self.pending.is_some()) {
            (false, _) => WidgetState::Closed,
            (true, false) => WidgetState::OpenIdle,
            (true, true) => WidgetState::OpenWaiting,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn open(&mut self) {
        if !self.open {
            self.open = true;
            debug!(state = %self.state(), "assistant opened");
        }
    }

    /// Hides the widget. An in-flight request keeps going and its answer
    /// still lands in the transcript.
    pub fn close(&mut self) {
        if self.open {
            self.open = false;
            debug!(waiting = self.is_waiting(), "assistant closed");
        }
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn push_char(&mut self, c: char) -> bool {
        if self.input.chars().count() >= MAX_INPUT_CHARS {
            return false;
        }
        self.input.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Suggested prompts of the most recent assistant message.
    pub fn latest_suggested_prompts(&self) -> &[String] {
        self.latest_assistant()
            .map(|m| m.suggested_prompts.as_slice())
            .unwrap_or(&[])
    }

    pub fn latest_assistant(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == ChatRole::Assistant)
    }

    /// Submit whatever is in the input buffer.
    pub fn begin_submit_input(&mut self) -> Result<PendingTurn, SubmitRejected> {
        let text = self.input.clone();
        self.begin_submit(&text)
    }

    /// Record the user's message and build the request for it. The caller
    /// runs the exchange and hands the result to [`complete`](Self::complete).
    pub fn begin_submit(&mut self, text: &str) -> Result<PendingTurn, SubmitRejected> {
        let Some(message) = normalize_input(text) else {
            return Err(SubmitRejected::Empty);
        };
        if self.cancel.is_cancelled() {
            return Err(SubmitRejected::ShutDown);
        }
        if !self.open {
            return Err(SubmitRejected::Closed);
        }
        if self.pending.is_some() {
            debug!("submit ignored while waiting");
            return Err(SubmitRejected::Busy);
        }

        let history = build_history(&self.messages, &message);
        let user = ChatMessage::user(self.ids.next_id(), message.clone());
        self.messages.push(user);
        self.input.clear();

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending = Some(ticket);

        let request = ChatRequest {
            message,
            pathname: self.path.current_path(),
            history,
        };
        info!(
            ticket,
            pathname = %request.pathname,
            history = request.history.len(),
            "submitting message"
        );
        Ok(PendingTurn {
            ticket,
            request,
            cancel: self.cancel.child_token(),
        })
    }

    /// Record the outcome of an exchange and go back to idle. Returns
    /// `false` if the result was discarded (stale ticket or shut down).
    pub fn complete(&mut self, ticket: u64, result: Result<ChatReply, ResponderError>) -> bool {
        if self.cancel.is_cancelled() || self.pending != Some(ticket) {
            debug!(ticket, "discarding stale reply");
            return false;
        }

        let id = self.ids.next_id();
        let reply = match result {
            Ok(reply) => {
                info!(ticket, source = ?reply.source, "assistant replied");
                ChatMessage::assistant(
                    id,
                    reply.message,
                    reply.source,
                    reply.actions.unwrap_or_default(),
                    reply.suggested_prompts.unwrap_or_default(),
                )
            }
            Err(e) => {
                warn!(ticket, error = %e, "responder failed, using fallback reply");
                ChatMessage::fallback(id)
            }
        };
        self.messages.push(reply);
        self.pending = None;
        true
    }

    /// Begin, exchange and complete in one go.
    pub async fn submit(&mut self, text: &str, responder: &dyn Responder) -> SubmitOutcome {
        let turn = match self.begin_submit(text) {
            Ok(turn) => turn,
            Err(rejected) => return SubmitOutcome::Rejected(rejected),
        };
        let Some(result) = turn.exchange(responder).await else {
            return SubmitOutcome::Discarded;
        };
        let failed = result.is_err();
        if !self.complete(turn.ticket, result) {
            return SubmitOutcome::Discarded;
        }
        if failed {
            SubmitOutcome::FellBack
        } else {
            SubmitOutcome::Answered
        }
    }

    /// Token cancelled when the widget goes away.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn shutdown(&mut self) {
        if !self.cancel.is_cancelled() {
            info!(waiting = self.is_waiting(), "assistant shutting down");
            self.cancel.cancel();
        }
        self.pending = None;
    }
}

impl Drop for AssistantWidget {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// The last [`HISTORY_WINDOW`] non-empty messages before this turn, then the
/// new message itself.
pub fn build_history(prior: &[ChatMessage], current: &str) -> Vec<ChatHistoryMessage> {
    let mut history: Vec<ChatHistoryMessage> = prior
        .iter()
        .rev()
        .filter(|m| !m.content.trim().is_empty())
        .take(HISTORY_WINDOW)
        .map(ChatMessage::to_history)
        .collect();
    history.reverse();
    history.push(ChatHistoryMessage::user(current));
    history
}
