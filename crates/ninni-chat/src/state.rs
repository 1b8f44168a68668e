use chrono::{DateTime, Utc};
use ninni_models::ChatRequest;

use crate::message::{Message, Sender};
use crate::outcome::ReplyOutcome;
use crate::{DOZED_OFF_FALLBACK, SLEEPY_FALLBACK};

/// Where the conversation currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingReply,
}

/// Side effects the UI applies after a reply settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEffect {
    ScrollToLatest,
    FocusInput,
}

const SETTLE_EFFECTS: [UiEffect; 2] = [UiEffect::ScrollToLatest, UiEffect::FocusInput];

/// Session identifier generated once per page load
pub fn new_session_id(now: DateTime<Utc>) -> String {
    format!("session_{}", now.timestamp_millis())
}

/// Message list plus the idle / awaiting-reply state machine
///
/// Messages are only ever appended; their order is the display order.
#[derive(Debug, Clone)]
pub struct ChatState {
    session_id: String,
    messages: Vec<Message>,
    phase: Phase,
    last_id: u64,
}

impl ChatState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            messages: Vec::new(),
            phase: Phase::Idle,
            last_id: 0,
        }
    }

    /// Start with an assistant greeting already on screen
    pub fn with_greeting(session_id: impl Into<String>, greeting: &str, now: DateTime<Utc>) -> Self {
        let mut state = Self::new(session_id);
        state.push(greeting.to_string(), Sender::Assistant, now, now);
        state
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn latest(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.phase == Phase::AwaitingReply
    }

    /// Whether `input` would be accepted by [`ChatState::submit`]
    pub fn can_submit(&self, input: &str) -> bool {
        self.phase == Phase::Idle && !input.trim().is_empty()
    }

    /// Accept user input and return the request to send
    ///
    /// Returns `None`, leaving the state untouched, for blank input or while a
    /// reply is pending. On `Some` the caller clears its input field.
    pub fn submit(&mut self, input: &str, now: DateTime<Utc>) -> Option<ChatRequest> {
        if !self.can_submit(input) {
            return None;
        }

        self.push(input.to_string(), Sender::User, now, now);
        self.phase = Phase::AwaitingReply;

        Some(ChatRequest::new(input, self.session_id.clone()))
    }

    /// Settle the pending request with its outcome
    ///
    /// Appends exactly one assistant message and returns to idle. Outcomes
    /// arriving while idle are ignored.
    pub fn receive(&mut self, outcome: ReplyOutcome, now: DateTime<Utc>) -> Vec<UiEffect> {
        if self.phase != Phase::AwaitingReply {
            return Vec::new();
        }

        let (text, timestamp) = match outcome {
            ReplyOutcome::Reply(reply) => {
                let timestamp = DateTime::parse_from_rfc3339(&reply.timestamp)
                    .map(|ts| ts.with_timezone(&Utc))
                    .unwrap_or(now);
                (reply.message, timestamp)
            }
            ReplyOutcome::Rejected { error } => {
                (error.unwrap_or_else(|| SLEEPY_FALLBACK.to_string()), now)
            }
            ReplyOutcome::TransportFailed(_) => (DOZED_OFF_FALLBACK.to_string(), now),
        };

        self.push(text, Sender::Assistant, timestamp, now);
        self.phase = Phase::Idle;

        SETTLE_EFFECTS.to_vec()
    }

    fn push(&mut self, text: String, sender: Sender, timestamp: DateTime<Utc>, now: DateTime<Utc>) {
        let id = self.next_id(now);
        self.messages.push(Message {
            id,
            text,
            sender,
            timestamp,
        });
    }

    /// Millisecond clock reading, bumped when two messages share a millisecond
    fn next_id(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id + 1);
        self.last_id = id;
        id
    }
}
