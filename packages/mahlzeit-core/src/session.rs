//! Chat session state machine.
//!
//! The reactive effects of the chat screen are modelled as an explicit
//! state machine: every input arrives as a [`SessionEvent`], every
//! transition is handled in [`ChatSession::apply`], and everything the
//! outside world has to do (start a generation call, arm or cancel a
//! timer) comes back as [`Effect`] values. Drivers, the tokio
//! [`runner`](crate::runner) or a UI event loop, execute the effects
//! and feed results back in as new events, which keeps ordering and
//! cancellation auditable.

use std::time::Duration;

use crate::ids::IdGenerator;
use crate::prompt::build_prompt;
use crate::types::{ChatMessage, GenerationResponse};

/// Delay before the loading placeholder appears. Quick replies never
/// flash a placeholder.
pub const PLACEHOLDER_DELAY: Duration = Duration::from_millis(300);

/// Debounce for the scroll-to-end of the message view. Re-armed on
/// every mutation of the message list.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(100);

/// Inline error shown when a generation call fails.
pub const GENERATION_FAILED_TEXT: &str =
    "Das hat leider nicht geklappt. Bitte versuche es noch einmal.";

/// Identifies one generation call. Responses carrying a token that no
/// longer matches the in-flight call are discarded, so late replies
/// from a superseded call or a previous screen incarnation cannot
/// corrupt the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationToken(u64);

/// Where the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No generation call in flight.
    #[default]
    Idle,
    /// A call is in flight; the placeholder delay has not elapsed.
    AwaitingReply,
    /// A call is in flight and the loading placeholder is visible.
    ShowingPlaceholder,
}

/// Inputs to the state machine.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The user submitted text from the input box.
    Submitted(String),
    /// The generation call finished successfully.
    CallResolved {
        token: GenerationToken,
        response: GenerationResponse,
    },
    /// The generation call failed.
    CallRejected {
        token: GenerationToken,
        reason: String,
    },
    /// The placeholder delay elapsed without the call resolving.
    PlaceholderDelayElapsed,
}

/// Work the driver has to perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Invoke the generation backend with this prompt.
    StartGeneration {
        token: GenerationToken,
        prompt: String,
    },
    /// Arm the placeholder timer ([`PLACEHOLDER_DELAY`]).
    SchedulePlaceholder,
    /// Disarm the placeholder timer; the call resolved first.
    CancelPlaceholder,
    /// Re-arm the debounced scroll-to-end ([`SCROLL_DEBOUNCE`]),
    /// cancelling any pending one.
    ScheduleScroll,
}

/// One chat conversation, scoped to a single screen incarnation.
///
/// Created when the screen mounts, dropped when it unmounts; nothing is
/// persisted.
#[derive(Debug)]
pub struct ChatSession {
    chat_id: String,
    messages: Vec<ChatMessage>,
    phase: SessionPhase,
    ids: IdGenerator,
    next_token: u64,
    inflight: Option<GenerationToken>,
}

impl ChatSession {
    /// Create a fresh session seeded with the synthetic greeting.
    pub fn new(chat_id: &str) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            messages: vec![ChatMessage::greeting(chat_id)],
            phase: SessionPhase::Idle,
            ids: IdGenerator::new(),
            next_token: 0,
            inflight: None,
        }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Current messages in append order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether a generation call is in flight.
    pub fn is_generating(&self) -> bool {
        self.phase != SessionPhase::Idle
    }

    /// Apply one event and return the effects the driver must execute.
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::Submitted(text) => self.on_submitted(text),
            SessionEvent::CallResolved { token, response } => self.on_resolved(token, response),
            SessionEvent::CallRejected { token, reason } => self.on_rejected(token, reason),
            SessionEvent::PlaceholderDelayElapsed => self.on_placeholder_elapsed(),
        }
    }

    fn on_submitted(&mut self, text: String) -> Vec<Effect> {
        let text = text.trim();
        if text.is_empty() {
            // The input box is supposed to reject this upstream.
            tracing::debug!("ignoring empty submission");
            return Vec::new();
        }

        let id = self.ids.next_id();
        self.messages
            .push(ChatMessage::user(id, &self.chat_id, text.to_string()));

        if self.is_generating() {
            // Gate: one generation call at a time. The message stays in
            // the transcript and rides along with the next call.
            tracing::debug!("submission queued, generation already pending");
            return vec![Effect::ScheduleScroll];
        }

        let prompt = build_prompt(&self.messages);
        let token = self.allocate_token();
        self.inflight = Some(token);
        self.phase = SessionPhase::AwaitingReply;
        tracing::debug!(token = token.0, "starting generation");

        vec![
            Effect::StartGeneration { token, prompt },
            Effect::SchedulePlaceholder,
            Effect::ScheduleScroll,
        ]
    }

    fn on_resolved(&mut self, token: GenerationToken, response: GenerationResponse) -> Vec<Effect> {
        if self.inflight != Some(token) {
            tracing::warn!(token = token.0, "discarding stale generation response");
            return Vec::new();
        }

        self.remove_placeholder();
        let id = self.ids.next_id();
        self.messages.push(ChatMessage::assistant(
            id,
            &self.chat_id,
            response.answer_text,
            response.entries,
        ));
        self.finish_call();

        vec![Effect::CancelPlaceholder, Effect::ScheduleScroll]
    }

    fn on_rejected(&mut self, token: GenerationToken, reason: String) -> Vec<Effect> {
        if self.inflight != Some(token) {
            tracing::warn!(token = token.0, "discarding stale generation failure");
            return Vec::new();
        }

        tracing::warn!(%reason, "generation call failed");
        self.remove_placeholder();
        let id = self.ids.next_id();
        self.messages.push(ChatMessage::error(
            id,
            &self.chat_id,
            GENERATION_FAILED_TEXT.to_string(),
        ));
        self.finish_call();

        vec![Effect::CancelPlaceholder, Effect::ScheduleScroll]
    }

    fn on_placeholder_elapsed(&mut self) -> Vec<Effect> {
        if self.phase != SessionPhase::AwaitingReply {
            // The call resolved (or never started) before the delay
            // elapsed; nothing to show.
            return Vec::new();
        }

        debug_assert!(!self.has_placeholder());
        let id = self.ids.next_id();
        self.messages.push(ChatMessage::loading(id, &self.chat_id));
        self.phase = SessionPhase::ShowingPlaceholder;

        vec![Effect::ScheduleScroll]
    }

    fn allocate_token(&mut self) -> GenerationToken {
        self.next_token += 1;
        GenerationToken(self.next_token)
    }

    fn finish_call(&mut self) {
        self.inflight = None;
        self.phase = SessionPhase::Idle;
    }

    fn remove_placeholder(&mut self) {
        self.messages.retain(|msg| !msg.is_loading());
    }

    fn has_placeholder(&self) -> bool {
        self.messages.iter().any(|msg| msg.is_loading())
    }
}
