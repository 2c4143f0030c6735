//! Mahlzeit Core - Chat session logic for the AI meal log.
//!
//! This crate provides the non-visual half of the Mahlzeit chat screen:
//!
//! - **Message model**: user/assistant chat messages with meal-entry
//!   attachments
//! - **Session state machine**: explicit transitions for submit,
//!   resolution, rejection and the transient loading placeholder
//! - **Prompt building**: conversation context with tail truncation and
//!   an attachments summary
//! - **Session runner**: a tokio event loop that drives the state
//!   machine with real timers and an injected generation backend
//!
//! # Example
//!
//! ```rust,no_run
//! use mahlzeit_core::session::{ChatSession, SessionEvent};
//!
//! let mut session = ChatSession::new("chat-1");
//!
//! // The user reports a meal; the session asks for a generation call.
//! let effects = session.apply(SessionEvent::Submitted("Ich hatte einen Apfel".into()));
//! println!("{} messages, {} effects", session.messages().len(), effects.len());
//! ```

pub mod ids;
pub mod prompt;
pub mod runner;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use ids::IdGenerator;
pub use prompt::{build_prompt, MAX_PROMPT_TOKENS};
pub use runner::{GenerateEntries, SessionRunner, SessionSnapshot};
pub use session::{
    ChatSession, Effect, GenerationToken, SessionEvent, SessionPhase, PLACEHOLDER_DELAY,
    SCROLL_DEBOUNCE,
};
pub use types::{ChatMessage, ChatRole, GenerationResponse, MealEntry, MessageKind, MessageMeta};

/// Error types for mahlzeit-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("message is empty")]
    EmptyMessage,

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("session is closed")]
    SessionClosed,
}

/// Result type for mahlzeit-core operations.
pub type Result<T> = std::result::Result<T, Error>;
