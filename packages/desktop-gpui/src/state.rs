//! Application state management
//!
//! Global UI state that outlives individual views. The chat transcript
//! itself lives inside the chat view so that closing the chat resets it.

use gpui::*;

use crate::config::Config;

/// Centralized application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Base URL of the generation backend
    pub backend_url: String,
    /// Whether the chat panel is open
    pub chat_open: bool,
}

impl AppState {
    fn new(config: &Config) -> Self {
        Self {
            backend_url: config.backend_url.clone(),
            chat_open: false,
        }
    }

    /// Open the chat panel
    pub fn open_chat(&mut self) {
        self.chat_open = true;
    }

    /// Close the chat panel
    pub fn close_chat(&mut self) {
        self.chat_open = false;
    }
}

impl Global for AppState {}

/// Initialize the application state
pub fn init(cx: &mut App, config: &Config) {
    cx.set_global(AppState::new(config));
    tracing::debug!("Application state initialized");
}
