//! HTTP client for the meal generation backend
//!
//! Provides async access to the entry generation endpoint.

pub mod client;
pub mod types;

pub use client::*;

use gpui::*;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Global API client state with Tokio runtime for HTTP operations
pub struct ApiState {
    pub client: MealAiClient,
    /// Tokio runtime handle for HTTP operations
    pub runtime: Arc<Runtime>,
}

impl ApiState {
    fn new(base_url: &str) -> Self {
        // Create a dedicated Tokio runtime for HTTP operations
        let runtime = Runtime::new().expect("Failed to create Tokio runtime");

        let client = MealAiClient::new(base_url);

        Self {
            client,
            runtime: Arc::new(runtime),
        }
    }
}

impl Global for ApiState {}

/// Initialize the API client
pub fn init(cx: &mut App, base_url: &str) {
    cx.set_global(ApiState::new(base_url));
    tracing::debug!("API client initialized with Tokio runtime");
}
