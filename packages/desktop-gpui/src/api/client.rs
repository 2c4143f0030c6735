//! Meal generation HTTP client implementation

use anyhow::{anyhow, Result};
use mahlzeit_core::GenerationResponse;
use reqwest::Client;

use super::types::GenerateEntriesRequest;

/// HTTP client for the meal generation backend
#[derive(Debug, Clone)]
pub struct MealAiClient {
    base_url: String,
    client: Client,
}

impl MealAiClient {
    /// Create a new client with the given base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a conversation prompt into structured meal entries plus an
    /// answer text for the chat.
    pub async fn generate_entries(&self, prompt: &str) -> Result<GenerationResponse> {
        let body = GenerateEntriesRequest {
            prompt: prompt.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/ai/meal-entries", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Request failed: {} {}",
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        Ok(response.json().await?)
    }
}
