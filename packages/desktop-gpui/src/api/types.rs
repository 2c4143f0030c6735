//! Request types for the generation endpoint
//!
//! The response type lives in mahlzeit-core since the session logic
//! consumes it directly.

use serde::Serialize;

/// Request body for the entry generation endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateEntriesRequest {
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateEntriesRequest {
            prompt: "User: Ich hatte einen Apfel".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["prompt"], "User: Ich hatte einen Apfel");
    }
}
