//! Core data types for the Mahlzeit chat session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel id of the synthetic greeting that opens every session.
///
/// The greeting is never sent to the generation backend and is excluded
/// when conversation context is built.
pub const GREETING_ID: &str = "initial-message";

/// Content of the synthetic greeting.
pub const GREETING_TEXT: &str = "Hallo! Wie kann ich dir helfen?";

/// Content shown inside the transient loading placeholder.
pub const LOADING_TEXT: &str = "Ich bin dabei, deine Anfrage zu bearbeiten...";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Presentation marker on assistant messages. UI-only, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Loading,
    Error,
}

/// A meal entry generated by the backend and attached to an assistant
/// message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    /// Display name of the meal, e.g. "Apple"
    pub name: String,
    /// Estimated calories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_kcal: Option<f64>,
    /// Estimated protein in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    /// Estimated carbohydrates in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    /// Estimated fat in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
}

impl MealEntry {
    /// Create an entry with only a name, no nutrition estimates.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calories_kcal: None,
            protein_g: None,
            carbs_g: None,
            fat_g: None,
        }
    }
}

/// Fields shared by every message variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMeta {
    /// Opaque id, unique within the session
    pub id: String,
    /// Id of the conversation this message belongs to
    pub chat_id: String,
    /// Author role
    pub role: ChatRole,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// A chat message, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatMessage {
    /// Plain text message (user input or the synthetic greeting).
    Text {
        #[serde(flatten)]
        meta: MessageMeta,
        content: String,
    },
    /// Assistant reply carrying generated meal entries and a transient
    /// presentation marker.
    Assistant {
        #[serde(flatten)]
        meta: MessageMeta,
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attachments: Vec<MealEntry>,
        #[serde(rename = "messageType", default)]
        kind: MessageKind,
    },
}

impl ChatMessage {
    /// The synthetic greeting seeded into every new session.
    pub fn greeting(chat_id: &str) -> Self {
        Self::Text {
            meta: MessageMeta {
                id: GREETING_ID.to_string(),
                chat_id: chat_id.to_string(),
                role: ChatRole::Assistant,
                created_at: Utc::now(),
            },
            content: GREETING_TEXT.to_string(),
        }
    }

    /// A user-authored text message.
    pub fn user(id: String, chat_id: &str, content: String) -> Self {
        Self::Text {
            meta: MessageMeta {
                id,
                chat_id: chat_id.to_string(),
                role: ChatRole::User,
                created_at: Utc::now(),
            },
            content,
        }
    }

    /// An assistant reply with generated entries attached.
    pub fn assistant(
        id: String,
        chat_id: &str,
        content: String,
        attachments: Vec<MealEntry>,
    ) -> Self {
        Self::Assistant {
            meta: MessageMeta {
                id,
                chat_id: chat_id.to_string(),
                role: ChatRole::Assistant,
                created_at: Utc::now(),
            },
            content,
            attachments,
            kind: MessageKind::Text,
        }
    }

    /// The transient loading placeholder shown while generation is
    /// pending.
    pub fn loading(id: String, chat_id: &str) -> Self {
        Self::Assistant {
            meta: MessageMeta {
                id,
                chat_id: chat_id.to_string(),
                role: ChatRole::Assistant,
                created_at: Utc::now(),
            },
            content: LOADING_TEXT.to_string(),
            attachments: Vec::new(),
            kind: MessageKind::Loading,
        }
    }

    /// An inline error bubble surfaced when generation fails.
    pub fn error(id: String, chat_id: &str, content: String) -> Self {
        Self::Assistant {
            meta: MessageMeta {
                id,
                chat_id: chat_id.to_string(),
                role: ChatRole::Assistant,
                created_at: Utc::now(),
            },
            content,
            attachments: Vec::new(),
            kind: MessageKind::Error,
        }
    }

    /// Shared metadata of this message.
    pub fn meta(&self) -> &MessageMeta {
        match self {
            Self::Text { meta, .. } | Self::Assistant { meta, .. } => meta,
        }
    }

    pub fn id(&self) -> &str {
        &self.meta().id
    }

    pub fn role(&self) -> ChatRole {
        self.meta().role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.meta().created_at
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Text { content, .. } | Self::Assistant { content, .. } => content,
        }
    }

    /// Attached meal entries; empty for plain text messages.
    pub fn attachments(&self) -> &[MealEntry] {
        match self {
            Self::Text { .. } => &[],
            Self::Assistant { attachments, .. } => attachments,
        }
    }

    /// Presentation marker; plain text messages always report `Text`.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Text { .. } => MessageKind::Text,
            Self::Assistant { kind, .. } => *kind,
        }
    }

    pub fn is_greeting(&self) -> bool {
        self.id() == GREETING_ID
    }

    pub fn is_loading(&self) -> bool {
        self.kind() == MessageKind::Loading
    }
}

/// Response of the generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    /// Conversational answer to show in the chat
    pub answer_text: String,
    /// Meal entries the backend extracted from the conversation
    #[serde(default)]
    pub entries: Vec<MealEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_is_flagged_and_assistant_authored() {
        let greeting = ChatMessage::greeting("chat-1");

        assert!(greeting.is_greeting());
        assert!(!greeting.is_loading());
        assert_eq!(greeting.role(), ChatRole::Assistant);
        assert_eq!(greeting.content(), GREETING_TEXT);
        assert!(greeting.attachments().is_empty());
    }

    #[test]
    fn test_loading_marker() {
        let loading = ChatMessage::loading("msg-000001".into(), "chat-1");

        assert!(loading.is_loading());
        assert_eq!(loading.kind(), MessageKind::Loading);
        assert_eq!(loading.role(), ChatRole::Assistant);
    }

    #[test]
    fn test_backend_response_wire_format() {
        let json = r#"{
            "answerText": "Notiert!",
            "entries": [
                {"name": "Apple", "caloriesKcal": 52.0}
            ]
        }"#;

        let response: GenerationResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.answer_text, "Notiert!");
        assert_eq!(response.entries.len(), 1);
        assert_eq!(response.entries[0].name, "Apple");
        assert_eq!(response.entries[0].calories_kcal, Some(52.0));
        assert_eq!(response.entries[0].protein_g, None);
    }

    #[test]
    fn test_backend_response_entries_default_empty() {
        let response: GenerationResponse =
            serde_json::from_str(r#"{"answerText": "Alles klar."}"#).unwrap();

        assert!(response.entries.is_empty());
    }

    #[test]
    fn test_message_is_tagged_by_type() {
        let message = ChatMessage::assistant(
            "msg-000002".into(),
            "chat-1",
            "Notiert!".into(),
            vec![MealEntry::named("Apple")],
        );

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "assistant");
        assert_eq!(value["messageType"], "text");
        assert_eq!(value["attachments"][0]["name"], "Apple");

        let user = ChatMessage::user("msg-000003".into(), "chat-1", "Hallo".into());
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["role"], "user");
    }
}
