//! Conversation prompt building.
//!
//! The prompt sent to the generation backend is the conversation
//! transcript minus the synthetic greeting and any loading placeholder,
//! truncated to the most recent [`MAX_PROMPT_TOKENS`] whitespace tokens,
//! with a best-effort attachments summary taken from the latest
//! assistant reply.

use crate::types::{ChatMessage, ChatRole};

/// Maximum number of whitespace-delimited tokens kept in a prompt.
/// When the transcript exceeds this, the oldest tokens are dropped so
/// the most recent context survives.
pub const MAX_PROMPT_TOKENS: usize = 1000;

/// Build the generation prompt from the current message list.
pub fn build_prompt(messages: &[ChatMessage]) -> String {
    let context: Vec<&ChatMessage> = messages
        .iter()
        .filter(|msg| !msg.is_greeting() && !msg.is_loading())
        .collect();

    let transcript = context
        .iter()
        .map(|msg| format!("{}: {}", role_label(msg.role()), msg.content()))
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = truncate_to_last_tokens(&transcript, MAX_PROMPT_TOKENS);

    // Attachments from the latest assistant reply help the backend
    // resolve follow-ups like "mach daraus zwei Portionen".
    match context.iter().rev().find(|msg| msg.role() == ChatRole::Assistant) {
        Some(reply) if !reply.attachments().is_empty() => {
            let names = reply
                .attachments()
                .iter()
                .map(|entry| entry.name.as_str())
                .collect::<Vec<_>>()
                .join(",");
            prompt.push_str(&format!("\n\nAttachments: {names}"));
        }
        Some(_) => {}
        None => {
            tracing::debug!("no assistant reply yet, prompt built without attachments line");
        }
    }

    prompt
}

fn role_label(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "User",
        ChatRole::Assistant => "AI",
    }
}

/// Keep only the last `max` whitespace tokens. Shorter input passes
/// through unchanged, including its newlines.
fn truncate_to_last_tokens(text: &str, max: usize) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() > max {
        tokens[tokens.len() - max..].join(" ")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MealEntry;

    fn user(id: &str, content: &str) -> ChatMessage {
        ChatMessage::user(id.to_string(), "chat-1", content.to_string())
    }

    fn assistant(id: &str, content: &str, attachments: Vec<MealEntry>) -> ChatMessage {
        ChatMessage::assistant(id.to_string(), "chat-1", content.to_string(), attachments)
    }

    #[test]
    fn test_greeting_excluded_from_prompt() {
        let messages = vec![
            ChatMessage::greeting("chat-1"),
            user("msg-000001", "Ich hatte einen Apfel"),
        ];

        assert_eq!(build_prompt(&messages), "User: Ich hatte einen Apfel");
    }

    #[test]
    fn test_roles_labelled_and_joined_by_newline() {
        let messages = vec![
            ChatMessage::greeting("chat-1"),
            user("msg-000001", "Ich hatte einen Apfel"),
            assistant("msg-000002", "Notiert!", vec![]),
            user("msg-000003", "Und eine Banane"),
        ];

        assert_eq!(
            build_prompt(&messages),
            "User: Ich hatte einen Apfel\nAI: Notiert!\nUser: Und eine Banane"
        );
    }

    #[test]
    fn test_loading_placeholder_excluded() {
        let messages = vec![
            ChatMessage::greeting("chat-1"),
            user("msg-000001", "Ich hatte einen Apfel"),
            ChatMessage::loading("msg-000002".into(), "chat-1"),
        ];

        assert_eq!(build_prompt(&messages), "User: Ich hatte einen Apfel");
    }

    #[test]
    fn test_truncation_at_exactly_1001_tokens() {
        // "User:" plus 1000 words makes 1001 whitespace tokens.
        let words: Vec<String> = (0..1000).map(|i| format!("w{i}")).collect();
        let messages = vec![user("msg-000001", &words.join(" "))];

        let prompt = build_prompt(&messages);

        let expected = words.join(" ");
        assert_eq!(prompt, expected); // "User:" is the dropped token
        assert_eq!(prompt.split_whitespace().count(), MAX_PROMPT_TOKENS);
    }

    #[test]
    fn test_truncation_at_2000_tokens_keeps_tail() {
        let words: Vec<String> = (0..1999).map(|i| format!("w{i}")).collect();
        let messages = vec![user("msg-000001", &words.join(" "))];

        let prompt = build_prompt(&messages);

        assert_eq!(prompt.split_whitespace().count(), MAX_PROMPT_TOKENS);
        assert!(prompt.starts_with("w999 "));
        assert!(prompt.ends_with("w1998"));
    }

    #[test]
    fn test_short_prompt_not_rejoined() {
        let messages = vec![user("msg-000001", "Apfel"), user("msg-000002", "Banane")];

        // Newlines survive when no truncation happens.
        assert_eq!(build_prompt(&messages), "User: Apfel\nUser: Banane");
    }

    #[test]
    fn test_attachments_line_from_latest_assistant_reply() {
        let messages = vec![
            ChatMessage::greeting("chat-1"),
            user("msg-000001", "Ich hatte einen Apfel und eine Banane"),
            assistant(
                "msg-000002",
                "Notiert!",
                vec![MealEntry::named("A"), MealEntry::named("B")],
            ),
            user("msg-000003", "Danke"),
        ];

        let prompt = build_prompt(&messages);
        assert!(prompt.ends_with("\n\nAttachments: A,B"));
    }

    #[test]
    fn test_no_attachments_line_without_assistant_reply() {
        let messages = vec![
            ChatMessage::greeting("chat-1"),
            user("msg-000001", "Ich hatte einen Apfel"),
        ];

        let prompt = build_prompt(&messages);
        assert!(!prompt.contains("Attachments:"));
    }

    #[test]
    fn test_no_attachments_line_for_empty_attachments() {
        let messages = vec![
            user("msg-000001", "Ich hatte einen Apfel"),
            assistant("msg-000002", "Notiert!", vec![]),
        ];

        let prompt = build_prompt(&messages);
        assert!(!prompt.contains("Attachments:"));
    }
}
