//! Chat transcript models.

use serde::{Deserialize, Serialize};

/// One question/answer exchange about an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    /// The user's question. Never changes once the turn exists.
    pub question: String,
    /// The assistant's answer; `None` while the request is pending.
    pub answer: Option<String>,
}

impl ChatTurn {
    /// Creates a turn awaiting its answer.
    #[must_use]
    pub fn pending(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: None,
        }
    }

    /// Creates an answered turn.
    #[must_use]
    pub fn answered(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: Some(answer.into()),
        }
    }

    /// Whether the answer is still outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.answer.as_deref().is_none_or(str::is_empty)
    }
}

/// Speaker of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person using the client.
    User,
    /// The Mail Service's assistant.
    Assistant,
}

/// A flattened transcript entry as sent to the conversational endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who said it.
    pub role: ChatRole,
    /// What was said.
    pub content: String,
}

/// Flattens turns into alternating user/assistant entries.
///
/// A pending answer becomes an empty assistant entry.
#[must_use]
pub fn history_from(turns: &[ChatTurn]) -> Vec<ChatMessage> {
    turns
        .iter()
        .flat_map(|turn| {
            [
                ChatMessage {
                    role: ChatRole::User,
                    content: turn.question.clone(),
                },
                ChatMessage {
                    role: ChatRole::Assistant,
                    content: turn.answer.clone().unwrap_or_default(),
                },
            ]
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_history_alternates_roles() {
        let turns = vec![
            ChatTurn::answered("Summarize", "A report is due Friday."),
            ChatTurn::pending("Who sent it?"),
        ];

        let history = history_from(&turns);
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[0].content, "Summarize");
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert_eq!(history[1].content, "A report is due Friday.");
        assert_eq!(history[3].role, ChatRole::Assistant);
        assert_eq!(history[3].content, "");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let message = ChatMessage {
            role: ChatRole::Assistant,
            content: "hi".into(),
        };
        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"role":"assistant","content":"hi"}"#
        );
    }

    #[test]
    fn test_pending_turn() {
        assert!(ChatTurn::pending("q").is_pending());
        assert!(!ChatTurn::answered("q", "a").is_pending());
    }
}
