//! JSON shapes exchanged with the Mail Service.
//!
//! Decoding is lenient about the shapes older service versions emit:
//! naive timestamps, list-style action items and missing categories.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    ActionItems, Category, ChatMessage, CorrespondenceItem, ItemId, Partition, Prompt,
};

/// An item as returned by the list and create endpoints.
#[derive(Debug, Deserialize)]
pub struct ItemRecord {
    pub id: i64,
    #[serde(alias = "recipient", default)]
    pub sender: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(deserialize_with = "timestamp::deserialize", default = "epoch")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub action_items: Option<WireActionItems>,
    #[serde(default)]
    pub suggested_reply: Option<String>,
}

impl ItemRecord {
    /// Converts to the domain model. The star flag always starts cleared.
    pub fn into_item(self, partition: Partition) -> CorrespondenceItem {
        CorrespondenceItem {
            id: ItemId(self.id),
            partition,
            counterpart: self.sender,
            subject: self.subject,
            body: self.body,
            timestamp: self.timestamp,
            category: self
                .category
                .as_deref()
                .map(Category::parse)
                .unwrap_or_default(),
            suggested_reply: self.suggested_reply.filter(|r| !r.trim().is_empty()),
            action_items: self.action_items.map(Into::into).unwrap_or_default(),
            is_starred: false,
        }
    }
}

const fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Action items in either the structured or the legacy list form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireActionItems {
    Structured {
        #[serde(default)]
        tasks: Vec<String>,
        #[serde(default)]
        suggestions: Vec<String>,
    },
    Legacy(Vec<LegacyAction>),
}

/// One entry of the legacy list form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LegacyAction {
    Text(String),
    Task {
        task: String,
        #[serde(default)]
        deadline: Option<String>,
    },
    Unknown(serde_json::Value),
}

impl From<WireActionItems> for ActionItems {
    fn from(wire: WireActionItems) -> Self {
        match wire {
            WireActionItems::Structured { tasks, suggestions } => Self { tasks, suggestions },
            WireActionItems::Legacy(entries) => Self {
                tasks: entries
                    .into_iter()
                    .filter_map(|entry| match entry {
                        LegacyAction::Text(text) => Some(text),
                        LegacyAction::Task { task, deadline } => Some(match deadline {
                            Some(d) if !d.trim().is_empty() => format!("{task} (due {d})"),
                            _ => task,
                        }),
                        LegacyAction::Unknown(value) => {
                            tracing::debug!("Ignoring unrecognised action item: {value}");
                            None
                        }
                    })
                    .collect(),
                suggestions: Vec::new(),
            },
        }
    }
}

/// Body of a chat request.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub query: &'a str,
    pub history: &'a [ChatMessage],
}

/// Body of a chat response.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Body of a generation response.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub body: String,
}

/// Body of a reply-draft update.
#[derive(Debug, Serialize)]
pub struct ReplyUpdate<'a> {
    pub content: &'a str,
}

/// Body of a prompt update.
#[derive(Debug, Serialize)]
pub struct PromptUpdate<'a> {
    pub prompt_type: &'a str,
    pub content: &'a str,
}

impl<'a> From<&'a Prompt> for PromptUpdate<'a> {
    fn from(prompt: &'a Prompt) -> Self {
        Self {
            prompt_type: &prompt.prompt_type,
            content: &prompt.content,
        }
    }
}

/// Error body of a failed request.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Extracts a human-readable message from a raw error body.
    pub fn message(raw: &str) -> Option<String> {
        let body: Self = serde_json::from_str(raw).ok()?;
        match body.detail {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Serde helpers for service timestamps.
pub mod timestamp {
    use super::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error as _};

    /// Parses RFC 3339, or a naive ISO-8601 timestamp taken as UTC.
    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {s}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_inbox_record_with_structured_actions() {
        let json = r#"{
            "id": 7,
            "sender": "boss@company.com",
            "subject": "Project Deadline Urgent",
            "body": "Finish the Q3 report by Friday.",
            "timestamp": "2025-03-14T09:30:00Z",
            "category": "Urgent",
            "action_items": {"tasks": ["Finish Q3 report"], "suggestions": ["Block Friday morning"]},
            "suggested_reply": "On it."
        }"#;

        let record: ItemRecord = serde_json::from_str(json).unwrap();
        let item = record.into_item(Partition::Inbox);

        assert_eq!(item.id, ItemId(7));
        assert_eq!(item.counterpart, "boss@company.com");
        assert_eq!(item.category, Category::Urgent);
        assert_eq!(item.action_items.tasks, vec!["Finish Q3 report".to_string()]);
        assert_eq!(
            item.action_items.suggestions,
            vec!["Block Friday morning".to_string()]
        );
        assert_eq!(item.suggested_reply.as_deref(), Some("On it."));
        assert!(!item.is_starred);
    }

    #[test]
    fn test_legacy_action_list_becomes_tasks() {
        let json = r#"{
            "id": 1,
            "sender": "hr@company.com",
            "timestamp": "2025-03-14T09:30:00.123456",
            "action_items": [
                {"task": "Confirm review slot", "deadline": "Tuesday"},
                {"task": "Prepare notes", "deadline": null},
                "Bring laptop",
                42
            ]
        }"#;

        let record: ItemRecord = serde_json::from_str(json).unwrap();
        let item = record.into_item(Partition::Inbox);

        assert_eq!(
            item.action_items.tasks,
            vec![
                "Confirm review slot (due Tuesday)".to_string(),
                "Prepare notes".to_string(),
                "Bring laptop".to_string(),
            ]
        );
        assert!(item.action_items.suggestions.is_empty());
        assert_eq!(item.category, Category::Uncategorized);
        assert_eq!(item.timestamp.hour(), 9);
    }

    #[test]
    fn test_draft_record_uses_recipient() {
        let json = r#"{
            "id": 3,
            "recipient": "client@bigcorp.com",
            "subject": "Re: Contract Revision",
            "body": "Looks good.",
            "timestamp": "2025-03-14 10:00:00",
            "action_items": null
        }"#;

        let record: ItemRecord = serde_json::from_str(json).unwrap();
        let item = record.into_item(Partition::Drafts);

        assert_eq!(item.partition, Partition::Drafts);
        assert_eq!(item.counterpart, "client@bigcorp.com");
        assert!(item.action_items.is_empty());
    }

    #[test]
    fn test_blank_suggested_reply_is_none() {
        let json = r#"{"id": 4, "sender": "a@b.c", "timestamp": "2025-01-01T00:00:00Z", "suggested_reply": "  "}"#;
        let record: ItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.into_item(Partition::Inbox).suggested_reply, None);
    }

    #[test]
    fn test_timestamp_parse_variants() {
        let offset = timestamp::parse("2025-06-01T12:00:00+02:00").unwrap();
        assert_eq!(offset.hour(), 10);

        let naive = timestamp::parse("2025-06-01T12:00:00").unwrap();
        assert_eq!(naive.day(), 1);
        assert_eq!(naive.hour(), 12);

        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_error_body_message() {
        assert_eq!(
            ErrorBody::message(r#"{"detail": "Email not found"}"#).as_deref(),
            Some("Email not found")
        );
        assert!(ErrorBody::message("<html>oops</html>").is_none());
        assert!(
            ErrorBody::message(r#"{"detail": [{"msg": "field required"}]}"#)
                .unwrap()
                .contains("field required")
        );
    }

    #[test]
    fn test_chat_request_shape() {
        let history = vec![ChatMessage {
            role: crate::model::ChatRole::User,
            content: "Summarize".into(),
        }];
        let body = ChatRequest {
            query: "Draft a reply",
            history: &history,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["query"], "Draft a reply");
        assert_eq!(json["history"][0]["role"], "user");
    }
}
