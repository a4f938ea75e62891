//! Correspondence item models.

use chrono::{DateTime, Utc};

/// Unique identifier for a correspondence item.
///
/// Stable across refreshes; assigned by the Mail Service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub i64);

impl ItemId {
    /// Create a new item ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The subset of items a view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Partition {
    /// Received items.
    #[default]
    Inbox,
    /// Outbound items saved but not sent.
    Drafts,
}

impl Partition {
    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Inbox => "Inbox",
            Self::Drafts => "Drafts",
        }
    }
}

/// Classification label assigned to inbox items by the Mail Service.
///
/// The set is open: labels the client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Category {
    /// Work-related mail.
    Work,
    /// Personal mail.
    Personal,
    /// Unsolicited mail.
    Spam,
    /// Newsletters and subscriptions.
    Newsletter,
    /// Mail needing immediate attention.
    Urgent,
    /// Not classified yet.
    #[default]
    Uncategorized,
    /// Any other label returned by the service.
    Other(String),
}

impl Category {
    /// Parse a category label, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "work" => Self::Work,
            "personal" => Self::Personal,
            "spam" => Self::Spam,
            "newsletter" => Self::Newsletter,
            "urgent" => Self::Urgent,
            "" | "uncategorized" => Self::Uncategorized,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Label as shown to the user and sent over the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Spam => "Spam",
            Self::Newsletter => "Newsletter",
            Self::Urgent => "Urgent",
            Self::Uncategorized => "Uncategorized",
            Self::Other(label) => label,
        }
    }

    /// Whether replying to items of this category makes sense.
    ///
    /// Spam and newsletters never get a reply draft.
    #[must_use]
    pub const fn accepts_reply(&self) -> bool {
        !matches!(self, Self::Spam | Self::Newsletter)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Tasks and suggestions extracted from an item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionItems {
    /// Tasks, display only.
    pub tasks: Vec<String>,
    /// Suggested actions the user can accept or dismiss.
    pub suggestions: Vec<String>,
}

impl ActionItems {
    /// Removes the first suggestion exactly equal to `suggestion`.
    ///
    /// Returns `false` if no such suggestion exists.
    pub fn remove_suggestion(&mut self, suggestion: &str) -> bool {
        if let Some(pos) = self.suggestions.iter().position(|s| s == suggestion) {
            self.suggestions.remove(pos);
            true
        } else {
            false
        }
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.suggestions.is_empty()
    }
}

/// A single inbox or draft message record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrespondenceItem {
    /// Unique identifier.
    pub id: ItemId,
    /// Partition the item belongs to.
    pub partition: Partition,
    /// Sender for inbox items, recipient for drafts.
    pub counterpart: String,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// When the item was received or created.
    pub timestamp: DateTime<Utc>,
    /// Classification label (inbox only).
    pub category: Category,
    /// Reply drafted by the service (inbox only).
    pub suggested_reply: Option<String>,
    /// Extracted tasks and suggestions.
    pub action_items: ActionItems,
    /// Star flag. Client-only: never sent to or received from the service.
    pub is_starred: bool,
}

impl CorrespondenceItem {
    /// Subject to use for a reply to this item.
    #[must_use]
    pub fn reply_subject(&self) -> String {
        if self.subject.to_lowercase().starts_with("re:") {
            self.subject.clone()
        } else {
            format!("Re: {}", self.subject)
        }
    }

    /// Case-insensitive match of `query` against subject and counterpart.
    ///
    /// An empty query matches everything.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.subject.to_lowercase().contains(&query)
            || self.counterpart.to_lowercase().contains(&query)
    }

    /// Whether a reply draft can be opened for this item.
    #[must_use]
    pub const fn accepts_reply(&self) -> bool {
        matches!(self.partition, Partition::Inbox) && self.category.accepts_reply()
    }
}
