//! Compose buffer and reply draft editor.

use effortless_core::{CorrespondenceItem, GenerateRequest, ItemId, NewDraft};

/// State for the compose form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeState {
    /// Identifies this buffer; completions for another id are ignored.
    pub id: u64,
    /// Recipient address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Instructions for body generation.
    pub instructions: String,
    /// Body text.
    pub body: String,
    /// Whether body generation is running.
    pub is_generating: bool,
    /// Whether the draft is being saved.
    pub is_saving: bool,
}

impl ComposeState {
    /// Creates an empty compose buffer.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Validates the form for saving.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        let recipient = self.recipient.trim();
        if recipient.is_empty() {
            return Some("Please enter a recipient".to_string());
        }
        if !recipient.contains('@') {
            return Some(format!("Invalid email address: {recipient}"));
        }
        None
    }

    /// Builds the generation request.
    ///
    /// # Errors
    ///
    /// Returns a message for the user if no instructions were given.
    pub fn generate_request(&self) -> Result<GenerateRequest, String> {
        let instructions = self.instructions.trim();
        if instructions.is_empty() {
            return Err("Please describe what the email should say".to_string());
        }
        Ok(GenerateRequest {
            recipient: self.recipient.trim().to_string(),
            subject: self.subject.trim().to_string(),
            instructions: instructions.to_string(),
        })
    }

    /// The draft this buffer would create.
    #[must_use]
    pub fn to_draft(&self) -> NewDraft {
        NewDraft {
            recipient: self.recipient.trim().to_string(),
            subject: self.subject.trim().to_string(),
            body: self.body.clone(),
        }
    }
}

/// Editable reply for an inbox item.
///
/// The buffer starts as the item's suggested reply and follows later
/// suggestions until the user types into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyDraft {
    item: ItemId,
    buffer: String,
    seeded_from: Option<String>,
    edited: bool,
    saving: bool,
}

impl ReplyDraft {
    /// Opens an editor seeded from `item`'s suggested reply.
    #[must_use]
    pub fn seed(item: &CorrespondenceItem) -> Self {
        Self {
            item: item.id,
            buffer: item.suggested_reply.clone().unwrap_or_default(),
            seeded_from: item.suggested_reply.clone(),
            edited: false,
            saving: false,
        }
    }

    /// Item being replied to.
    #[must_use]
    pub const fn item(&self) -> ItemId {
        self.item
    }

    /// Current text.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Whether the user changed the text since it was seeded or saved.
    #[must_use]
    pub const fn is_edited(&self) -> bool {
        self.edited
    }

    /// Whether a save is running.
    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    /// Replaces the text with user input.
    pub fn edit(&mut self, text: String) {
        self.buffer = text;
        self.edited = true;
    }

    /// Follows a new suggested reply unless the user has edited the buffer.
    ///
    /// Returns `true` if the buffer changed.
    pub fn reseed(&mut self, item: &CorrespondenceItem) -> bool {
        if self.edited || item.id != self.item || item.suggested_reply == self.seeded_from {
            return false;
        }
        self.seed_with(item.suggested_reply.clone());
        true
    }

    fn seed_with(&mut self, reply: Option<String>) {
        self.buffer = reply.clone().unwrap_or_default();
        self.seeded_from = reply;
        self.edited = false;
    }

    /// Marks a save as started.
    pub const fn start_saving(&mut self) {
        self.saving = true;
    }

    /// Records the outcome of a save of `content`.
    pub fn finish_saving(&mut self, saved: Option<&str>) {
        self.saving = false;
        if let Some(content) = saved
            && content == self.buffer
        {
            self.seed_with(Some(content.to_string()));
        }
    }

    /// The standalone draft created alongside the stored reply.
    #[must_use]
    pub fn to_draft(&self, original: &CorrespondenceItem) -> NewDraft {
        NewDraft {
            recipient: original.counterpart.clone(),
            subject: original.reply_subject(),
            body: self.buffer.clone(),
        }
    }
}
