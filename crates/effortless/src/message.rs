//! Message types for session events.
//!
//! In the Elm architecture, Messages are events that trigger state changes.
//! User intents and Mail Service completions share one enum so completions
//! can be replayed in any order.

use effortless_core::{CorrespondenceItem, ItemId, MailServiceError, Partition, Prompt, PromptId};

/// Session messages (events).
#[derive(Debug, Clone)]
pub enum Message {
    // Session
    /// Reset the Mail Service and load the inbox.
    Login,
    /// Discard all session state.
    Logout,

    // Navigation
    /// Switch the active partition.
    ShowPartition(Partition),
    /// Refresh the active partition.
    Refresh,
    /// Re-run server-side classification over the inbox.
    Reprocess,
    /// Search query changed.
    SearchChanged(String),

    // Selection
    /// Select an item of the active partition.
    Select(ItemId),
    /// Clear the selection.
    ClearSelection,

    // Item operations
    /// Toggle the local star flag of an item in the active partition.
    ToggleStar(ItemId),
    /// Ask to delete the selected inbox item.
    DeleteSelected,
    /// Accept the pending confirmation.
    Confirm,
    /// Drop the pending confirmation.
    Cancel,
    /// Accept or dismiss a suggested action.
    DisposeSuggestion {
        /// Item owning the suggestion, in the active partition.
        item: ItemId,
        /// Exact suggestion text.
        suggestion: String,
        /// What the user decided.
        disposition: Disposition,
    },

    // Chat
    /// Open the chat panel for the selected item.
    OpenChat,
    /// Close the chat panel.
    CloseChat,
    /// Ask a question about the selected item.
    SubmitChat(String),

    // Reply draft
    /// Open the reply draft editor for the selected item.
    OpenDraftEditor,
    /// Close the reply draft editor.
    CloseDraftEditor,
    /// Reply draft text changed.
    ReplyDraftChanged(String),
    /// Persist the reply draft.
    SaveReplyDraft,
    /// Ask the service to draft the reply again.
    Regenerate,

    // Forms
    /// Compose form messages.
    Compose(ComposeMessage),
    /// Prompt configuration messages.
    Prompts(PromptsMessage),

    // Completions
    /// Login finished.
    LoggedIn {
        /// Refresh generation issued for the inbox.
        generation: u64,
        /// Inbox contents.
        result: Result<Vec<CorrespondenceItem>, MailServiceError>,
    },
    /// A partition listing finished.
    Refreshed {
        /// Partition that was listed.
        partition: Partition,
        /// Generation the refresh was issued with.
        generation: u64,
        /// Authoritative items.
        result: Result<Vec<CorrespondenceItem>, MailServiceError>,
    },
    /// Reprocessing finished.
    Reprocessed(Result<(), MailServiceError>),
    /// Deletion finished.
    Deleted {
        /// Item that was deleted.
        item: ItemId,
        /// Outcome.
        result: Result<(), MailServiceError>,
    },
    /// Chat answer arrived.
    ChatAnswered {
        /// Item the question was asked about.
        item: ItemId,
        /// Ticket issued with the question.
        ticket: u64,
        /// Answer text.
        result: Result<String, MailServiceError>,
    },
    /// Body generation finished.
    BodyGenerated {
        /// Compose session that asked.
        compose: u64,
        /// Generated body.
        result: Result<String, MailServiceError>,
    },
    /// Draft creation finished.
    DraftCreated {
        /// Compose session that asked.
        compose: u64,
        /// Save or send.
        intent: SaveIntent,
        /// Stored draft.
        result: Result<CorrespondenceItem, MailServiceError>,
    },
    /// Reply draft persisted.
    ReplyDraftSaved {
        /// Inbox item replied to.
        item: ItemId,
        /// Content that was stored.
        content: String,
        /// The standalone draft created alongside.
        result: Result<CorrespondenceItem, MailServiceError>,
    },
    /// Prompts loaded.
    PromptsLoaded(Result<Vec<Prompt>, MailServiceError>),
    /// Bulk prompt save finished.
    PromptsSaved(Result<(), MailServiceError>),
}

impl Message {
    /// Whether this message reports the outcome of a Mail Service call.
    #[must_use]
    pub const fn is_completion(&self) -> bool {
        matches!(
            self,
            Self::LoggedIn { .. }
                | Self::Refreshed { .. }
                | Self::Reprocessed(_)
                | Self::Deleted { .. }
                | Self::ChatAnswered { .. }
                | Self::BodyGenerated { .. }
                | Self::DraftCreated { .. }
                | Self::ReplyDraftSaved { .. }
                | Self::PromptsLoaded(_)
                | Self::PromptsSaved(_)
        )
    }
}

/// What the user decided about a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The suggestion was taken.
    Accept,
    /// The suggestion was waved away.
    Dismiss,
}

/// Whether a composed item is saved or "sent".
///
/// Both persist a draft; the intent only changes what the user is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveIntent {
    /// Keep as a draft.
    #[default]
    Save,
    /// Send.
    Send,
}

/// Messages for the compose form.
#[derive(Debug, Clone)]
pub enum ComposeMessage {
    /// Start a new compose buffer, discarding any current one.
    Open,
    /// Recipient changed.
    RecipientChanged(String),
    /// Subject changed.
    SubjectChanged(String),
    /// Generation instructions changed.
    InstructionsChanged(String),
    /// Body changed.
    BodyChanged(String),
    /// Ask the service to write the body.
    Generate,
    /// Persist the buffer as a draft.
    Save(SaveIntent),
    /// Throw the buffer away.
    Discard,
}

/// Messages for the prompt configuration screen.
#[derive(Debug, Clone)]
pub enum PromptsMessage {
    /// Fetch the prompts into the edit buffer.
    Load,
    /// A prompt's content changed in the buffer.
    ContentChanged {
        /// Prompt being edited.
        id: PromptId,
        /// New content.
        content: String,
    },
    /// Save every prompt.
    SaveAll,
    /// Drop unsaved edits.
    Revert,
}
