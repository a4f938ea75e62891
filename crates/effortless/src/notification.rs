//! Typed notifications emitted by the session.
//!
//! The session never prompts or alerts directly. It queues notifications
//! and the front end decides how to present them.

use std::fmt;

use effortless_core::{ItemId, MailServiceError, Partition};

use crate::message::SaveIntent;

/// How serious a notification is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Completion or progress report.
    Info,
    /// Recoverable failure; state was left consistent.
    Error,
    /// The session cannot continue; log in again.
    Fatal,
}

/// An action awaiting the user's explicit confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// Permanently delete an inbox item.
    DeleteItem {
        /// Item to delete.
        id: ItemId,
        /// Its subject, for display.
        subject: String,
    },
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteItem { subject, .. } => {
                write!(f, "Permanently delete \"{subject}\"?")
            }
        }
    }
}

/// Something the user should be told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Login succeeded.
    LoggedIn {
        /// Number of inbox items loaded.
        items: usize,
    },
    /// The service could not be initialised.
    LoginFailed(MailServiceError),
    /// Session state was discarded.
    LoggedOut,
    /// A listing failed; the store is unchanged.
    RefreshFailed {
        /// Partition that failed to load.
        partition: Partition,
        /// Cause.
        error: MailServiceError,
    },
    /// The inbox was reprocessed.
    Reprocessed,
    /// Reprocessing failed.
    ReprocessFailed(MailServiceError),
    /// An action waits for [`Message::Confirm`](crate::Message::Confirm).
    ConfirmationRequired(Confirmation),
    /// An item was deleted.
    Deleted {
        /// Subject of the deleted item.
        subject: String,
    },
    /// Deletion failed.
    DeleteFailed(MailServiceError),
    /// A suggestion was accepted.
    SuggestionAccepted(String),
    /// A suggestion was dismissed.
    SuggestionDismissed(String),
    /// A chat question is already awaiting its answer.
    ChatBusy,
    /// The chat request failed and the question was withdrawn.
    ChatFailed(MailServiceError),
    /// Body generation is already running.
    GenerationBusy,
    /// Body generation failed; the compose buffer is unchanged.
    GenerateFailed(MailServiceError),
    /// A composed item was persisted.
    DraftSaved(SaveIntent),
    /// Persisting a composed item failed.
    DraftSaveFailed(MailServiceError),
    /// The reply draft was stored.
    ReplyDraftSaved,
    /// Storing the reply draft failed.
    ReplyDraftSaveFailed(MailServiceError),
    /// Prompts could not be loaded.
    PromptsLoadFailed(MailServiceError),
    /// Every prompt was saved; reprocessing follows.
    PromptsSaved,
    /// At least one prompt failed to save; applied updates were reverted.
    PromptsSaveFailed(MailServiceError),
    /// The request was refused locally.
    Invalid(String),
}

impl Notification {
    /// Severity of this notification.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::LoginFailed(_) => Severity::Fatal,
            Self::RefreshFailed { .. }
            | Self::ReprocessFailed(_)
            | Self::DeleteFailed(_)
            | Self::ChatBusy
            | Self::ChatFailed(_)
            | Self::GenerationBusy
            | Self::GenerateFailed(_)
            | Self::DraftSaveFailed(_)
            | Self::ReplyDraftSaveFailed(_)
            | Self::PromptsLoadFailed(_)
            | Self::PromptsSaveFailed(_)
            | Self::Invalid(_) => Severity::Error,
            Self::LoggedIn { .. }
            | Self::LoggedOut
            | Self::Reprocessed
            | Self::ConfirmationRequired(_)
            | Self::Deleted { .. }
            | Self::SuggestionAccepted(_)
            | Self::SuggestionDismissed(_)
            | Self::DraftSaved(_)
            | Self::ReplyDraftSaved
            | Self::PromptsSaved => Severity::Info,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggedIn { items } => write!(f, "Logged in, {items} items in inbox"),
            Self::LoginFailed(e) => write!(f, "Could not reach the Mail Service: {e}"),
            Self::LoggedOut => f.write_str("Logged out"),
            Self::RefreshFailed { partition, error } => {
                write!(f, "Could not refresh {}: {error}", partition.display_name())
            }
            Self::Reprocessed => f.write_str("Inbox reprocessed"),
            Self::ReprocessFailed(e) => write!(f, "Reprocessing failed: {e}"),
            Self::ConfirmationRequired(c) => write!(f, "{c} (confirm or cancel)"),
            Self::Deleted { subject } => write!(f, "Deleted \"{subject}\""),
            Self::DeleteFailed(e) => write!(f, "Failed to delete: {e}"),
            Self::SuggestionAccepted(s) => write!(f, "Accepted: {s}"),
            Self::SuggestionDismissed(s) => write!(f, "Dismissed: {s}"),
            Self::ChatBusy => f.write_str("Still waiting for the previous answer"),
            Self::ChatFailed(e) => write!(f, "Chat failed: {e}"),
            Self::GenerationBusy => f.write_str("Body generation already running"),
            Self::GenerateFailed(e) => write!(f, "Generation failed: {e}"),
            Self::DraftSaved(SaveIntent::Save) => f.write_str("Draft saved"),
            Self::DraftSaved(SaveIntent::Send) => f.write_str("Sent"),
            Self::DraftSaveFailed(e) => write!(f, "Failed to save draft: {e}"),
            Self::ReplyDraftSaved => f.write_str("Reply draft saved"),
            Self::ReplyDraftSaveFailed(e) => write!(f, "Failed to save reply: {e}"),
            Self::PromptsLoadFailed(e) => write!(f, "Could not load prompts: {e}"),
            Self::PromptsSaved => f.write_str("Prompts updated, reprocessing inbox"),
            Self::PromptsSaveFailed(e) => write!(f, "Error saving prompts: {e}"),
            Self::Invalid(reason) => f.write_str(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity() {
        let err = MailServiceError::Connection("refused".into());
        assert_eq!(
            Notification::LoginFailed(err.clone()).severity(),
            Severity::Fatal
        );
        assert_eq!(Notification::ChatFailed(err).severity(), Severity::Error);
        assert_eq!(Notification::PromptsSaved.severity(), Severity::Info);
    }

    #[test]
    fn test_display_send_intent() {
        assert_eq!(Notification::DraftSaved(SaveIntent::Send).to_string(), "Sent");
        let confirm = Notification::ConfirmationRequired(Confirmation::DeleteItem {
            id: ItemId(4),
            subject: "YOU WON".into(),
        });
        assert_eq!(
            confirm.to_string(),
            "Permanently delete \"YOU WON\"? (confirm or cancel)"
        );
    }
}
