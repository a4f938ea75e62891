//! Effects returned by [`Session::update`](crate::Session::update).
//!
//! A [`Task`] describes Mail Service calls; it performs nothing by itself.
//! The [`Runtime`](crate::Runtime) carries the requests out and feeds the
//! completions back as messages.

use effortless_core::{ChatMessage, GenerateRequest, ItemId, NewDraft, Partition, Prompt};

use crate::message::SaveIntent;

/// A single Mail Service call to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Reset the service, then list the inbox.
    Login {
        /// Refresh generation for the inbox listing.
        generation: u64,
    },
    /// List a partition.
    Refresh {
        /// Partition to list.
        partition: Partition,
        /// Generation of this refresh.
        generation: u64,
    },
    /// Re-run inbox classification.
    Reprocess,
    /// Delete an inbox item.
    Delete(ItemId),
    /// Ask a question about an item.
    Chat {
        /// Item asked about.
        item: ItemId,
        /// Ticket identifying the pending turn.
        ticket: u64,
        /// The question.
        query: String,
        /// Turns preceding the question.
        history: Vec<ChatMessage>,
    },
    /// Generate a compose body.
    GenerateBody {
        /// Compose session asking.
        compose: u64,
        /// Generation input.
        request: GenerateRequest,
    },
    /// Create a draft from the compose buffer.
    CreateDraft {
        /// Compose session asking.
        compose: u64,
        /// Save or send.
        intent: SaveIntent,
        /// Draft to create.
        draft: NewDraft,
    },
    /// Store a reply on an inbox item and create the matching draft.
    SaveReplyDraft {
        /// Inbox item replied to.
        item: ItemId,
        /// New reply content.
        content: String,
        /// Reply stored before, restored if the draft cannot be created.
        previous: Option<String>,
        /// Standalone draft to create.
        draft: NewDraft,
    },
    /// Fetch the configuration prompts.
    LoadPrompts,
    /// Update every prompt, rolling back on partial failure.
    SavePrompts {
        /// Prompts as edited.
        edited: Vec<Prompt>,
        /// Prompts as last loaded.
        original: Vec<Prompt>,
    },
}

/// A batch of requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Task {
    requests: Vec<Request>,
}

impl Task {
    /// A task that does nothing.
    pub const fn none() -> Self {
        Self {
            requests: Vec::new(),
        }
    }

    /// A task performing one request.
    pub fn single(request: Request) -> Self {
        Self {
            requests: vec![request],
        }
    }

    /// Combines tasks; their requests may run concurrently.
    pub fn batch(tasks: impl IntoIterator<Item = Self>) -> Self {
        Self {
            requests: tasks.into_iter().flat_map(|t| t.requests).collect(),
        }
    }

    /// Whether there is nothing to perform.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.requests.is_empty()
    }

    /// The requests of this task.
    #[must_use]
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Consumes the task, yielding its requests.
    #[must_use]
    pub fn into_requests(self) -> Vec<Request> {
        self.requests
    }
}

impl From<Request> for Task {
    fn from(request: Request) -> Self {
        Self::single(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_flattens_in_order() {
        let task = Task::batch([
            Task::single(Request::Reprocess),
            Task::none(),
            Task::single(Request::LoadPrompts),
        ]);
        assert_eq!(task.requests(), &[Request::Reprocess, Request::LoadPrompts]);
        assert!(Task::none().is_none());
    }
}
