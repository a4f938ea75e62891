//! Session state models.

mod chat;
mod compose;
mod prompts;
mod selection;
mod store;

pub use chat::{ChatRejected, ChatTranscript, PendingChat, Resolution};
pub use compose::{ComposeState, ReplyDraft};
pub use prompts::PromptEditor;
pub use selection::{ReadingPane, Selection};
pub use store::{ItemStore, merge_overlay};
