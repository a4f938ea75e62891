//! Domain models shared by the service boundary and the session orchestrator.

mod chat;
mod item;
mod prompt;

pub use chat::{ChatMessage, ChatRole, ChatTurn, history_from};
pub use item::{ActionItems, Category, CorrespondenceItem, ItemId, Partition};
pub use prompt::{Prompt, PromptId};
