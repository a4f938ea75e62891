//! # effortless
//!
//! Session state orchestrator for the Effortless Inbox client.
//!
//! The [`Session`] holds the item store, selection, chat transcript and edit
//! buffers, and reacts to [`Message`]s with [`Task`]s describing Mail
//! Service calls. The [`Runtime`] performs those calls and feeds the results
//! back. The [`cli`] module is a plain-text front end over the same loop.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod message;
pub mod model;
pub mod notification;
pub mod runtime;
pub mod session;
pub mod task;

pub use message::{ComposeMessage, Disposition, Message, PromptsMessage, SaveIntent};
pub use notification::{Confirmation, Notification, Severity};
pub use runtime::{Runtime, perform};
pub use session::Session;
pub use task::{Request, Task};
