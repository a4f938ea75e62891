//! # effortless-core
//!
//! Core types and service boundary for the Effortless Inbox client.
//!
//! This crate provides:
//! - Domain models (correspondence items, prompts, chat turns)
//! - The [`MailService`] trait describing the remote Mail Service
//! - An HTTP implementation of that trait
//! - An in-memory demo implementation seeded with sample data
//! - Client settings

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod model;
pub mod service;

pub use config::Settings;
pub use error::{Error, Result};
pub use model::{
    ActionItems, Category, ChatMessage, ChatRole, ChatTurn, CorrespondenceItem, ItemId, Partition,
    Prompt, PromptId, history_from,
};
pub use service::{
    DemoMailService, GenerateRequest, HttpMailService, MailService, MailServiceError, NewDraft,
};
