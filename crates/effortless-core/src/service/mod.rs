//! The Mail Service boundary.
//!
//! The Mail Service owns storage, classification and AI generation. The
//! client only sees the operations of [`MailService`]; how they are carried
//! out is up to the implementation.

mod demo;
mod http;
mod wire;

pub use demo::DemoMailService;
pub use http::HttpMailService;

use std::future::Future;

use crate::model::{ChatMessage, CorrespondenceItem, ItemId, Partition, Prompt};

/// Errors that can occur during Mail Service operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailServiceError {
    /// The service could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The service answered with a non-success status.
    #[error("Service returned {status}: {message}")]
    Status {
        /// HTTP-like status code.
        status: u16,
        /// Detail text from the service.
        message: String,
    },

    /// The referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The response could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The request was refused before reaching the service.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Input for AI body generation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GenerateRequest {
    /// Intended recipient.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// What the body should say.
    pub instructions: String,
}

/// A draft to be created by the service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NewDraft {
    /// Recipient address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
}

/// Operations offered by the remote Mail Service.
///
/// Implementations are shared by reference across concurrent requests.
pub trait MailService: Send + Sync {
    /// Wipes and reseeds the service's data. Called at login.
    fn reset(&self) -> impl Future<Output = Result<(), MailServiceError>> + Send;

    /// Lists the authoritative items of a partition.
    fn list_items(
        &self,
        partition: Partition,
    ) -> impl Future<Output = Result<Vec<CorrespondenceItem>, MailServiceError>> + Send;

    /// Re-runs classification and reply drafting over the inbox.
    fn reprocess_inbox(&self) -> impl Future<Output = Result<(), MailServiceError>> + Send;

    /// Deletes an inbox item.
    fn delete_item(&self, id: ItemId) -> impl Future<Output = Result<(), MailServiceError>> + Send;

    /// Asks a question about an item, given the prior conversation.
    fn chat(
        &self,
        id: ItemId,
        query: &str,
        history: &[ChatMessage],
    ) -> impl Future<Output = Result<String, MailServiceError>> + Send;

    /// Generates body text for a new outbound item.
    fn generate_body(
        &self,
        request: &GenerateRequest,
    ) -> impl Future<Output = Result<String, MailServiceError>> + Send;

    /// Persists a new draft and returns it as stored.
    fn create_draft(
        &self,
        draft: &NewDraft,
    ) -> impl Future<Output = Result<CorrespondenceItem, MailServiceError>> + Send;

    /// Replaces the suggested reply stored on an inbox item.
    fn update_reply_draft(
        &self,
        id: ItemId,
        content: &str,
    ) -> impl Future<Output = Result<(), MailServiceError>> + Send;

    /// Lists the configuration prompts.
    fn list_prompts(&self) -> impl Future<Output = Result<Vec<Prompt>, MailServiceError>> + Send;

    /// Stores new content for a configuration prompt.
    fn update_prompt(
        &self,
        prompt: &Prompt,
    ) -> impl Future<Output = Result<(), MailServiceError>> + Send;
}
