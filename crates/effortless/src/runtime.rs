//! Executes session effects against a Mail Service.

use effortless_core::{MailService, MailServiceError, Partition, Prompt};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::message::Message;
use crate::session::Session;
use crate::task::Request;

/// Performs one request and returns its completion message.
pub async fn perform<S: MailService>(service: &S, request: Request) -> Message {
    match request {
        Request::Login { generation } => {
            let result = match service.reset().await {
                Ok(()) => service.list_items(Partition::Inbox).await,
                Err(e) => Err(e),
            };
            Message::LoggedIn { generation, result }
        }
        Request::Refresh {
            partition,
            generation,
        } => Message::Refreshed {
            partition,
            generation,
            result: service.list_items(partition).await,
        },
        Request::Reprocess => Message::Reprocessed(service.reprocess_inbox().await),
        Request::Delete(item) => Message::Deleted {
            item,
            result: service.delete_item(item).await,
        },
        Request::Chat {
            item,
            ticket,
            query,
            history,
        } => Message::ChatAnswered {
            item,
            ticket,
            result: service.chat(item, &query, &history).await,
        },
        Request::GenerateBody { compose, request } => Message::BodyGenerated {
            compose,
            result: service.generate_body(&request).await,
        },
        Request::CreateDraft {
            compose,
            intent,
            draft,
        } => Message::DraftCreated {
            compose,
            intent,
            result: service.create_draft(&draft).await,
        },
        Request::SaveReplyDraft {
            item,
            content,
            previous,
            draft,
        } => {
            let result = match service.update_reply_draft(item, &content).await {
                Ok(()) => match service.create_draft(&draft).await {
                    Ok(created) => Ok(created),
                    Err(e) => {
                        let restore = previous.unwrap_or_default();
                        if let Err(rollback) = service.update_reply_draft(item, &restore).await {
                            warn!("Could not restore reply on item {item}: {rollback}");
                        }
                        Err(e)
                    }
                },
                Err(e) => Err(e),
            };
            Message::ReplyDraftSaved {
                item,
                content,
                result,
            }
        }
        Request::LoadPrompts => Message::PromptsLoaded(service.list_prompts().await),
        Request::SavePrompts { edited, original } => {
            Message::PromptsSaved(save_prompts(service, &edited, &original).await)
        }
    }
}

/// Updates every prompt concurrently. If any update fails, the ones that
/// succeeded are put back to their original content.
async fn save_prompts<S: MailService>(
    service: &S,
    edited: &[Prompt],
    original: &[Prompt],
) -> Result<(), MailServiceError> {
    let results = join_all(edited.iter().map(|p| service.update_prompt(p))).await;

    let Some(error) = results.iter().find_map(|r| r.as_ref().err()).cloned() else {
        return Ok(());
    };

    let applied = edited
        .iter()
        .zip(&results)
        .filter(|(_, result)| result.is_ok())
        .filter_map(|(prompt, _)| original.iter().find(|o| o.id == prompt.id));
    let reverts = applied.map(|o| async move { (o.id, service.update_prompt(o).await) });
    for (id, result) in join_all(reverts).await {
        if let Err(e) = result {
            warn!("Could not revert prompt {id}: {e}");
        }
    }

    Err(error)
}

/// Drives a [`Session`] against a Mail Service.
#[derive(Debug)]
pub struct Runtime<S> {
    service: S,
}

impl<S: MailService> Runtime<S> {
    /// Creates a runtime over `service`.
    #[must_use]
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    /// The underlying service.
    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Applies `message` and performs the resulting effects, feeding each
    /// completion back into the session until nothing is left to do.
    ///
    /// Requests of one batch run concurrently.
    pub async fn dispatch(&self, session: &mut Session, message: Message) {
        let mut pending = session.update(message).into_requests();
        while !pending.is_empty() {
            debug!("Performing {} requests", pending.len());
            let completions =
                join_all(pending.into_iter().map(|r| perform(&self.service, r))).await;
            pending = completions
                .into_iter()
                .flat_map(|m| session.update(m).into_requests())
                .collect();
        }
    }
}
