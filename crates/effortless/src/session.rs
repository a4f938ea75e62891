//! The session state orchestrator.
//!
//! [`Session::update`] is the single entry point: it applies a [`Message`]
//! to the session state and returns the [`Task`] of Mail Service calls to
//! perform next. It never performs I/O.

use std::collections::VecDeque;

use effortless_core::{CorrespondenceItem, ItemId, MailServiceError, Partition};
use tracing::{debug, info, warn};

use crate::message::{ComposeMessage, Disposition, Message, PromptsMessage, SaveIntent};
use crate::model::{
    ChatRejected, ChatTranscript, ComposeState, ItemStore, PromptEditor, ReadingPane, ReplyDraft,
    Resolution, Selection,
};
use crate::notification::{Confirmation, Notification, Severity};
use crate::task::{Request, Task};

/// Client-side state of one logged-in session.
#[derive(Debug, Default)]
pub struct Session {
    logged_in: bool,
    logging_in: bool,
    store: ItemStore,
    selection: Selection,
    search: String,
    chat: ChatTranscript,
    reply: Option<ReplyDraft>,
    compose: Option<ComposeState>,
    /// Last compose buffer id handed out; survives logout.
    last_compose: u64,
    prompts: PromptEditor,
    confirmation: Option<Confirmation>,
    notifications: VecDeque<Notification>,
}

impl Session {
    /// Creates a logged-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether login has succeeded.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// The item store.
    #[must_use]
    pub const fn store(&self) -> &ItemStore {
        &self.store
    }

    /// Active partition, selection and reading pane.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selected item, if it is in the active partition.
    #[must_use]
    pub fn selected_item(&self) -> Option<&CorrespondenceItem> {
        self.selection.selected_item(&self.store)
    }

    /// Items of the active partition matching the search query.
    #[must_use]
    pub fn visible_items(&self) -> Vec<&CorrespondenceItem> {
        self.store
            .items(self.selection.partition())
            .iter()
            .filter(|item| item.matches(&self.search))
            .collect()
    }

    /// Current search query.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Chat transcript of the selected item.
    #[must_use]
    pub const fn chat(&self) -> &ChatTranscript {
        &self.chat
    }

    /// Reply draft editor, when open.
    #[must_use]
    pub const fn reply_draft(&self) -> Option<&ReplyDraft> {
        self.reply.as_ref()
    }

    /// Compose buffer, when open.
    #[must_use]
    pub const fn compose(&self) -> Option<&ComposeState> {
        self.compose.as_ref()
    }

    /// Prompt configuration buffer.
    #[must_use]
    pub const fn prompts(&self) -> &PromptEditor {
        &self.prompts
    }

    /// Action awaiting confirmation.
    #[must_use]
    pub const fn pending_confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    /// Takes every queued notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn notify(&mut self, notification: Notification) {
        if notification.severity() > Severity::Info {
            warn!("{notification}");
        }
        self.notifications.push_back(notification);
    }

    /// Applies a message and returns the effects to perform.
    #[allow(clippy::too_many_lines)] // Large match is idiomatic for Elm architecture
    pub fn update(&mut self, message: Message) -> Task {
        if !self.logged_in
            && !matches!(
                message,
                Message::Login | Message::Logout | Message::LoggedIn { .. }
            )
        {
            if message.is_completion() {
                debug!("Discarding completion after logout: {message:?}");
            } else {
                debug!("Ignoring message while logged out: {message:?}");
            }
            return Task::none();
        }

        match message {
            Message::Login => return self.login(),
            Message::Logout => self.logout(),

            Message::ShowPartition(partition) => {
                if self.selection.show_partition(partition) {
                    self.close_item_panels();
                }
                return self.refresh(partition);
            }
            Message::Refresh => return self.refresh(self.selection.partition()),
            Message::Reprocess | Message::Regenerate => return Task::single(Request::Reprocess),
            Message::SearchChanged(query) => self.search = query,

            Message::Select(id) => self.select(id),
            Message::ClearSelection => {
                self.selection.clear();
                self.close_item_panels();
            }

            Message::ToggleStar(id) => {
                let partition = self.selection.partition();
                if self.store.toggle_star(partition, id).is_none() {
                    debug!("Star toggle for unknown item {id}");
                }
            }
            Message::DeleteSelected => self.request_delete(),
            Message::Confirm => return self.confirm(),
            Message::Cancel => self.confirmation = None,
            Message::DisposeSuggestion {
                item,
                suggestion,
                disposition,
            } => {
                let partition = self.selection.partition();
                if self.store.dispose_suggestion(partition, item, &suggestion) {
                    self.notify(match disposition {
                        Disposition::Accept => Notification::SuggestionAccepted(suggestion),
                        Disposition::Dismiss => Notification::SuggestionDismissed(suggestion),
                    });
                }
            }

            Message::OpenChat => {
                self.selection.open_chat();
            }
            Message::CloseChat => self.selection.close_panel(ReadingPane::ChatOpen),
            Message::SubmitChat(question) => return self.submit_chat(&question),

            Message::OpenDraftEditor => self.open_draft_editor(),
            Message::CloseDraftEditor => {
                self.reply = None;
                self.selection.close_panel(ReadingPane::DraftOpen);
            }
            Message::ReplyDraftChanged(text) => {
                if let Some(reply) = &mut self.reply {
                    reply.edit(text);
                }
            }
            Message::SaveReplyDraft => return self.save_reply_draft(),

            Message::Compose(msg) => return self.update_compose(msg),
            Message::Prompts(msg) => return self.update_prompts(msg),

            Message::LoggedIn { generation, result } => {
                if !self.logging_in || self.store.is_stale(Partition::Inbox, generation) {
                    debug!("Discarding outdated login completion");
                    return Task::none();
                }
                self.logging_in = false;
                match result {
                    Ok(items) => {
                        self.logged_in = true;
                        self.store.apply_refresh(Partition::Inbox, generation, items);
                        let count = self.store.items(Partition::Inbox).len();
                        info!("Logged in with {count} inbox items");
                        self.notify(Notification::LoggedIn { items: count });
                        return self.refresh(Partition::Drafts);
                    }
                    Err(e) => self.notify(Notification::LoginFailed(e)),
                }
            }
            Message::Refreshed {
                partition,
                generation,
                result,
            } => match result {
                Ok(items) => {
                    if self.store.apply_refresh(partition, generation, items) {
                        self.after_refresh();
                    } else {
                        debug!(
                            "Discarding stale {} refresh (generation {generation})",
                            partition.display_name()
                        );
                    }
                }
                Err(error) => {
                    if self.store.is_stale(partition, generation) {
                        debug!("Ignoring failure of stale refresh: {error}");
                    } else {
                        self.notify(Notification::RefreshFailed { partition, error });
                    }
                }
            },
            Message::Reprocessed(result) => match result {
                Ok(()) => {
                    self.notify(Notification::Reprocessed);
                    return self.refresh(Partition::Inbox);
                }
                Err(e) => self.notify(Notification::ReprocessFailed(e)),
            },
            Message::Deleted { item, result } => match result {
                Ok(()) => {
                    let removed = self.store.remove(Partition::Inbox, item);
                    if self.selection.selected() == Some(item) {
                        self.selection.clear();
                        self.close_item_panels();
                    }
                    let subject = removed.map(|i| i.subject).unwrap_or_default();
                    self.notify(Notification::Deleted { subject });
                }
                Err(e) => self.notify(Notification::DeleteFailed(e)),
            },
            Message::ChatAnswered {
                item,
                ticket,
                result,
            } => match self.chat.resolve(item, ticket, result) {
                Resolution::Answered => {}
                Resolution::RolledBack(e) => self.notify(Notification::ChatFailed(e)),
                Resolution::Stale => debug!("Discarding chat answer for item {item}"),
            },
            Message::BodyGenerated { compose, result } => self.body_generated(compose, result),
            Message::DraftCreated {
                compose,
                intent,
                result,
            } => return self.draft_created(compose, intent, result),
            Message::ReplyDraftSaved {
                item,
                content,
                result,
            } => return self.reply_draft_saved(item, &content, result),
            Message::PromptsLoaded(result) => match result {
                Ok(prompts) => self.prompts.load(prompts),
                Err(e) => {
                    self.prompts.load_failed();
                    self.notify(Notification::PromptsLoadFailed(e));
                }
            },
            Message::PromptsSaved(result) => {
                self.prompts.finish_save(result.is_ok());
                match result {
                    Ok(()) => {
                        self.notify(Notification::PromptsSaved);
                        return Task::single(Request::Reprocess);
                    }
                    Err(e) => self.notify(Notification::PromptsSaveFailed(e)),
                }
            }
        }

        Task::none()
    }

    fn login(&mut self) -> Task {
        if self.logging_in {
            return Task::none();
        }
        self.reset();
        self.logging_in = true;
        let generation = self.store.begin_refresh();
        info!("Logging in");
        Task::single(Request::Login { generation })
    }

    fn logout(&mut self) {
        self.reset();
        info!("Logged out");
        self.notify(Notification::LoggedOut);
    }

    /// Discards all session state. Outstanding completions become stale.
    fn reset(&mut self) {
        self.logged_in = false;
        self.logging_in = false;
        self.store.clear();
        self.selection = Selection::new();
        self.search.clear();
        self.chat.reset(None);
        self.reply = None;
        self.compose = None;
        self.prompts = PromptEditor::new();
        self.confirmation = None;
    }

    fn refresh(&mut self, partition: Partition) -> Task {
        let generation = self.store.begin_refresh();
        Task::single(Request::Refresh {
            partition,
            generation,
        })
    }

    /// Re-validates item-scoped state after the store changed.
    fn after_refresh(&mut self) {
        if self.selection.retain_valid(&self.store) {
            debug!("Selected item disappeared, clearing selection");
            self.close_item_panels();
            return;
        }
        if let Some(reply) = &mut self.reply
            && let Some(item) = self.selection.selected_item(&self.store)
            && reply.reseed(item)
        {
            debug!("Reply draft for item {} reseeded", item.id);
        }
    }

    /// Clears the transcript and reply editor after the selection changed.
    fn close_item_panels(&mut self) {
        self.chat.reset(self.selection.selected());
        self.reply = None;
        self.confirmation = None;
    }

    fn select(&mut self, id: ItemId) {
        if self.selection.select(id, &self.store) {
            self.close_item_panels();
        } else {
            debug!(
                "Item {id} is not in {}",
                self.selection.partition().display_name()
            );
        }
    }

    fn request_delete(&mut self) {
        if self.selection.partition() != Partition::Inbox {
            self.notify(Notification::Invalid(
                "Only inbox items can be deleted".to_string(),
            ));
            return;
        }
        let Some(item) = self.selected_item() else {
            return;
        };
        let confirmation = Confirmation::DeleteItem {
            id: item.id,
            subject: item.subject.clone(),
        };
        self.confirmation = Some(confirmation.clone());
        self.notify(Notification::ConfirmationRequired(confirmation));
    }

    fn confirm(&mut self) -> Task {
        match self.confirmation.take() {
            Some(Confirmation::DeleteItem { id, .. }) => Task::single(Request::Delete(id)),
            None => Task::none(),
        }
    }

    fn submit_chat(&mut self, question: &str) -> Task {
        match self.chat.submit(question) {
            Ok(pending) => {
                self.selection.open_chat();
                Task::single(Request::Chat {
                    item: pending.item,
                    ticket: pending.ticket,
                    query: pending.query,
                    history: pending.history,
                })
            }
            Err(ChatRejected::Busy) => {
                self.notify(Notification::ChatBusy);
                Task::none()
            }
            Err(reason) => {
                debug!("Chat submission ignored: {reason}");
                Task::none()
            }
        }
    }

    fn open_draft_editor(&mut self) {
        let Some(item) = self.selection.selected_item(&self.store) else {
            return;
        };
        if !item.accepts_reply() {
            let reason = format!("No reply needed for {} items", item.category);
            self.notify(Notification::Invalid(reason));
            return;
        }
        if self.reply.as_ref().is_none_or(|r| r.item() != item.id) {
            self.reply = Some(ReplyDraft::seed(item));
        }
        self.selection.open_draft();
    }

    fn save_reply_draft(&mut self) -> Task {
        let Some(item) = self.selection.selected_item(&self.store) else {
            return Task::none();
        };
        let Some(reply) = self.reply.as_mut().filter(|r| r.item() == item.id) else {
            return Task::none();
        };
        if reply.is_saving() {
            return Task::none();
        }
        if reply.buffer().trim().is_empty() {
            self.notify(Notification::Invalid("The reply is empty".to_string()));
            return Task::none();
        }

        reply.start_saving();
        Task::single(Request::SaveReplyDraft {
            item: item.id,
            content: reply.buffer().to_string(),
            previous: item.suggested_reply.clone(),
            draft: reply.to_draft(item),
        })
    }

    fn reply_draft_saved(
        &mut self,
        item: ItemId,
        content: &str,
        result: Result<CorrespondenceItem, MailServiceError>,
    ) -> Task {
        let succeeded = result.is_ok();
        if let Some(reply) = self.reply.as_mut().filter(|r| r.item() == item) {
            reply.finish_saving(succeeded.then_some(content));
        }

        match result {
            Ok(draft) => {
                self.store.update(Partition::Inbox, item, |stored| {
                    stored.suggested_reply = Some(content.to_string());
                });
                info!("Reply for item {item} saved as draft {}", draft.id);
                self.notify(Notification::ReplyDraftSaved);
                self.refresh(Partition::Drafts)
            }
            Err(e) => {
                self.notify(Notification::ReplyDraftSaveFailed(e));
                Task::none()
            }
        }
    }

    fn update_compose(&mut self, message: ComposeMessage) -> Task {
        match message {
            ComposeMessage::Open => {
                self.last_compose += 1;
                self.compose = Some(ComposeState::new(self.last_compose));
                return Task::none();
            }
            ComposeMessage::Discard => {
                self.compose = None;
                return Task::none();
            }
            _ => {}
        }

        let Some(compose) = &mut self.compose else {
            return Task::none();
        };
        match message {
            ComposeMessage::RecipientChanged(v) => compose.recipient = v,
            ComposeMessage::SubjectChanged(v) => compose.subject = v,
            ComposeMessage::InstructionsChanged(v) => compose.instructions = v,
            ComposeMessage::BodyChanged(v) => compose.body = v,
            ComposeMessage::Generate => {
                if compose.is_generating {
                    self.notify(Notification::GenerationBusy);
                    return Task::none();
                }
                match compose.generate_request() {
                    Ok(request) => {
                        compose.is_generating = true;
                        return Task::single(Request::GenerateBody {
                            compose: compose.id,
                            request,
                        });
                    }
                    Err(reason) => self.notify(Notification::Invalid(reason)),
                }
            }
            ComposeMessage::Save(intent) => {
                if compose.is_saving {
                    return Task::none();
                }
                if let Some(reason) = compose.validate() {
                    self.notify(Notification::Invalid(reason));
                    return Task::none();
                }
                compose.is_saving = true;
                return Task::single(Request::CreateDraft {
                    compose: compose.id,
                    intent,
                    draft: compose.to_draft(),
                });
            }
            ComposeMessage::Open | ComposeMessage::Discard => {}
        }
        Task::none()
    }

    fn body_generated(&mut self, id: u64, result: Result<String, MailServiceError>) {
        let Some(compose) = self.compose.as_mut().filter(|c| c.id == id) else {
            debug!("Discarding generated body for closed compose buffer {id}");
            return;
        };
        compose.is_generating = false;
        match result {
            Ok(body) => compose.body = body,
            Err(e) => self.notify(Notification::GenerateFailed(e)),
        }
    }

    fn draft_created(
        &mut self,
        id: u64,
        intent: SaveIntent,
        result: Result<CorrespondenceItem, MailServiceError>,
    ) -> Task {
        let current = self.compose.as_ref().is_some_and(|c| c.id == id);
        match result {
            Ok(draft) => {
                if current {
                    self.compose = None;
                }
                info!("Draft {} created", draft.id);
                self.notify(Notification::DraftSaved(intent));
                let inbox = self.refresh(Partition::Inbox);
                let drafts = self.refresh(Partition::Drafts);
                Task::batch([inbox, drafts])
            }
            Err(e) => {
                if let Some(compose) = self.compose.as_mut().filter(|_| current) {
                    compose.is_saving = false;
                }
                self.notify(Notification::DraftSaveFailed(e));
                Task::none()
            }
        }
    }

    fn update_prompts(&mut self, message: PromptsMessage) -> Task {
        match message {
            PromptsMessage::Load => {
                if self.prompts.is_loading() || self.prompts.is_saving() {
                    return Task::none();
                }
                self.prompts.begin_load();
                Task::single(Request::LoadPrompts)
            }
            PromptsMessage::ContentChanged { id, content } => {
                if !self.prompts.edit(id, content) {
                    debug!("Prompt {id} cannot be edited now");
                }
                Task::none()
            }
            PromptsMessage::SaveAll => match self.prompts.begin_save() {
                Some((edited, original)) => Task::single(Request::SavePrompts { edited, original }),
                None => Task::none(),
            },
            PromptsMessage::Revert => {
                self.prompts.revert();
                Task::none()
            }
        }
    }
}
