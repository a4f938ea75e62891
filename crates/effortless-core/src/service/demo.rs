//! In-memory Mail Service seeded with demo data.
//!
//! Classification and generation are keyword rules and templates, so the
//! output is deterministic. Useful offline and in tests.

use std::sync::{Mutex, MutexGuard};

use chrono::{Duration, Utc};

use super::{GenerateRequest, MailService, MailServiceError, NewDraft};
use crate::model::{
    ActionItems, Category, ChatMessage, CorrespondenceItem, ItemId, Partition, Prompt, PromptId,
};

const SEED_EMAILS: [(&str, &str, &str, i64); 5] = [
    (
        "boss@company.com",
        "Project Deadline Urgent",
        "Hi Nikhita, we need to finish the Q3 report by Friday 5 PM. Please send me the draft before then.",
        0,
    ),
    (
        "newsletter@techweekly.com",
        "Top 10 AI Tools in 2025",
        "Check out the latest tools in Agentic AI! LangGraph is taking over...",
        2,
    ),
    (
        "hr@company.com",
        "Meeting: Performance Review",
        "Hi, I would like to schedule your performance review for next Tuesday at 10 AM. Let me know if that works.",
        24,
    ),
    (
        "spam@lottery.com",
        "YOU WON $1,000,000!",
        "Click here to claim your prize now! Urgent!",
        48,
    ),
    (
        "client@bigcorp.com",
        "Contract Revision",
        "Please review the attached contract changes and get back to us by Monday.",
        5,
    ),
];

const SEED_PROMPTS: [(&str, &str); 3] = [
    (
        "categorize",
        "Categorize the following email into one of these categories: 'Work', 'Personal', 'Spam', 'Newsletter', 'Urgent'. Return only the category name.",
    ),
    (
        "extract_actions",
        "Extract action items from the email. Return a valid JSON list where each item has a 'task' and a 'deadline' field. If no tasks, return empty list [].",
    ),
    (
        "auto_reply",
        "You are a helpful assistant. Draft a professional and polite reply to this email. If it is a meeting request, ask for an agenda. Keep it concise.",
    ),
];

#[derive(Debug, Default)]
struct DemoState {
    inbox: Vec<CorrespondenceItem>,
    drafts: Vec<CorrespondenceItem>,
    prompts: Vec<Prompt>,
    next_id: i64,
}

impl DemoState {
    fn allocate_id(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId(self.next_id)
    }

    fn seed(&mut self) {
        let now = Utc::now();
        self.inbox.clear();
        self.drafts.clear();

        for (sender, subject, body, hours_ago) in SEED_EMAILS {
            let id = self.allocate_id();
            let mut item = CorrespondenceItem {
                id,
                partition: Partition::Inbox,
                counterpart: sender.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
                timestamp: now - Duration::hours(hours_ago),
                category: Category::Uncategorized,
                suggested_reply: None,
                action_items: ActionItems::default(),
                is_starred: false,
            };
            classify(&mut item);
            self.inbox.push(item);
        }

        if self.prompts.is_empty() {
            self.prompts = SEED_PROMPTS
                .iter()
                .zip(1..)
                .map(|((kind, content), id)| Prompt::new(id, *kind, *content))
                .collect();
        }
    }

    fn find(&self, id: ItemId) -> Option<&CorrespondenceItem> {
        self.inbox
            .iter()
            .chain(self.drafts.iter())
            .find(|item| item.id == id)
    }
}

/// Mail Service kept entirely in memory.
#[derive(Debug, Default)]
pub struct DemoMailService {
    state: Mutex<DemoState>,
}

impl DemoMailService {
    /// Creates an empty service; [`MailService::reset`] seeds it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service already holding the demo inbox and prompts.
    #[must_use]
    pub fn seeded() -> Self {
        let mut state = DemoState::default();
        state.seed();
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, DemoState>, MailServiceError> {
        self.state
            .lock()
            .map_err(|_| MailServiceError::Connection("demo state unavailable".to_string()))
    }
}

/// Local part of an address, used as a display name.
fn short_name(address: &str) -> &str {
    address.split('@').next().unwrap_or(address)
}

fn sentences(body: &str) -> impl Iterator<Item = &str> {
    body.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Keyword classification standing in for the AI pipeline.
fn classify(item: &mut CorrespondenceItem) {
    let sender = item.counterpart.to_lowercase();
    let subject = item.subject.to_lowercase();
    let body = item.body.to_lowercase();

    item.category = if sender.contains("lottery") || body.contains("claim your prize") {
        Category::Spam
    } else if sender.contains("newsletter") {
        Category::Newsletter
    } else if subject.contains("urgent") {
        Category::Urgent
    } else {
        Category::Work
    };

    if !item.category.accepts_reply() {
        let suggestion = match item.category {
            Category::Spam => "Block sender",
            _ => "Unsubscribe",
        };
        item.action_items = ActionItems {
            tasks: Vec::new(),
            suggestions: vec![suggestion.to_string()],
        };
        item.suggested_reply = None;
        return;
    }

    let tasks: Vec<String> = sentences(&item.body)
        .filter(|s| {
            let lower = s.to_lowercase();
            lower.contains("please") || lower.contains(" by ") || lower.contains("need to")
        })
        .map(ToString::to_string)
        .collect();

    let mut suggestions = vec![format!("Reply to {}", short_name(&item.counterpart))];
    if !tasks.is_empty() {
        suggestions.push("Add a reminder for the deadline".to_string());
    }

    item.suggested_reply = Some(format!(
        "Hi {},\n\nThanks for your message about \"{}\". I'll get back to you shortly.\n\nBest regards",
        short_name(&item.counterpart),
        item.subject
    ));
    item.action_items = ActionItems { tasks, suggestions };
}

fn answer(item: &CorrespondenceItem, query: &str) -> String {
    let lower = query.to_lowercase();
    let first = sentences(&item.body).next().unwrap_or_default();

    if lower.contains("summar") {
        format!(
            "{} writes about \"{}\": {first}.",
            item.counterpart, item.subject
        )
    } else if lower.contains("reply") || lower.contains("draft") {
        item.suggested_reply.clone().unwrap_or_else(|| {
            format!(
                "Hi {},\n\nThank you for your email.\n\nBest regards",
                short_name(&item.counterpart)
            )
        })
    } else {
        format!("Regarding \"{}\": {first}.", item.subject)
    }
}

impl MailService for DemoMailService {
    async fn reset(&self) -> Result<(), MailServiceError> {
        self.lock()?.seed();
        tracing::info!("Demo Mail Service reseeded");
        Ok(())
    }

    async fn list_items(
        &self,
        partition: Partition,
    ) -> Result<Vec<CorrespondenceItem>, MailServiceError> {
        let mut items = match partition {
            Partition::Inbox => self.lock()?.inbox.clone(),
            Partition::Drafts => self.lock()?.drafts.clone(),
        };
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(items)
    }

    async fn reprocess_inbox(&self) -> Result<(), MailServiceError> {
        self.lock()?.inbox.iter_mut().for_each(classify);
        Ok(())
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), MailServiceError> {
        let removed = {
            let mut state = self.lock()?;
            let before = state.inbox.len();
            state.inbox.retain(|item| item.id != id);
            state.inbox.len() < before
        };
        if removed {
            Ok(())
        } else {
            Err(MailServiceError::NotFound(format!("Email {id} not found")))
        }
    }

    async fn chat(
        &self,
        id: ItemId,
        query: &str,
        _history: &[ChatMessage],
    ) -> Result<String, MailServiceError> {
        self.lock()?
            .find(id)
            .map(|item| answer(item, query))
            .ok_or_else(|| MailServiceError::NotFound(format!("Email {id} not found")))
    }

    async fn generate_body(&self, request: &GenerateRequest) -> Result<String, MailServiceError> {
        if request.instructions.trim().is_empty() {
            return Err(MailServiceError::Rejected(
                "instructions must not be empty".to_string(),
            ));
        }
        Ok(format!(
            "Hi {},\n\nRegarding \"{}\": {}\n\nBest regards",
            short_name(&request.recipient),
            request.subject,
            request.instructions.trim()
        ))
    }

    async fn create_draft(&self, draft: &NewDraft) -> Result<CorrespondenceItem, MailServiceError> {
        let mut state = self.lock()?;
        let item = CorrespondenceItem {
            id: state.allocate_id(),
            partition: Partition::Drafts,
            counterpart: draft.recipient.clone(),
            subject: draft.subject.clone(),
            body: draft.body.clone(),
            timestamp: Utc::now(),
            category: Category::Uncategorized,
            suggested_reply: None,
            action_items: ActionItems::default(),
            is_starred: false,
        };
        state.drafts.push(item.clone());
        drop(state);
        Ok(item)
    }

    async fn update_reply_draft(&self, id: ItemId, content: &str) -> Result<(), MailServiceError> {
        let reply = Some(content.to_string()).filter(|r| !r.trim().is_empty());
        let mut state = self.lock()?;
        let item = state
            .inbox
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| MailServiceError::NotFound(format!("Email {id} not found")))?;
        item.suggested_reply = reply;
        drop(state);
        Ok(())
    }

    async fn list_prompts(&self) -> Result<Vec<Prompt>, MailServiceError> {
        Ok(self.lock()?.prompts.clone())
    }

    async fn update_prompt(&self, prompt: &Prompt) -> Result<(), MailServiceError> {
        let mut state = self.lock()?;
        let stored = state
            .prompts
            .iter_mut()
            .find(|p| p.id == prompt.id)
            .ok_or_else(|| not_found_prompt(prompt.id))?;
        stored.content.clone_from(&prompt.content);
        drop(state);
        Ok(())
    }
}

fn not_found_prompt(id: PromptId) -> MailServiceError {
    MailServiceError::NotFound(format!("Prompt {id} not found"))
}
