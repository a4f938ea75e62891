//! Chat transcript for the selected item.
//!
//! At most one question is in flight. Each submission gets a ticket; a
//! completion is applied only if its ticket and item still match, so a late
//! answer never lands on another turn or another item's transcript.

use effortless_core::{ChatMessage, ChatTurn, ItemId, MailServiceError, history_from};

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChatRejected {
    /// Question was empty or whitespace.
    #[error("question is empty")]
    Empty,
    /// No item is selected.
    #[error("no item selected")]
    NoItem,
    /// A previous question is still waiting for its answer.
    #[error("a question is already pending")]
    Busy,
}

/// A submission accepted by the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChat {
    /// Item asked about.
    pub item: ItemId,
    /// Ticket to present with the answer.
    pub ticket: u64,
    /// Trimmed question.
    pub query: String,
    /// Transcript before this question, flattened.
    pub history: Vec<ChatMessage>,
}

/// What happened to a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The answer was recorded on its turn.
    Answered,
    /// The turn was withdrawn because the request failed.
    RolledBack(MailServiceError),
    /// The completion no longer matches the transcript and was ignored.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    ticket: u64,
    index: usize,
}

/// Ordered question/answer turns scoped to one item.
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    item: Option<ItemId>,
    turns: Vec<ChatTurn>,
    in_flight: Option<InFlight>,
    /// Last ticket handed out; survives resets.
    last_ticket: u64,
}

impl ChatTranscript {
    /// Creates an empty transcript bound to no item.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Item the transcript belongs to.
    #[must_use]
    pub const fn item(&self) -> Option<ItemId> {
        self.item
    }

    /// Turns in order.
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Whether a question is awaiting its answer.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Clears the transcript and binds it to `item`.
    ///
    /// Any outstanding answer becomes stale.
    pub fn reset(&mut self, item: Option<ItemId>) {
        self.item = item;
        self.turns.clear();
        self.in_flight = None;
    }

    /// Appends a pending turn for `question`.
    ///
    /// # Errors
    ///
    /// Rejects empty questions, an unbound transcript and submissions while
    /// another question is pending. The transcript is unchanged then.
    pub fn submit(&mut self, question: &str) -> Result<PendingChat, ChatRejected> {
        let query = question.trim();
        if query.is_empty() {
            return Err(ChatRejected::Empty);
        }
        let item = self.item.ok_or(ChatRejected::NoItem)?;
        if self.in_flight.is_some() {
            return Err(ChatRejected::Busy);
        }

        let history = history_from(&self.turns);
        self.last_ticket += 1;
        self.in_flight = Some(InFlight {
            ticket: self.last_ticket,
            index: self.turns.len(),
        });
        self.turns.push(ChatTurn::pending(query));

        Ok(PendingChat {
            item,
            ticket: self.last_ticket,
            query: query.to_string(),
            history,
        })
    }

    /// Applies the outcome of the request issued with `ticket`.
    ///
    /// An empty answer counts as a failure so no turn stays pending.
    pub fn resolve(
        &mut self,
        item: ItemId,
        ticket: u64,
        result: Result<String, MailServiceError>,
    ) -> Resolution {
        let Some(in_flight) = self.in_flight else {
            return Resolution::Stale;
        };
        if self.item != Some(item) || in_flight.ticket != ticket {
            return Resolution::Stale;
        }
        self.in_flight = None;

        let result = result.and_then(|answer| {
            if answer.trim().is_empty() {
                Err(MailServiceError::Decode("empty answer".to_string()))
            } else {
                Ok(answer)
            }
        });

        match result {
            Ok(answer) => {
                if let Some(turn) = self.turns.get_mut(in_flight.index) {
                    turn.answer = Some(answer);
                }
                Resolution::Answered
            }
            Err(error) => {
                if in_flight.index < self.turns.len() {
                    self.turns.remove(in_flight.index);
                }
                Resolution::RolledBack(error)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use effortless_core::ChatRole;

    fn bound(id: i64) -> ChatTranscript {
        let mut transcript = ChatTranscript::new();
        transcript.reset(Some(ItemId(id)));
        transcript
    }

    #[test]
    fn test_submit_rejects_blank_and_unbound() {
        let mut transcript = ChatTranscript::new();
        assert_eq!(transcript.submit("hi"), Err(ChatRejected::NoItem));

        let mut transcript = bound(1);
        assert_eq!(transcript.submit("   "), Err(ChatRejected::Empty));
        assert!(transcript.turns().is_empty());
    }

    #[test]
    fn test_history_excludes_new_turn() {
        let mut transcript = bound(1);
        let first = transcript.submit("Summarize").unwrap();
        assert!(first.history.is_empty());
        transcript.resolve(ItemId(1), first.ticket, Ok("Done".into()));

        let second = transcript.submit(" Draft a reply ").unwrap();
        assert_eq!(second.query, "Draft a reply");
        assert_eq!(second.history.len(), 2);
        assert_eq!(second.history[1].role, ChatRole::Assistant);
        assert_eq!(second.history[1].content, "Done");
        assert_eq!(transcript.turns().len(), 2);
        assert!(transcript.turns()[1].is_pending());
    }

    #[test]
    fn test_second_submit_while_pending_is_busy() {
        let mut transcript = bound(1);
        let first = transcript.submit("One").unwrap();
        assert_eq!(transcript.submit("Two"), Err(ChatRejected::Busy));
        assert_eq!(transcript.turns().len(), 1);

        assert_eq!(
            transcript.resolve(ItemId(1), first.ticket, Ok("A1".into())),
            Resolution::Answered
        );
        assert_eq!(transcript.turns()[0], ChatTurn::answered("One", "A1"));
    }

    #[test]
    fn test_failure_rolls_back_turn() {
        let mut transcript = bound(1);
        let first = transcript.submit("Summarize").unwrap();
        transcript.resolve(ItemId(1), first.ticket, Ok("Done".into()));

        let second = transcript.submit("Draft a reply").unwrap();
        let outcome = transcript.resolve(
            ItemId(1),
            second.ticket,
            Err(MailServiceError::Status {
                status: 500,
                message: "boom".into(),
            }),
        );

        assert!(matches!(outcome, Resolution::RolledBack(_)));
        assert_eq!(transcript.turns(), &[ChatTurn::answered("Summarize", "Done")]);
        assert!(!transcript.is_busy());
    }

    #[test]
    fn test_empty_answer_rolls_back() {
        let mut transcript = bound(1);
        let pending = transcript.submit("Hello?").unwrap();
        let outcome = transcript.resolve(ItemId(1), pending.ticket, Ok("  ".into()));
        assert!(matches!(outcome, Resolution::RolledBack(MailServiceError::Decode(_))));
        assert!(transcript.turns().is_empty());
    }

    #[test]
    fn test_answer_after_reset_is_stale() {
        let mut transcript = bound(1);
        let pending = transcript.submit("Summarize").unwrap();

        transcript.reset(Some(ItemId(2)));
        assert_eq!(
            transcript.resolve(ItemId(1), pending.ticket, Ok("late".into())),
            Resolution::Stale
        );

        transcript.reset(Some(ItemId(1)));
        assert_eq!(
            transcript.resolve(ItemId(1), pending.ticket, Ok("late".into())),
            Resolution::Stale
        );
        assert!(transcript.turns().is_empty());
    }
}
