//! Line-oriented terminal front end.
//!
//! Turns typed commands into [`Message`]s and renders session state as
//! plain text.

use std::fmt::Write as _;

use effortless_core::{CorrespondenceItem, ItemId, Partition, PromptId};

use crate::message::{ComposeMessage, Disposition, Message, PromptsMessage, SaveIntent};
use crate::model::ReadingPane;
use crate::notification::{Notification, Severity};
use crate::session::Session;

/// Help text listing every command.
pub const HELP: &str = "\
Session:   login | logout | quit
Views:     inbox | drafts | list | show | refresh | reprocess | search [text]
Items:     open <id> | back | star <id> | delete | confirm | cancel
Actions:   accept <n> | dismiss <n>
Chat:      chat | ask <question> | close
Reply:     reply | edit <text> | save-reply | regenerate | close
Compose:   compose | to <addr> | subject <text> | instruct <text> | body <text>
           generate | save | send | discard
Prompts:   prompts | prompt <id> <content> | save-prompts | revert-prompts";

/// A parsed command line.
#[derive(Debug, Clone)]
pub enum Command {
    /// Send a message to the session.
    Dispatch(Message),
    /// Print the item list.
    List,
    /// Print the selected item.
    Show,
    /// Print the help text.
    Help,
    /// Leave the program.
    Quit,
}

/// Errors turning a line into a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The command word is not known.
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),
    /// A required argument is missing.
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    /// An id or index could not be parsed.
    #[error("not a number: {0}")]
    NotANumber(String),
    /// The command needs a selected item.
    #[error("no item selected")]
    NoSelection,
    /// The suggestion index is out of range.
    #[error("no suggestion #{0}")]
    NoSuggestion(usize),
}

fn number<T: std::str::FromStr>(arg: &str) -> Result<T, CommandError> {
    arg.trim()
        .parse()
        .map_err(|_| CommandError::NotANumber(arg.trim().to_string()))
}

fn required<'a>(command: &'static str, arg: &'a str) -> Result<&'a str, CommandError> {
    if arg.trim().is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(arg.trim())
    }
}

/// Parses a command line. Suggestion indices are resolved against the
/// selected item of `session`.
///
/// # Errors
///
/// Returns an error for unknown commands and malformed arguments.
pub fn parse(line: &str, session: &Session) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let message = match word.to_lowercase().as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "list" | "ls" => return Ok(Some(Command::List)),
        "show" => return Ok(Some(Command::Show)),

        "login" => Message::Login,
        "logout" => Message::Logout,
        "inbox" => Message::ShowPartition(Partition::Inbox),
        "drafts" => Message::ShowPartition(Partition::Drafts),
        "refresh" => Message::Refresh,
        "reprocess" => Message::Reprocess,
        "search" => Message::SearchChanged(rest.to_string()),

        "open" | "select" => Message::Select(ItemId(number(required("open", rest)?)?)),
        "back" => Message::ClearSelection,
        "star" => Message::ToggleStar(ItemId(number(required("star", rest)?)?)),
        "delete" => Message::DeleteSelected,
        "confirm" | "yes" => Message::Confirm,
        "cancel" | "no" => Message::Cancel,
        "accept" | "dismiss" => {
            let disposition = if word.eq_ignore_ascii_case("accept") {
                Disposition::Accept
            } else {
                Disposition::Dismiss
            };
            let index: usize = number(required("accept/dismiss", rest)?)?;
            let item = session.selected_item().ok_or(CommandError::NoSelection)?;
            let suggestion = index
                .checked_sub(1)
                .and_then(|i| item.action_items.suggestions.get(i))
                .ok_or(CommandError::NoSuggestion(index))?;
            Message::DisposeSuggestion {
                item: item.id,
                suggestion: suggestion.clone(),
                disposition,
            }
        }

        "chat" => Message::OpenChat,
        "ask" => Message::SubmitChat(required("ask", rest)?.to_string()),
        "close" => match session.selection().pane() {
            ReadingPane::DraftOpen => Message::CloseDraftEditor,
            _ => Message::CloseChat,
        },

        "reply" => Message::OpenDraftEditor,
        "edit" => Message::ReplyDraftChanged(rest.to_string()),
        "save-reply" => Message::SaveReplyDraft,
        "regenerate" => Message::Regenerate,

        "compose" => Message::Compose(ComposeMessage::Open),
        "to" => Message::Compose(ComposeMessage::RecipientChanged(rest.to_string())),
        "subject" => Message::Compose(ComposeMessage::SubjectChanged(rest.to_string())),
        "instruct" => Message::Compose(ComposeMessage::InstructionsChanged(rest.to_string())),
        "body" => Message::Compose(ComposeMessage::BodyChanged(rest.to_string())),
        "generate" => Message::Compose(ComposeMessage::Generate),
        "save" => Message::Compose(ComposeMessage::Save(SaveIntent::Save)),
        "send" => Message::Compose(ComposeMessage::Save(SaveIntent::Send)),
        "discard" => Message::Compose(ComposeMessage::Discard),

        "prompts" => Message::Prompts(PromptsMessage::Load),
        "prompt" => {
            let (id, content) = required("prompt", rest)?
                .split_once(char::is_whitespace)
                .ok_or(CommandError::MissingArgument("prompt"))?;
            Message::Prompts(PromptsMessage::ContentChanged {
                id: PromptId(number(id)?),
                content: content.trim().to_string(),
            })
        }
        "save-prompts" => Message::Prompts(PromptsMessage::SaveAll),
        "revert-prompts" => Message::Prompts(PromptsMessage::Revert),

        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(Command::Dispatch(message)))
}

/// Renders a notification as one line.
#[must_use]
pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.severity() {
        Severity::Info => "info",
        Severity::Error => "error",
        Severity::Fatal => "fatal",
    };
    format!("[{tag}] {notification}")
}

fn row(item: &CorrespondenceItem, selected: bool) -> String {
    format!(
        "{} {}{:>4}  {:<12} {:<28} {}",
        if selected { '>' } else { ' ' },
        if item.is_starred { '*' } else { ' ' },
        item.id.0,
        item.category.as_str(),
        item.counterpart,
        item.subject,
    )
}

/// Renders the visible items of the active partition.
#[must_use]
pub fn render_list(session: &Session) -> String {
    let selection = session.selection();
    let items = session.visible_items();
    let mut out = format!(
        "{} ({} items)",
        selection.partition().display_name(),
        items.len()
    );
    if !session.search().is_empty() {
        let _ = write!(out, ", filter \"{}\"", session.search());
    }
    for item in items {
        out.push('\n');
        out.push_str(&row(item, selection.selected() == Some(item.id)));
    }
    out
}

/// Renders the selected item with its open panel.
#[must_use]
pub fn render_item(session: &Session) -> String {
    let Some(item) = session.selected_item() else {
        return "Nothing selected".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", item.id, item.subject);
    let label = match item.partition {
        Partition::Inbox => "From",
        Partition::Drafts => "To",
    };
    let _ = writeln!(out, "{label}: {}", item.counterpart);
    let _ = writeln!(
        out,
        "Date: {}  Category: {}{}",
        item.timestamp.format("%Y-%m-%d %H:%M"),
        item.category,
        if item.is_starred { "  (starred)" } else { "" }
    );
    let _ = writeln!(out, "\n{}", item.body);

    if !item.action_items.tasks.is_empty() {
        out.push_str("\nTasks:\n");
        for task in &item.action_items.tasks {
            let _ = writeln!(out, "  - {task}");
        }
    }
    if !item.action_items.suggestions.is_empty() {
        out.push_str("\nSuggestions:\n");
        for (i, suggestion) in item.action_items.suggestions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {suggestion}", i + 1);
        }
    }

    match session.selection().pane() {
        ReadingPane::ChatOpen => {
            out.push_str("\nChat:\n");
            for turn in session.chat().turns() {
                let _ = writeln!(out, "  you: {}", turn.question);
                let answer = turn.answer.as_deref().filter(|a| !a.is_empty());
                let _ = writeln!(out, "  ai:  {}", answer.unwrap_or("..."));
            }
        }
        ReadingPane::DraftOpen => {
            if let Some(reply) = session.reply_draft() {
                let _ = writeln!(
                    out,
                    "\nReply draft{}:\n{}",
                    if reply.is_edited() { " (edited)" } else { "" },
                    reply.buffer()
                );
            }
        }
        ReadingPane::Reading | ReadingPane::Empty => {}
    }

    out.trim_end().to_string()
}

/// Renders the compose buffer, if open.
#[must_use]
pub fn render_compose(session: &Session) -> Option<String> {
    let compose = session.compose()?;
    Some(format!(
        "To: {}\nSubject: {}\nInstructions: {}\n\n{}{}",
        compose.recipient,
        compose.subject,
        compose.instructions,
        compose.body,
        if compose.is_generating {
            "\n(generating...)"
        } else {
            ""
        }
    ))
}

/// Renders the prompt edit buffer.
#[must_use]
pub fn render_prompts(session: &Session) -> String {
    let editor = session.prompts();
    let mut out = String::from(if editor.is_dirty() {
        "Prompts (unsaved changes)"
    } else {
        "Prompts"
    });
    for prompt in editor.prompts() {
        let _ = write!(out, "\n[{}] {}: {}", prompt.id, prompt.prompt_type, prompt.content);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dispatched(line: &str) -> Message {
        match parse(line, &Session::new()).unwrap() {
            Some(Command::Dispatch(message)) => message,
            other => panic!("expected a message, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_basic_commands() {
        assert!(matches!(dispatched("login"), Message::Login));
        assert!(matches!(
            dispatched("drafts"),
            Message::ShowPartition(Partition::Drafts)
        ));
        assert!(matches!(dispatched("open 3"), Message::Select(ItemId(3))));
        assert!(matches!(
            dispatched("ask  Summarize this "),
            Message::SubmitChat(q) if q == "Summarize this"
        ));
        assert!(matches!(
            dispatched("send"),
            Message::Compose(ComposeMessage::Save(SaveIntent::Send))
        ));
        assert!(matches!(
            dispatched("prompt 2 Be brief."),
            Message::Prompts(PromptsMessage::ContentChanged { id: PromptId(2), content })
                if content == "Be brief."
        ));
    }

    #[test]
    fn test_parse_errors() {
        let session = Session::new();
        assert!(parse("   ", &session).unwrap().is_none());
        assert_eq!(
            parse("frobnicate", &session).unwrap_err(),
            CommandError::Unknown("frobnicate".into())
        );
        assert_eq!(
            parse("open x", &session).unwrap_err(),
            CommandError::NotANumber("x".into())
        );
        assert_eq!(
            parse("ask", &session).unwrap_err(),
            CommandError::MissingArgument("ask")
        );
        assert_eq!(
            parse("accept 1", &session).unwrap_err(),
            CommandError::NoSelection
        );
    }

    #[test]
    fn test_render_empty_session() {
        let session = Session::new();
        assert_eq!(render_list(&session), "Inbox (0 items)");
        assert_eq!(render_item(&session), "Nothing selected");
        assert!(render_compose(&session).is_none());
    }

    #[test]
    fn test_render_notification_tag() {
        assert_eq!(
            render_notification(&Notification::ChatBusy),
            "[error] Still waiting for the previous answer"
        );
    }
}
