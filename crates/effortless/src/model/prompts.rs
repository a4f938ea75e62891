//! Prompt configuration edit buffer.

use effortless_core::{Prompt, PromptId};

/// Loaded prompts plus unsaved edits.
#[derive(Debug, Clone, Default)]
pub struct PromptEditor {
    original: Vec<Prompt>,
    buffer: Vec<Prompt>,
    is_loading: bool,
    is_saving: bool,
}

impl PromptEditor {
    /// Creates an empty editor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prompts as currently edited.
    #[must_use]
    pub fn prompts(&self) -> &[Prompt] {
        &self.buffer
    }

    /// Prompts as last loaded or saved.
    #[must_use]
    pub fn original(&self) -> &[Prompt] {
        &self.original
    }

    /// Whether a load is running.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether a save is running.
    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.is_saving
    }

    /// Whether the buffer differs from what was loaded.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.buffer != self.original
    }

    /// Marks a load as started.
    pub const fn begin_load(&mut self) {
        self.is_loading = true;
    }

    /// Records a load failure.
    pub const fn load_failed(&mut self) {
        self.is_loading = false;
    }

    /// Replaces both the original set and the buffer.
    pub fn load(&mut self, prompts: Vec<Prompt>) {
        self.buffer.clone_from(&prompts);
        self.original = prompts;
        self.is_loading = false;
    }

    /// Edits a prompt's content. Returns `false` if there is no such prompt
    /// or a save is running.
    pub fn edit(&mut self, id: PromptId, content: String) -> bool {
        if self.is_saving {
            return false;
        }
        self.buffer
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p.content = content)
            .is_some()
    }

    /// Starts a save, returning the edited and original sets.
    ///
    /// Returns `None` if there is nothing loaded or a save is running.
    pub fn begin_save(&mut self) -> Option<(Vec<Prompt>, Vec<Prompt>)> {
        if self.is_saving || self.buffer.is_empty() {
            return None;
        }
        self.is_saving = true;
        Some((self.buffer.clone(), self.original.clone()))
    }

    /// Records the outcome of a save. On success the buffer becomes the new
    /// original; on failure the edits are kept for another attempt.
    pub fn finish_save(&mut self, succeeded: bool) {
        self.is_saving = false;
        if succeeded {
            self.original.clone_from(&self.buffer);
        }
    }

    /// Drops unsaved edits.
    pub fn revert(&mut self) {
        if !self.is_saving {
            self.buffer.clone_from(&self.original);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn loaded() -> PromptEditor {
        let mut editor = PromptEditor::new();
        editor.load(vec![
            Prompt::new(1, "categorize", "Categorize."),
            Prompt::new(2, "auto_reply", "Reply politely."),
        ]);
        editor
    }

    #[test]
    fn test_edit_and_revert() {
        let mut editor = loaded();
        assert!(editor.edit(PromptId(2), "Reply briefly.".into()));
        assert!(!editor.edit(PromptId(9), "x".into()));
        assert!(editor.is_dirty());

        editor.revert();
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_save_lifecycle() {
        let mut editor = loaded();
        editor.edit(PromptId(1), "Only Work or Spam.".into());

        let (edited, original) = editor.begin_save().unwrap();
        assert_eq!(edited[0].content, "Only Work or Spam.");
        assert_eq!(original[0].content, "Categorize.");
        assert!(editor.begin_save().is_none());
        assert!(!editor.edit(PromptId(1), "locked".into()));

        editor.finish_save(false);
        assert!(editor.is_dirty());

        editor.begin_save().unwrap();
        editor.finish_save(true);
        assert!(!editor.is_dirty());
        assert_eq!(editor.original()[0].content, "Only Work or Spam.");
    }

    #[test]
    fn test_nothing_to_save_when_empty() {
        assert!(PromptEditor::new().begin_save().is_none());
    }
}
