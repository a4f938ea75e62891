//! Configuration prompt models.

use serde::{Deserialize, Serialize};

/// Unique identifier for a configuration prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(pub i64);

impl std::fmt::Display for PromptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named instruction the Mail Service uses when classifying and drafting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Unique identifier.
    pub id: PromptId,
    /// Which pipeline stage the prompt drives (e.g. `categorize`).
    pub prompt_type: String,
    /// Free-text instruction.
    pub content: String,
}

impl Prompt {
    /// Creates a prompt.
    #[must_use]
    pub fn new(id: i64, prompt_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: PromptId(id),
            prompt_type: prompt_type.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_deserialization() {
        let json = r#"{"id": 2, "prompt_type": "extract_actions", "content": "List tasks."}"#;
        let prompt: Prompt = serde_json::from_str(json).unwrap();
        assert_eq!(prompt, Prompt::new(2, "extract_actions", "List tasks."));
    }
}
