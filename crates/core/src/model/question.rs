use serde::{Deserialize, Serialize};

/// A single trivia prompt with its expected free-text answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(alias = "q")]
    prompt: String,
    #[serde(alias = "a")]
    answer: String,
}

impl Question {
    #[must_use]
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Case-insensitive exact comparison against the expected answer.
    ///
    /// Whitespace is significant: `" Paris"` does not match `"Paris"`.
    #[must_use]
    pub fn is_correct(&self, raw: &str) -> bool {
        raw.to_lowercase() == self.answer.to_lowercase()
    }
}
