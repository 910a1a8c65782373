use std::path::Path;

use quiz_core::model::{Question, QuestionBank};

use crate::error::BankLoadError;

/// Parses a JSON array of `{ "prompt": ..., "answer": ... }` objects.
///
/// The short keys `q` and `a` are accepted as well.
///
/// # Errors
///
/// Returns `BankLoadError::Parse` for malformed JSON and
/// `BankLoadError::Invalid` when the bank fails validation.
pub fn parse_bank(json: &str) -> Result<QuestionBank, BankLoadError> {
    let questions: Vec<Question> = serde_json::from_str(json)?;
    Ok(QuestionBank::new(questions)?)
}

/// Reads and parses a bank file.
///
/// # Errors
///
/// Returns `BankLoadError::Io` if the file cannot be read, otherwise see [`parse_bank`].
pub fn load_bank(path: impl AsRef<Path>) -> Result<QuestionBank, BankLoadError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let bank = parse_bank(&raw)?;
    tracing::debug!(path = %path.display(), questions = bank.len(), "question bank loaded");
    Ok(bank)
}
