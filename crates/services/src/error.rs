//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::config::ConfigError;
use quiz_core::model::{BankError, SessionError};

/// Errors emitted while reading a question bank file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] BankError),
}

/// Errors emitted by `QuizService` and `QuizRunner`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    BankLoad(#[from] BankLoadError),
    #[error("no async runtime available to drive the quiz timer")]
    NoRuntime,
}
