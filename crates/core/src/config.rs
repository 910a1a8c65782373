use thiserror::Error;

/// Number of questions drawn for one session.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Length of the global countdown, in seconds.
pub const DEFAULT_INITIAL_SECONDS: u32 = 600;

/// Consecutive wrong answers that trigger an answer reveal.
pub const DEFAULT_MAX_CONSECUTIVE_WRONG: u32 = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("initial seconds must be > 0")]
    InvalidInitialSeconds,

    #[error("max consecutive wrong answers must be > 0")]
    InvalidMaxConsecutiveWrong,
}

/// Tunable parameters of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    question_count: usize,
    initial_seconds: u32,
    max_consecutive_wrong: u32,
}

impl QuizConfig {
    /// Creates a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any parameter is zero.
    pub fn new(
        question_count: usize,
        initial_seconds: u32,
        max_consecutive_wrong: u32,
    ) -> Result<Self, ConfigError> {
        if question_count == 0 {
            return Err(ConfigError::InvalidQuestionCount);
        }
        if initial_seconds == 0 {
            return Err(ConfigError::InvalidInitialSeconds);
        }
        if max_consecutive_wrong == 0 {
            return Err(ConfigError::InvalidMaxConsecutiveWrong);
        }

        Ok(Self {
            question_count,
            initial_seconds,
            max_consecutive_wrong,
        })
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn initial_seconds(&self) -> u32 {
        self.initial_seconds
    }

    #[must_use]
    pub fn max_consecutive_wrong(&self) -> u32 {
        self.max_consecutive_wrong
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            initial_seconds: DEFAULT_INITIAL_SECONDS,
            max_consecutive_wrong: DEFAULT_MAX_CONSECUTIVE_WRONG,
        }
    }
}
