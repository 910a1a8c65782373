use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a session reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The last question received an answer that did not trigger a reveal.
    Completed,
    /// The countdown reached zero first.
    Timeout,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::Completed => f.write_str("completed"),
            EndReason::Timeout => f.write_str("timeout"),
        }
    }
}

/// Final score of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
    pub reason: EndReason,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Countdown seconds consumed before the session ended.
    pub elapsed_seconds: u32,
}

impl QuizResult {
    #[must_use]
    pub fn new(
        score: u32,
        total: u32,
        reason: EndReason,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        elapsed_seconds: u32,
    ) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            f64::from(score) / f64::from(total) * 100.0
        };
        Self {
            score,
            total,
            percentage,
            reason,
            started_at,
            ended_at,
            elapsed_seconds,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.reason == EndReason::Timeout
    }
}
