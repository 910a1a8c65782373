use quiz_core::model::{QuizResult, QuizSession, SessionId};

/// Read-only copy of session state published after every change.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings (the countdown is raw seconds)
/// - no localization assumptions
///
/// The expected answer is only present while a reveal is showing.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSnapshot {
    pub session_id: SessionId,
    pub question_number: usize,
    pub question_count: usize,
    pub prompt: Option<String>,
    pub revealed_answer: Option<String>,
    pub score: u32,
    pub remaining_strikes: u32,
    pub max_strikes: u32,
    pub remaining_seconds: u32,
    pub result: Option<QuizResult>,
}

impl QuizSnapshot {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        Self {
            session_id: session.id(),
            question_number: session.question_number(),
            question_count: session.questions().len(),
            prompt: session
                .current_question()
                .map(|question| question.prompt().to_string()),
            revealed_answer: session.revealed_answer().map(str::to_string),
            score: session.score(),
            remaining_strikes: session.remaining_strikes(),
            max_strikes: session.config().max_consecutive_wrong(),
            remaining_seconds: session.remaining_seconds(),
            result: session.final_result(),
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }
}
