use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::model::{QuestionBank, QuizSession, SessionId};
use quiz_core::{Clock, QuizConfig};

use crate::error::ServiceError;

/// Draws quiz sessions from a shared bank.
///
/// Owns the pieces a session needs but should not pick for itself:
/// - the question bank and config
/// - the random source (OS-seeded unless `with_seed` is used)
/// - the wall clock
/// - the id sequence
pub struct QuizService {
    bank: Arc<QuestionBank>,
    config: QuizConfig,
    clock: Clock,
    state: Mutex<DrawState>,
}

struct DrawState {
    rng: StdRng,
    next_id: SessionId,
}

impl QuizService {
    /// # Errors
    ///
    /// Returns `ServiceError::Session` if the bank cannot fill a single session.
    pub fn new(
        bank: Arc<QuestionBank>,
        config: QuizConfig,
        clock: Clock,
    ) -> Result<Self, ServiceError> {
        if bank.len() < config.question_count() {
            return Err(quiz_core::model::SessionError::InsufficientQuestions {
                required: config.question_count(),
                available: bank.len(),
            }
            .into());
        }

        Ok(Self {
            bank,
            config,
            clock,
            state: Mutex::new(DrawState {
                rng: StdRng::from_os_rng(),
                next_id: SessionId::new(1),
            }),
        })
    }

    /// Replaces the random source with a seeded one for reproducible draws.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.rng = StdRng::seed_from_u64(seed);
        }
        self
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn config(&self) -> QuizConfig {
        self.config
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Draws a new session with the next id.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Session` if the bank is too small for the config.
    pub fn start_session(&self) -> Result<QuizSession, ServiceError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let id = state.next_id;
        let session = QuizSession::start(
            id,
            &self.bank,
            self.config,
            &mut state.rng,
            self.clock.now(),
        )?;
        state.next_id = id.next();

        tracing::info!(
            session = %id,
            questions = session.questions().len(),
            seconds = session.remaining_seconds(),
            "quiz session started"
        );
        Ok(session)
    }

    /// Draws a session that replaces `previous`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Session` if the bank is too small for the config.
    pub fn restart(&self, previous: &QuizSession) -> Result<QuizSession, ServiceError> {
        tracing::info!(
            previous = %previous.id(),
            score = previous.score(),
            finished = previous.is_complete(),
            "quiz session restarted"
        );
        self.start_session()
    }
}

impl fmt::Debug for QuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizService")
            .field("bank_len", &self.bank.len())
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
