use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use thiserror::Error;

use crate::config::QuizConfig;
use crate::model::bank::QuestionBank;
use crate::model::ids::SessionId;
use crate::model::question::Question;
use crate::model::result::{EndReason, QuizResult};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question bank has {available} questions but a session needs {required}")]
    InsufficientQuestions { required: usize, available: usize },

    #[error("session is over")]
    SessionOver,
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// What the caller should render after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStep {
    /// Moved on to the next question.
    Advanced,
    /// Stayed on the current question; its answer is now revealed.
    Revealed,
    /// The last question was answered and the session is over.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerResult {
    pub correct: bool,
    pub step: AnswerStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining_seconds: u32 },
    TimedOut,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through of the quiz.
///
/// Every mutating call either applies fully or is rejected without touching
/// any field. Once the session is over only a restart (a brand new session)
/// moves things forward.
#[derive(Clone, PartialEq)]
pub struct QuizSession {
    id: SessionId,
    config: QuizConfig,
    questions: Vec<Question>,
    position: usize,
    score: u32,
    consecutive_wrong: u32,
    reveal_pending: bool,
    remaining_seconds: u32,
    end_reason: Option<EndReason>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Draws `config.question_count()` questions from `bank` and starts the countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InsufficientQuestions` if the bank is too small.
    pub fn start<R: Rng + ?Sized>(
        id: SessionId,
        bank: &QuestionBank,
        config: QuizConfig,
        rng: &mut R,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let required = config.question_count();
        let questions =
            bank.draw(required, rng)
                .ok_or(SessionError::InsufficientQuestions {
                    required,
                    available: bank.len(),
                })?;
        Ok(Self::fresh(id, config, questions, started_at))
    }

    /// Starts a session over `questions` in the given order.
    ///
    /// Extra questions beyond `config.question_count()` are dropped.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InsufficientQuestions` if too few questions are given.
    pub fn from_questions(
        id: SessionId,
        mut questions: Vec<Question>,
        config: QuizConfig,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let required = config.question_count();
        if questions.len() < required {
            return Err(SessionError::InsufficientQuestions {
                required,
                available: questions.len(),
            });
        }
        questions.truncate(required);
        Ok(Self::fresh(id, config, questions, started_at))
    }

    /// Replaces this session with a new draw under the same config.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InsufficientQuestions` if the bank is too small.
    pub fn restart<R: Rng + ?Sized>(
        &self,
        id: SessionId,
        bank: &QuestionBank,
        rng: &mut R,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        Self::start(id, bank, self.config, rng, started_at)
    }

    fn fresh(
        id: SessionId,
        config: QuizConfig,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            config,
            questions,
            position: 0,
            score: 0,
            consecutive_wrong: 0,
            reveal_pending: false,
            remaining_seconds: config.initial_seconds(),
            end_reason: None,
            started_at,
            ended_at: None,
        }
    }

    /// Counts down one second.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionOver` if the session already ended.
    pub fn on_second_elapsed(&mut self, now: DateTime<Utc>) -> Result<TickOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::SessionOver);
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.finish(EndReason::Timeout, now);
            return Ok(TickOutcome::TimedOut);
        }

        Ok(TickOutcome::Running {
            remaining_seconds: self.remaining_seconds,
        })
    }

    /// Checks `raw` against the current question and moves the session along.
    ///
    /// A wrong answer advances like a correct one unless it is the
    /// `max_consecutive_wrong`-th in a row; that one reveals the expected
    /// answer, resets the strike count and keeps the position.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionOver` if the session already ended.
    pub fn submit_answer(
        &mut self,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerResult, SessionError> {
        let correct = match self.current_question() {
            Some(question) if !self.is_complete() => question.is_correct(raw),
            _ => return Err(SessionError::SessionOver),
        };

        if correct {
            self.score += 1;
            self.consecutive_wrong = 0;
        } else if self.consecutive_wrong + 1 >= self.config.max_consecutive_wrong() {
            self.reveal_pending = true;
            self.consecutive_wrong = 0;
            return Ok(AnswerResult {
                correct,
                step: AnswerStep::Revealed,
            });
        } else {
            self.consecutive_wrong += 1;
        }

        self.reveal_pending = false;
        if self.position + 1 >= self.questions.len() {
            self.finish(EndReason::Completed, now);
            return Ok(AnswerResult {
                correct,
                step: AnswerStep::Finished,
            });
        }

        self.position += 1;
        Ok(AnswerResult {
            correct,
            step: AnswerStep::Advanced,
        })
    }

    fn finish(&mut self, reason: EndReason, now: DateTime<Utc>) {
        self.end_reason = Some(reason);
        self.ended_at = Some(now);
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.end_reason.is_some()
    }

    /// Score card for a finished session, `None` while it is still running.
    #[must_use]
    pub fn final_result(&self) -> Option<QuizResult> {
        let reason = self.end_reason?;
        let ended_at = self.ended_at.unwrap_or(self.started_at);
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        Some(QuizResult::new(
            self.score,
            total,
            reason,
            self.started_at,
            ended_at,
            self.config.initial_seconds() - self.remaining_seconds,
        ))
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// One-based number of the current question.
    #[must_use]
    pub fn question_number(&self) -> usize {
        self.position + 1
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn consecutive_wrong(&self) -> u32 {
        self.consecutive_wrong
    }

    #[must_use]
    pub fn remaining_strikes(&self) -> u32 {
        self.config.max_consecutive_wrong() - self.consecutive_wrong
    }

    #[must_use]
    pub fn reveal_pending(&self) -> bool {
        self.reveal_pending
    }

    /// Expected answer of the current question while a reveal is showing.
    #[must_use]
    pub fn revealed_answer(&self) -> Option<&str> {
        if !self.reveal_pending {
            return None;
        }
        self.current_question().map(Question::answer)
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("questions_len", &self.questions.len())
            .field("position", &self.position)
            .field("score", &self.score)
            .field("consecutive_wrong", &self.consecutive_wrong)
            .field("reveal_pending", &self.reveal_pending)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("end_reason", &self.end_reason)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn numbered_questions(len: usize) -> Vec<Question> {
        (0..len)
            .map(|i| Question::new(format!("Q{i}?"), format!("A{i}")))
            .collect()
    }

    fn ordered_session(len: usize) -> QuizSession {
        QuizSession::from_questions(
            SessionId::new(1),
            numbered_questions(len),
            QuizConfig::default(),
            fixed_now(),
        )
        .unwrap()
    }

    fn current_answer(session: &QuizSession) -> String {
        session.current_question().unwrap().answer().to_string()
    }

    fn assert_invariants(session: &QuizSession) {
        let config = session.config();
        assert!(session.score() as usize <= config.question_count());
        assert!(session.consecutive_wrong() < config.max_consecutive_wrong());
        assert!(session.remaining_seconds() <= config.initial_seconds());
        if !session.is_complete() {
            assert!(session.position() < config.question_count());
        }
    }

    #[test]
    fn start_initializes_every_field() {
        let bank = QuestionBank::new(numbered_questions(15)).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let session =
            QuizSession::start(SessionId::new(1), &bank, QuizConfig::default(), &mut rng, fixed_now())
                .unwrap();

        assert_eq!(session.questions().len(), 10);
        assert_eq!(session.position(), 0);
        assert_eq!(session.question_number(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.consecutive_wrong(), 0);
        assert_eq!(session.remaining_strikes(), 3);
        assert!(!session.reveal_pending());
        assert_eq!(session.remaining_seconds(), 600);
        assert!(!session.is_complete());
        assert!(session.final_result().is_none());
    }

    #[test]
    fn start_rejects_small_bank() {
        let bank = QuestionBank::new(numbered_questions(9)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let err =
            QuizSession::start(SessionId::new(1), &bank, QuizConfig::default(), &mut rng, fixed_now())
                .unwrap_err();
        assert_eq!(
            err,
            SessionError::InsufficientQuestions {
                required: 10,
                available: 9
            }
        );
    }

    #[test]
    fn seeded_start_is_reproducible() {
        let bank = QuestionBank::builtin();
        let a = QuizSession::start(
            SessionId::new(1),
            &bank,
            QuizConfig::default(),
            &mut StdRng::seed_from_u64(5),
            fixed_now(),
        )
        .unwrap();
        let b = QuizSession::start(
            SessionId::new(2),
            &bank,
            QuizConfig::default(),
            &mut StdRng::seed_from_u64(5),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(a.questions(), b.questions());
    }

    #[test]
    fn correct_answer_scores_and_advances() {
        let mut session = ordered_session(10);
        let result = session.submit_answer("a0", fixed_now()).unwrap();

        assert_eq!(
            result,
            AnswerResult {
                correct: true,
                step: AnswerStep::Advanced
            }
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn wrong_answer_advances_and_counts_strike() {
        let mut session = ordered_session(10);
        let result = session.submit_answer("nope", fixed_now()).unwrap();

        assert_eq!(
            result,
            AnswerResult {
                correct: false,
                step: AnswerStep::Advanced
            }
        );
        assert_eq!(session.score(), 0);
        assert_eq!(session.position(), 1);
        assert_eq!(session.consecutive_wrong(), 1);
        assert_eq!(session.remaining_strikes(), 2);
    }

    #[test]
    fn third_consecutive_wrong_reveals_without_advancing() {
        let mut session = ordered_session(10);
        session.submit_answer("x", fixed_now()).unwrap();
        session.submit_answer("x", fixed_now()).unwrap();
        assert_eq!(session.position(), 2);
        assert_eq!(session.consecutive_wrong(), 2);

        let result = session.submit_answer("x", fixed_now()).unwrap();
        assert_eq!(result.step, AnswerStep::Revealed);
        assert!(session.reveal_pending());
        assert_eq!(session.consecutive_wrong(), 0);
        assert_eq!(session.position(), 2);
        assert_eq!(session.score(), 0);
        assert_eq!(session.revealed_answer(), Some("A2"));
    }

    #[test]
    fn submission_after_reveal_advances_and_clears_reveal() {
        let mut session = ordered_session(10);
        for _ in 0..3 {
            session.submit_answer("x", fixed_now()).unwrap();
        }
        assert!(session.reveal_pending());

        let result = session.submit_answer("still wrong", fixed_now()).unwrap();
        assert_eq!(result.step, AnswerStep::Advanced);
        assert!(!session.reveal_pending());
        assert!(session.revealed_answer().is_none());
        assert_eq!(session.position(), 3);
        assert_eq!(session.consecutive_wrong(), 1);
    }

    #[test]
    fn reveal_fires_once_per_three_misses() {
        let mut session = ordered_session(10);
        let mut reveals = 0;
        for _ in 0..3 {
            if session.submit_answer("x", fixed_now()).unwrap().step == AnswerStep::Revealed {
                reveals += 1;
            }
        }
        assert_eq!(reveals, 1);
    }

    #[test]
    fn correct_answer_resets_strikes() {
        let mut session = ordered_session(10);
        session.submit_answer("x", fixed_now()).unwrap();
        session.submit_answer("x", fixed_now()).unwrap();
        assert_eq!(session.consecutive_wrong(), 2);

        let answer = current_answer(&session);
        session.submit_answer(&answer, fixed_now()).unwrap();
        assert_eq!(session.consecutive_wrong(), 0);
        assert_eq!(session.remaining_strikes(), 3);
    }

    #[test]
    fn correct_answer_after_reveal_scores() {
        let mut session = ordered_session(10);
        for _ in 0..3 {
            session.submit_answer("x", fixed_now()).unwrap();
        }
        let answer = session.revealed_answer().unwrap().to_string();
        let result = session.submit_answer(&answer, fixed_now()).unwrap();

        assert!(result.correct);
        assert_eq!(session.score(), 1);
        assert_eq!(session.position(), 3);
    }

    #[test]
    fn ten_correct_answers_complete_the_quiz() {
        let mut session = ordered_session(10);
        for _ in 0..9 {
            let answer = current_answer(&session);
            assert_eq!(
                session.submit_answer(&answer, fixed_now()).unwrap().step,
                AnswerStep::Advanced
            );
            assert_invariants(&session);
        }
        let answer = current_answer(&session);
        assert_eq!(
            session.submit_answer(&answer, fixed_now()).unwrap().step,
            AnswerStep::Finished
        );

        assert!(session.is_complete());
        assert_eq!(session.score(), 10);
        let result = session.final_result().unwrap();
        assert_eq!(result.reason, EndReason::Completed);
        assert_eq!(result.total, 10);
        assert!((result.percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn third_miss_on_last_question_reveals_instead_of_finishing() {
        let mut session = ordered_session(10);
        for _ in 0..7 {
            let answer = current_answer(&session);
            session.submit_answer(&answer, fixed_now()).unwrap();
        }
        session.submit_answer("x", fixed_now()).unwrap();
        session.submit_answer("x", fixed_now()).unwrap();
        assert_eq!(session.position(), 9);

        let result = session.submit_answer("x", fixed_now()).unwrap();
        assert_eq!(result.step, AnswerStep::Revealed);
        assert!(!session.is_complete());

        let result = session.submit_answer("x", fixed_now()).unwrap();
        assert_eq!(result.step, AnswerStep::Finished);
        assert_eq!(session.final_result().unwrap().score, 7);
    }

    #[test]
    fn ticks_count_down_to_timeout() {
        let mut session = ordered_session(10);
        for expected in (1..600).rev() {
            assert_eq!(
                session.on_second_elapsed(fixed_now()).unwrap(),
                TickOutcome::Running {
                    remaining_seconds: expected
                }
            );
        }
        assert_eq!(
            session.on_second_elapsed(fixed_now()).unwrap(),
            TickOutcome::TimedOut
        );

        assert!(session.is_complete());
        assert_eq!(session.remaining_seconds(), 0);
        let result = session.final_result().unwrap();
        assert_eq!(result.reason, EndReason::Timeout);
        assert_eq!(result.score, 0);
        assert_eq!(result.elapsed_seconds, 600);
    }

    #[test]
    fn terminal_session_rejects_everything() {
        let mut session = ordered_session(10);
        for _ in 0..600 {
            session.on_second_elapsed(fixed_now()).unwrap();
        }
        let frozen = session.clone();

        for _ in 0..5 {
            assert_eq!(
                session.on_second_elapsed(fixed_now()).unwrap_err(),
                SessionError::SessionOver
            );
            assert_eq!(
                session.submit_answer("a0", fixed_now()).unwrap_err(),
                SessionError::SessionOver
            );
        }
        assert_eq!(session, frozen);
    }

    #[test]
    fn result_records_elapsed_time() {
        let mut session = ordered_session(10);
        for _ in 0..42 {
            session.on_second_elapsed(fixed_now()).unwrap();
        }
        for _ in 0..10 {
            let answer = current_answer(&session);
            session.submit_answer(&answer, fixed_now()).unwrap();
        }
        let result = session.final_result().unwrap();
        assert_eq!(result.elapsed_seconds, 42);
        assert_eq!(result.ended_at, fixed_now());
    }

    #[test]
    fn three_question_walkthrough() {
        let config = QuizConfig::new(3, 600, 3).unwrap();
        let questions = vec![
            Question::new("A?", "Paris"),
            Question::new("B?", "Mars"),
            Question::new("C?", "1923"),
        ];
        let mut session =
            QuizSession::from_questions(SessionId::new(1), questions, config, fixed_now()).unwrap();

        session.submit_answer("paris", fixed_now()).unwrap();
        assert_eq!(session.score(), 1);
        assert_eq!(session.position(), 1);

        // A miss that is not the third in a row still moves on.
        let result = session.submit_answer("wrong", fixed_now()).unwrap();
        assert_eq!(result.step, AnswerStep::Advanced);
        assert_eq!(session.position(), 2);
        assert_eq!(session.score(), 1);
        assert_eq!(session.consecutive_wrong(), 1);
        assert_invariants(&session);

        let result = session.submit_answer("1923", fixed_now()).unwrap();
        assert_eq!(result.step, AnswerStep::Finished);
        assert_eq!(session.final_result().unwrap().score, 2);
    }

    #[test]
    fn three_question_misses_finish_before_a_reveal() {
        let config = QuizConfig::new(3, 600, 3).unwrap();
        let questions = vec![
            Question::new("A?", "Paris"),
            Question::new("B?", "Mars"),
            Question::new("C?", "1923"),
        ];
        let mut session =
            QuizSession::from_questions(SessionId::new(1), questions, config, fixed_now()).unwrap();
        session.submit_answer("paris", fixed_now()).unwrap();

        // Misses below the strike limit advance, so the second one lands on
        // the last question and the third never reaches a reveal.
        let first = session.submit_answer("wrong", fixed_now()).unwrap();
        assert_eq!(first.step, AnswerStep::Advanced);
        assert_eq!(session.position(), 2);

        let second = session.submit_answer("wrong", fixed_now()).unwrap();
        assert_eq!(second.step, AnswerStep::Finished);
        assert!(!session.reveal_pending());

        let before = session.clone();
        let third = session.submit_answer("wrong", fixed_now());
        assert_eq!(third, Err(SessionError::SessionOver));
        assert_eq!(session, before);

        let result = session.final_result().unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.reason, EndReason::Completed);
    }

    #[test]
    fn single_strike_config_reveals_on_first_miss() {
        let config = QuizConfig::new(3, 600, 1).unwrap();
        let questions = vec![
            Question::new("A?", "Paris"),
            Question::new("B?", "Mars"),
            Question::new("C?", "1923"),
        ];
        let mut session =
            QuizSession::from_questions(SessionId::new(1), questions, config, fixed_now()).unwrap();

        session.submit_answer("paris", fixed_now()).unwrap();
        let result = session.submit_answer("wrong", fixed_now()).unwrap();
        assert_eq!(result.step, AnswerStep::Revealed);
        assert_eq!(session.position(), 1);
        assert_eq!(session.score(), 1);
        assert_eq!(session.consecutive_wrong(), 0);
        assert_eq!(session.revealed_answer(), Some("Mars"));

        let result = session.submit_answer("wrong", fixed_now()).unwrap();
        assert_eq!(result.step, AnswerStep::Revealed);
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn restart_draws_a_fresh_session() {
        let bank = QuestionBank::builtin();
        let mut rng = StdRng::seed_from_u64(21);
        let mut session =
            QuizSession::start(SessionId::new(1), &bank, QuizConfig::default(), &mut rng, fixed_now())
                .unwrap();
        session.submit_answer("x", fixed_now()).unwrap();
        session.on_second_elapsed(fixed_now()).unwrap();

        let next = session
            .restart(SessionId::new(2), &bank, &mut rng, fixed_now())
            .unwrap();
        assert_eq!(next.id(), SessionId::new(2));
        assert_eq!(next.position(), 0);
        assert_eq!(next.consecutive_wrong(), 0);
        assert_eq!(next.remaining_seconds(), 600);
        assert_eq!(next.config(), session.config());
    }

    #[test]
    fn restarts_vary_the_draw() {
        let bank = QuestionBank::builtin();
        let mut rng = StdRng::seed_from_u64(1234);
        let first = QuizSession::start(
            SessionId::new(1),
            &bank,
            QuizConfig::default(),
            &mut rng,
            fixed_now(),
        )
        .unwrap();

        let mut differing = 0;
        let mut current = first.clone();
        for i in 2..52 {
            current = current
                .restart(SessionId::new(i), &bank, &mut rng, fixed_now())
                .unwrap();
            if current.questions() != first.questions() {
                differing += 1;
            }
        }
        assert!(differing >= 45, "only {differing} of 50 restarts differed");
    }
}
