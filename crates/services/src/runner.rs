use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use quiz_core::Clock;
use quiz_core::model::{AnswerResult, AnswerStep, QuizResult, QuizSession, SessionId, TickOutcome};

use crate::error::ServiceError;
use crate::quiz_service::QuizService;
use crate::snapshot::QuizSnapshot;
use crate::ticker::{Ticker, TickerSource};

/// Owns the live session and the task that counts it down.
///
/// Every mutation goes through the session mutex and is followed by a new
/// `QuizSnapshot` on the watch channel. Each timer task is bound to the id of
/// the session it was spawned for; a restart aborts the old task before the
/// new one starts, and a tick that still reaches a replaced session is dropped.
pub struct QuizRunner {
    service: Arc<QuizService>,
    tickers: Arc<dyn TickerSource>,
    runtime: Handle,
    shared: Arc<Shared>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    clock: Clock,
    session: Mutex<QuizSession>,
    snapshots: watch::Sender<QuizSnapshot>,
}

impl Shared {
    fn lock_session(&self) -> MutexGuard<'_, QuizSession> {
        // Transitions never leave a half-applied session, so a poisoned lock is still usable.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, session: &QuizSession) {
        self.snapshots.send_replace(QuizSnapshot::from_session(session));
    }
}

impl QuizRunner {
    /// Starts the first session and its countdown.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NoRuntime` outside a Tokio runtime and
    /// `ServiceError::Session` if no session can be drawn.
    pub fn start(
        service: Arc<QuizService>,
        tickers: Arc<dyn TickerSource>,
    ) -> Result<Self, ServiceError> {
        let runtime = Handle::try_current().map_err(|_| ServiceError::NoRuntime)?;
        let session = service.start_session()?;
        let id = session.id();
        let (snapshots, _) = watch::channel(QuizSnapshot::from_session(&session));

        let runner = Self {
            shared: Arc::new(Shared {
                clock: service.clock(),
                session: Mutex::new(session),
                snapshots,
            }),
            service,
            tickers,
            runtime,
            timer: Mutex::new(None),
        };
        runner.spawn_timer(id);
        Ok(runner)
    }

    /// Submits an answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Session` with `SessionOver` once the quiz has ended.
    pub fn submit_answer(&self, raw: &str) -> Result<AnswerResult, ServiceError> {
        let result = {
            let mut session = self.shared.lock_session();
            let result = session.submit_answer(raw, self.shared.clock.now())?;
            match result.step {
                AnswerStep::Revealed => tracing::debug!(
                    session = %session.id(),
                    question = session.question_number(),
                    "answer revealed after consecutive misses"
                ),
                AnswerStep::Finished => tracing::info!(
                    session = %session.id(),
                    score = session.score(),
                    "quiz completed"
                ),
                AnswerStep::Advanced => {}
            }
            self.shared.publish(&session);
            result
        };

        if result.step == AnswerStep::Finished {
            self.stop_timer();
        }
        Ok(result)
    }

    /// Throws the current session away and starts a new one.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Session` if no session can be drawn; the old
    /// session then stays in place with its countdown stopped.
    pub fn restart(&self) -> Result<(), ServiceError> {
        self.stop_timer();
        let id = {
            let mut session = self.shared.lock_session();
            let next = self.service.restart(&session)?;
            let id = next.id();
            *session = next;
            self.shared.publish(&session);
            id
        };
        self.spawn_timer(id);
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizSnapshot> {
        self.shared.snapshots.subscribe()
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.shared.lock_session().id()
    }

    #[must_use]
    pub fn final_result(&self) -> Option<QuizResult> {
        self.shared.lock_session().final_result()
    }

    /// Runs `f` against the live session.
    pub fn with_session<T>(&self, f: impl FnOnce(&QuizSession) -> T) -> T {
        f(&self.shared.lock_session())
    }

    fn spawn_timer(&self, id: SessionId) {
        let ticker = self.tickers.ticker();
        let handle = self
            .runtime
            .spawn(run_timer(Arc::clone(&self.shared), id, ticker));
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = timer.replace(handle) {
            previous.abort();
        }
    }

    fn stop_timer(&self) {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}

impl Drop for QuizRunner {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

impl fmt::Debug for QuizRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizRunner")
            .field("service", &self.service)
            .field("session", &*self.shared.lock_session())
            .finish_non_exhaustive()
    }
}

async fn run_timer(shared: Arc<Shared>, id: SessionId, mut ticker: Box<dyn Ticker>) {
    while ticker.tick().await {
        if !apply_tick(&shared, id) {
            break;
        }
    }
}

/// Returns whether the countdown for `id` should keep running.
fn apply_tick(shared: &Shared, id: SessionId) -> bool {
    let mut session = shared.lock_session();
    if session.id() != id {
        tracing::debug!(stale = %id, live = %session.id(), "stale tick dropped");
        return false;
    }

    match session.on_second_elapsed(shared.clock.now()) {
        Ok(TickOutcome::Running { .. }) => {
            shared.publish(&session);
            true
        }
        Ok(TickOutcome::TimedOut) => {
            tracing::info!(session = %id, score = session.score(), "quiz timed out");
            shared.publish(&session);
            false
        }
        Err(_) => false,
    }
}
