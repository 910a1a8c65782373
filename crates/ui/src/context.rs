use std::sync::Arc;

use quiz_services::{QuizService, TickerSource};

/// What the composition root (e.g. `crates/app`) hands to the UI.
pub trait UiApp: Send + Sync {
    fn quiz_service(&self) -> Arc<QuizService>;
    fn tickers(&self) -> Arc<dyn TickerSource>;
}

#[derive(Clone)]
pub struct AppContext {
    quiz_service: Arc<QuizService>,
    tickers: Arc<dyn TickerSource>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_service: app.quiz_service(),
            tickers: app.tickers(),
        }
    }

    #[must_use]
    pub fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz_service)
    }

    #[must_use]
    pub fn tickers(&self) -> Arc<dyn TickerSource> {
        Arc::clone(&self.tickers)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
