mod components;
mod quiz;
mod state;

#[cfg(test)]
mod view_smoke;

pub use components::{ResultPanel, RevealBanner, StrikeBar};
pub use quiz::{QuizView, RunnerHandle};
pub use state::{ViewError, ViewState, view_state_from_resource};
